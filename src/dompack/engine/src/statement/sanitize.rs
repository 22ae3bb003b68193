//! Turns raw HTML segment into LaTeX-ready text
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex, RegexBuilder};

static PRE_OPEN: Lazy<Regex> = Lazy::new(|| dotall(r"<pre[^>]*>"));
static PRE_CLOSE: Lazy<Regex> = Lazy::new(|| dotall(r"</pre[^>]*>"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Characters with special meaning in LaTeX and their escaped forms
const ESCAPES: &[(&str, &str)] = &[
    ("&", r"\&"),
    ("%", r"\%"),
    ("#", r"\#"),
    ("~", r"\textasciitilde{}"),
    ("<", r"\textless{}"),
    (">", r"\textgreater{}"),
];

/// Keys which may already appear escaped with a backslash.
/// Angle brackets are always replaced, otherwise they would be read as markup again.
const BACKSLASH_ESCAPED: &[&str] = &["&", "%", "#", "~"];

/// Matches escapable key, or key which is already escaped.
/// Keys are tried longest first.
static SPECIAL: Lazy<Regex> = Lazy::new(|| {
    let mut keys: Vec<&str> = ESCAPES.iter().map(|(k, _)| *k).collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(\\)?({})", alternation)).unwrap()
});

fn dotall(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .unwrap()
}

/// `<pre>` blocks become `verbatim` environments
pub fn convert_verbatim(s: &str) -> String {
    let s = PRE_OPEN.replace_all(s, NoExpand(r"\begin{verbatim}"));
    PRE_CLOSE
        .replace_all(&s, NoExpand(r"\end{verbatim}"))
        .into_owned()
}

/// Drops all tags, keeping text content with entities decoded
///
/// `\&` is already LaTeX and is kept as is instead of being read as an entity.
pub fn strip_tags(s: &str) -> String {
    let s = s.replace(r"\&", r"\&amp;");
    let fragment = scraper::Html::parse_fragment(&s);
    fragment.root_element().text().collect()
}

pub fn escape_special(s: &str) -> String {
    SPECIAL
        .replace_all(s, |caps: &Captures| {
            let key = &caps[2];
            let escaped = caps.get(1).is_some();
            if escaped && BACKSLASH_ESCAPED.contains(&key) {
                return caps[0].to_string();
            }
            let replacement = ESCAPES
                .iter()
                .find(|(k, _)| *k == key)
                .map_or(key, |(_, v)| *v);
            if escaped {
                format!("\\{}", replacement)
            } else {
                replacement.to_string()
            }
        })
        .into_owned()
}

/// Three or more consecutive newlines become one blank line
pub fn collapse_blank_lines(s: &str) -> String {
    BLANK_LINES.replace_all(s, "\n\n").into_owned()
}

pub fn sanitize(segment: &str) -> String {
    let s = convert_verbatim(segment);
    let s = strip_tags(&s);
    let s = escape_special(&s);
    collapse_blank_lines(&s)
}
