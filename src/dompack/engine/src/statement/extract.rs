//! Splits USACO problem page into raw statement segments.
//!
//! Every segment is described by pair of delimiters. Right delimiter of one
//! segment is usually left delimiter of the next, but each search runs over
//! the whole page, so missing section does not break following ones.
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

const SEP_STATEMENT: &str = r#"<span\s*id="probtext-text"[^>]*>\s*"#;
const SEP_INPUT_FORMAT: &str =
    r"<div\s*class='prob-in-spec'[^>]*>\s*<h\d>INPUT\s*FORMAT[^<]*</h\d>\s*";
const SEP_OUTPUT_FORMAT: &str =
    r"<div\s*class='prob-out-spec'[^>]*>\s*<h\d>OUTPUT\s*FORMAT[^<]*</h\d>\s*";
const SEP_SAMPLE_INPUT: &str = r"<h\d>SAMPLE\s*INPUT[^<]*</h\d>\s*<pre\s*class='in'[^>]*>\s*";
const SEP_SAMPLE_OUTPUT: &str =
    r"</pre>\s*<h\d>SAMPLE\s*OUTPUT[^<]*</h\d>\s*<pre\s*class='out'[^>]*>\s*";
const SEP_PRE_END: &str = r"</pre>";
const SEP_END: &str = r"(?:Problem\s*credits|</span>)";
const TITLE: &str = r"<h2>\s*Problem\s*\d\s*\.\s*([^<]*?)\s*</h2>";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SegmentName {
    Statement,
    InputFormat,
    OutputFormat,
    SampleInput,
    SampleOutput,
    Notes,
}

impl SegmentName {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentName::Statement => "statement",
            SegmentName::InputFormat => "input_format",
            SegmentName::OutputFormat => "output_format",
            SegmentName::SampleInput => "sample_in",
            SegmentName::SampleOutput => "sample_out",
            SegmentName::Notes => "notes",
        }
    }
}

/// Result of single extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Found(String),
    NotFound,
}

impl Extracted {
    /// Legacy view: missing segment is empty string
    pub fn into_text(self) -> String {
        match self {
            Extracted::Found(s) => s,
            Extracted::NotFound => String::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found(_))
    }
}

pub struct SegmentPattern {
    pub name: SegmentName,
    regex: Regex,
}

impl SegmentPattern {
    fn new(name: SegmentName, left: &str, right: &str) -> SegmentPattern {
        let pattern = format!("{}(.*?){}", left, right);
        SegmentPattern {
            name,
            regex: compile(&pattern),
        }
    }

    pub fn extract(&self, html: &str) -> Extracted {
        extract_between(&self.regex, html)
    }
}

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .expect("segment pattern must be valid")
}

/// Returns first capture group of the first match
fn extract_between(regex: &Regex, html: &str) -> Extracted {
    match regex.captures(html).and_then(|caps| caps.get(1)) {
        Some(m) => Extracted::Found(m.as_str().to_string()),
        None => Extracted::NotFound,
    }
}

/// Segment patterns in page order
pub static SEGMENTS: Lazy<Vec<SegmentPattern>> = Lazy::new(|| {
    let notes_left = format!("{}.*?{}", SEP_SAMPLE_OUTPUT, SEP_PRE_END);
    vec![
        SegmentPattern::new(SegmentName::Statement, SEP_STATEMENT, SEP_INPUT_FORMAT),
        SegmentPattern::new(SegmentName::InputFormat, SEP_INPUT_FORMAT, SEP_OUTPUT_FORMAT),
        SegmentPattern::new(SegmentName::OutputFormat, SEP_OUTPUT_FORMAT, SEP_SAMPLE_INPUT),
        SegmentPattern::new(SegmentName::SampleInput, SEP_SAMPLE_INPUT, SEP_SAMPLE_OUTPUT),
        SegmentPattern::new(SegmentName::SampleOutput, SEP_SAMPLE_OUTPUT, SEP_PRE_END),
        SegmentPattern::new(SegmentName::Notes, &notes_left, SEP_END),
    ]
});

static TITLE_RE: Lazy<Regex> = Lazy::new(|| compile(TITLE));

/// Raw (not sanitized) segments of one page
#[derive(Debug, Clone)]
pub struct RawSegments {
    pub title: Extracted,
    pub segments: Vec<(SegmentName, Extracted)>,
}

impl RawSegments {
    pub fn get(&self, name: SegmentName) -> &Extracted {
        self.segments
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, e)| e)
            .unwrap_or(&Extracted::NotFound)
    }
}

/// Paragraph tags become blank lines before segmentation
pub fn normalize_paragraphs(html: &str) -> String {
    html.replace("<p>", "\n\n").replace("</p>", "\n\n")
}

pub fn extract_title(html: &str) -> Extracted {
    extract_between(&TITLE_RE, html)
}

/// Runs every segment pattern over `html`.
/// `html` is expected to be already passed through `normalize_paragraphs`.
pub fn extract_segments(html: &str) -> RawSegments {
    let title = extract_title(html);
    if !title.is_found() {
        tracing::debug!(segment = "title", "section not found");
    }
    let segments = SEGMENTS
        .iter()
        .map(|pat| {
            let e = pat.extract(html);
            if !e.is_found() {
                tracing::debug!(segment = pat.name.as_str(), "section not found");
            }
            (pat.name, e)
        })
        .collect();
    RawSegments { title, segments }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<h2> USACO 2019 December Contest, Bronze </h2>
<h2> Problem 1. Cow Gymnastics </h2>
<span id="probtext-text" class="x"><p>Bessie has <b>K</b> sessions &amp; N cows.</p>
<div class='prob-in-spec'><h4>INPUT FORMAT (file gymnastics.in):</h4>
The first line contains K and N.
<div class='prob-out-spec'><h4>OUTPUT FORMAT (file gymnastics.out):</h4>
Output one integer.
<h4>SAMPLE INPUT:</h4>
<pre class='in'>
3 4
4 1 2 3
</pre>
<h4>SAMPLE OUTPUT:</h4>
<pre class='out'>
4
</pre>
The consistent pairs are (1,4).
<p>Problem credits: Nick Wu</p>
</span></body></html>"#;

    #[test]
    fn extracts_all_sections() {
        let html = normalize_paragraphs(PAGE);
        let raw = extract_segments(&html);
        assert_eq!(raw.title, Extracted::Found("Cow Gymnastics".to_string()));
        assert_eq!(
            raw.get(SegmentName::InputFormat),
            &Extracted::Found("The first line contains K and N.\n".to_string())
        );
        assert_eq!(
            raw.get(SegmentName::SampleInput),
            &Extracted::Found("3 4\n4 1 2 3\n".to_string())
        );
        assert_eq!(
            raw.get(SegmentName::SampleOutput),
            &Extracted::Found("4\n".to_string())
        );
        let notes = raw.get(SegmentName::Notes).clone().into_text();
        assert!(notes.contains("The consistent pairs are (1,4)."));
        assert!(!notes.contains("credits"));
        let statement = raw.get(SegmentName::Statement).clone().into_text();
        assert!(statement.starts_with("Bessie has <b>K</b> sessions"));
    }

    #[test]
    fn missing_section_does_not_cascade() {
        let html = normalize_paragraphs(&PAGE.replace("OUTPUT FORMAT", "RESULT"));
        let raw = extract_segments(&html);
        // input format ends at output header, output format starts there
        assert_eq!(raw.get(SegmentName::InputFormat), &Extracted::NotFound);
        assert_eq!(raw.get(SegmentName::OutputFormat), &Extracted::NotFound);
        assert!(raw.get(SegmentName::SampleInput).is_found());
        assert!(raw.get(SegmentName::SampleOutput).is_found());
        assert!(raw.title.is_found());
    }

    #[test]
    fn every_section_missing_yields_empty() {
        let raw = extract_segments("<html><body>nothing here</body></html>");
        assert_eq!(raw.title.clone().into_text(), "");
        assert_eq!(raw.segments.len(), 6);
        for (_, seg) in raw.segments {
            assert_eq!(seg.into_text(), "");
        }
    }

    #[test]
    fn first_match_wins() {
        let html = "<h2>Problem 1. First</h2><h2>Problem 2. Second</h2>";
        assert_eq!(extract_title(html), Extracted::Found("First".to_string()));
    }
}
