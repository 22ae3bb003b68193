//! printf-style file name patterns, e.g. `tests/%02d.a`
use super::PackageError;

/// Substitutes `value` for the single integer conversion in `pattern`.
///
/// Supported conversions are `%d`, `%Nd` and `%0Nd`; `%%` is a literal percent.
pub fn format_pattern(pattern: &str, value: usize) -> Result<String, PackageError> {
    let bad = |reason| PackageError::BadPattern {
        pattern: pattern.to_string(),
        reason,
    };
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars().peekable();
    let mut substituted = false;
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let zero_pad = chars.peek() == Some(&'0');
        if zero_pad {
            chars.next();
        }
        let mut width = 0usize;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = width * 10 + d as usize;
            chars.next();
        }
        match chars.next() {
            Some('d') | Some('i') | Some('u') => {}
            Some(_) => return Err(bad("unsupported conversion")),
            None => return Err(bad("dangling %")),
        }
        if substituted {
            return Err(bad("more than one conversion"));
        }
        substituted = true;
        if zero_pad {
            out.push_str(&format!("{:0width$}", value, width = width));
        } else {
            out.push_str(&format!("{:width$}", value, width = width));
        }
    }
    if !substituted {
        return Err(bad("no conversion"));
    }
    Ok(out)
}
