// src/core/sanitize.rs

/// Collapse sequences of whitespace into a single space and trim.
/// Non-breaking spaces count as whitespace, so decoded `&nbsp;` disappears too.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Placeholder text the site uses for "no value".
pub fn is_placeholder(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "" | "-" | "--" | "n/a" | "na" | "none" | "not available" | "\u{2014}"
    )
}

/// Normalized, non-placeholder text or `None`.
pub fn clean_text(s: &str) -> Option<String> {
    let t = normalize_ws(s);
    if is_placeholder(&t) { None } else { Some(t) }
}
