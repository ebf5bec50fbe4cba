use once_cell::sync::Lazy;
use regex::Regex;

static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRONG_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static EMPHASIS_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());

/// Escapes the five HTML-sensitive characters.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escapes `value` and applies code, strong and emphasis spans, in that order.
pub fn format_inline(value: &str) -> String {
    let escaped = escape_html(value);
    let with_code = CODE_SPAN.replace_all(&escaped, "<code>${1}</code>");
    let with_strong = STRONG_SPAN.replace_all(&with_code, "<strong>${1}</strong>");
    EMPHASIS_SPAN
        .replace_all(&with_strong, "<em>${1}</em>")
        .into_owned()
}
