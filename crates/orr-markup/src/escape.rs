use pulldown_cmark_escape::escape_html;

/// Escape text for use inside an HTML attribute or element body.
///
/// Uses the same escaper as the Markdown renderer, so `&`, `<`, `>`, `"`
/// and `'` all come out encoded.
#[must_use]
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    // Writing into a String is infallible.
    let _ = escape_html(&mut out, input);
    out
}
