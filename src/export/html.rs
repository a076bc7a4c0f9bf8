//! Minimal HTML wrapper for exported text.

/// Wrap `text` in a `<pre>` document.
///
/// The text is escaped so log lines containing tags (including the report
/// sentinels) survive rendering.
pub fn render_document(text: &str) -> String {
    format!("<html><body><pre>{}</pre></body></html>", escape(text))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
