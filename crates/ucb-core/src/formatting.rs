//! Outbound text escaping.

/// Escape HTML special characters for Telegram HTML parse mode.
///
/// Used by the notifier fallback: when the rich (markdown) send is rejected
/// the same text is re-sent escaped so it renders literally.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
