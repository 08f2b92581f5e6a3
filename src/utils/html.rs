//! HTML escaping utilities.

/// Escape HTML special characters so extracted field values can be rendered
/// into attribute values and element bodies.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
