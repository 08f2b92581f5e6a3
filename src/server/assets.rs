//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the scan interface.
pub const CSS: &str = include_str!("styles.css");

/// JavaScript for upload and scan interactions.
pub const JS: &str = include_str!("app.js");
