//! Shared utility functions.
//!
//! - `html`: HTML escaping for safe rendering
//! - `mime`: media type detection for uploaded files

mod html;
mod mime;

pub use html::html_escape;
pub use mime::{detect_mime, is_image_mime};
