//! Data models for idscan.

mod document;

pub use document::{CardFields, UploadedDocument};
