//! In-memory document and extraction result models.
//!
//! Exactly one document is held at a time; selecting a new file replaces
//! the previous one wholesale. Nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::detect_mime;

/// The currently selected card image, held in memory until scanned.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Raw file content.
    pub content: Vec<u8>,
    /// Effective media type (sniffed from content, falling back to the
    /// declared type).
    pub mime_type: String,
    /// Original filename, if the picker provided one.
    pub filename: Option<String>,
    /// When this selection was made.
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedDocument {
    /// Create a document from raw bytes and the media type declared by the
    /// file picker. The declared type is untrusted; content sniffing wins
    /// when it recognizes the bytes.
    pub fn new(content: Vec<u8>, declared_mime: &str, filename: Option<String>) -> Self {
        let mime_type = detect_mime(&content, declared_mime);
        Self {
            content,
            mime_type,
            filename,
            uploaded_at: Utc::now(),
        }
    }

    /// Size of the document in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// The three extracted card fields.
///
/// Values are untrusted free text from the model and are never validated or
/// normalized. All fields default to empty; the record is overwritten in
/// full after each successful extraction and left untouched on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFields {
    /// Full name as printed on the card.
    pub name: String,
    /// Aadhaar-style identifier number.
    pub identifier_number: String,
    /// Full residential address.
    pub address: String,
}

impl CardFields {
    /// True if no field has been populated.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.identifier_number.is_empty() && self.address.is_empty()
    }
}
