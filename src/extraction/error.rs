//! Error taxonomy for the extraction pipeline.

use thiserror::Error;

/// Errors from a single extraction attempt.
///
/// All variants are terminal for the attempt; nothing is retried
/// automatically. The user-facing message is the only propagation channel
/// for the web UI.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Extraction was triggered with no document selected. No remote call
    /// is attempted in this case.
    #[error("no document selected")]
    NoDocumentSelected,

    /// The remote call failed: transport error, non-2xx status, missing API
    /// key, or an empty completion. No cause distinction is surfaced.
    #[error("remote call failed: {0}")]
    RemoteCallFailed(String),

    /// The completion text was not valid JSON after fence stripping.
    #[error("unparseable response: {0}")]
    UnparseableResponse(String),
}

impl ExtractionError {
    /// The message shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoDocumentSelected => "Please select an Aadhaar card.",
            Self::UnparseableResponse(_) => "Please check image",
            Self::RemoteCallFailed(_) => "Something went wrong.",
        }
    }
}
