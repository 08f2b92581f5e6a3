//! Card field extraction pipeline.
//!
//! The `Scanner` owns all per-scan state: the currently selected document,
//! the last successful result, and the busy flag. Control flow per scan is
//! strictly linear: encode, one remote call, parse, replace the result.
//! The remote model sits behind the `VisionModel` trait so the pipeline can
//! be exercised without network access.

mod error;
mod gemini;
mod parser;

pub use error::ExtractionError;
pub use gemini::GeminiClient;
pub use parser::{parse_card_fields, strip_code_fences};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{CardFields, UploadedDocument};

/// The fixed instruction sent with every scan. The response contract is a
/// bare JSON object with exactly these keys.
pub const EXTRACTION_PROMPT: &str = "Extract Aadhaar Number, Full Name, and Full Residential \
    Address from the Aadhaar card in this image. Return \
    only JSON like this: {\"aadhaar\": \"\", \"name\": \"\", \"address\": \"\"}";

/// A hosted multimodal model that turns an image plus instruction into a
/// single text completion.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        mime_type: &str,
        image_base64: &str,
        instruction: &str,
    ) -> Result<String, ExtractionError>;
}

/// Clears the busy flag on every exit path, including unwind.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Controller for the scan workflow.
///
/// Holds exactly one document and one result at a time; both are replaced
/// wholesale on update. On any failure the previous result is preserved.
pub struct Scanner {
    model: Arc<dyn VisionModel>,
    document: RwLock<Option<UploadedDocument>>,
    result: RwLock<CardFields>,
    busy: AtomicBool,
}

impl Scanner {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            document: RwLock::new(None),
            result: RwLock::new(CardFields::default()),
            busy: AtomicBool::new(false),
        }
    }

    /// Store a newly selected document, discarding any previous selection.
    pub async fn select_document(&self, document: UploadedDocument) {
        info!(
            "Selected document: {} ({}, {} bytes)",
            document.filename.as_deref().unwrap_or("unnamed"),
            document.mime_type,
            document.size()
        );
        *self.document.write().await = Some(document);
    }

    /// The currently selected document, if any.
    pub async fn current_document(&self) -> Option<UploadedDocument> {
        self.document.read().await.clone()
    }

    /// The last successful extraction result (all fields empty before the
    /// first success).
    pub async fn current_result(&self) -> CardFields {
        self.result.read().await.clone()
    }

    /// True while an extraction is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run one extraction against the currently selected document.
    ///
    /// Fails immediately with `NoDocumentSelected` before any network
    /// activity when nothing is selected. On success the stored result is
    /// replaced in full; on failure it is left untouched.
    pub async fn scan(&self) -> Result<CardFields, ExtractionError> {
        let document = self
            .document
            .read()
            .await
            .clone()
            .ok_or(ExtractionError::NoDocumentSelected)?;

        self.busy.store(true, Ordering::SeqCst);
        let _guard = BusyGuard(&self.busy);

        let encoded = STANDARD.encode(&document.content);
        let completion = self
            .model
            .generate(&document.mime_type, &encoded, EXTRACTION_PROMPT)
            .await?;

        let fields = parse_card_fields(&completion)?;

        info!("Extraction complete");
        *self.result.write().await = fields.clone();
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use tokio::sync::Notify;

    /// Replays scripted completions and counts how often it is called.
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VisionModel for ScriptedModel {
        async fn generate(
            &self,
            _mime_type: &str,
            _image_base64: &str,
            _instruction: &str,
        ) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted model call")
                .map_err(ExtractionError::RemoteCallFailed)
        }
    }

    fn test_document() -> UploadedDocument {
        UploadedDocument::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png", Some("card.png".into()))
    }

    const GOOD_REPLY: &str =
        "```json\n{\"aadhaar\":\"1234 5678 9012\",\"name\":\"Asha Rao\",\"address\":\"12 MG Road\"}\n```";

    #[tokio::test]
    async fn test_scan_without_document_never_calls_model() {
        let model = ScriptedModel::new(vec![]);
        let scanner = Scanner::new(model.clone());

        let err = scanner.scan().await.unwrap_err();
        assert!(matches!(err, ExtractionError::NoDocumentSelected));
        assert_eq!(model.call_count(), 0);
        assert!(!scanner.is_busy());
    }

    #[tokio::test]
    async fn test_successful_scan_replaces_result() {
        let model = ScriptedModel::new(vec![Ok(GOOD_REPLY.to_string())]);
        let scanner = Scanner::new(model);
        scanner.select_document(test_document()).await;

        let fields = scanner.scan().await.unwrap();
        assert_eq!(fields.name, "Asha Rao");
        assert_eq!(fields.identifier_number, "1234 5678 9012");
        assert_eq!(fields.address, "12 MG Road");
        assert_eq!(scanner.current_result().await, fields);
        assert!(!scanner.is_busy());
    }

    #[tokio::test]
    async fn test_unparseable_reply_preserves_previous_result() {
        let model = ScriptedModel::new(vec![
            Ok(GOOD_REPLY.to_string()),
            Ok("Sorry, I cannot read this image.".to_string()),
        ]);
        let scanner = Scanner::new(model);
        scanner.select_document(test_document()).await;

        let first = scanner.scan().await.unwrap();
        let err = scanner.scan().await.unwrap_err();

        assert!(matches!(err, ExtractionError::UnparseableResponse(_)));
        assert_eq!(scanner.current_result().await, first);
        assert!(!scanner.is_busy());
    }

    #[tokio::test]
    async fn test_remote_failure_preserves_previous_result() {
        let model = ScriptedModel::new(vec![
            Ok(GOOD_REPLY.to_string()),
            Err("HTTP request failed".to_string()),
        ]);
        let scanner = Scanner::new(model);
        scanner.select_document(test_document()).await;

        let first = scanner.scan().await.unwrap();
        let err = scanner.scan().await.unwrap_err();

        assert!(matches!(err, ExtractionError::RemoteCallFailed(_)));
        assert_eq!(scanner.current_result().await, first);
        assert!(!scanner.is_busy());
    }

    #[tokio::test]
    async fn test_identical_replies_give_identical_results() {
        let model = ScriptedModel::new(vec![
            Ok(GOOD_REPLY.to_string()),
            Ok(GOOD_REPLY.to_string()),
        ]);
        let scanner = Scanner::new(model);
        scanner.select_document(test_document()).await;

        let first = scanner.scan().await.unwrap();
        let second = scanner.scan().await.unwrap();
        assert_eq!(first, second);
    }

    /// Parks inside generate() until released, so the test can observe the
    /// busy flag mid-flight.
    struct ParkedModel {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl VisionModel for ParkedModel {
        async fn generate(
            &self,
            _mime_type: &str,
            _image_base64: &str,
            _instruction: &str,
        ) -> Result<String, ExtractionError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(GOOD_REPLY.to_string())
        }
    }

    #[tokio::test]
    async fn test_busy_spans_exactly_one_in_flight_scan() {
        let model = Arc::new(ParkedModel {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let scanner = Arc::new(Scanner::new(model.clone()));
        scanner.select_document(test_document()).await;

        assert!(!scanner.is_busy());

        let task = {
            let scanner = scanner.clone();
            tokio::spawn(async move { scanner.scan().await })
        };

        model.entered.notified().await;
        assert!(scanner.is_busy());

        model.release.notify_one();
        let fields = task.await.unwrap().unwrap();
        assert_eq!(fields.name, "Asha Rao");
        assert!(!scanner.is_busy());
    }
}
