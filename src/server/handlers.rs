//! HTTP handlers for the scan UI and its small JSON API.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;

use super::assets;
use super::templates;
use super::AppState;
use crate::extraction::ExtractionError;
use crate::models::{CardFields, UploadedDocument};
use crate::utils::is_image_mime;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Response for document uploads.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

/// Response for scan requests.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<CardFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Current scanner status for the UI.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub busy: bool,
    pub has_document: bool,
    pub fields: CardFields,
}

/// Render the scan page with the current result.
pub async fn scan_page(State(state): State<AppState>) -> Html<String> {
    let fields = state.scanner.current_result().await;
    let document = state.scanner.current_document().await;
    Html(templates::scan_page(&fields, document.as_ref()))
}

/// Accept a file selection and store it as the current document.
///
/// A request without a usable file part is a no-op, mirroring an empty
/// file-picker selection.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("document") {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let declared_mime = field.content_type().unwrap_or("").to_string();
        let content = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!("Failed to read upload: {}", e);
                return Json(UploadResponse {
                    ok: false,
                    filename: None,
                    mime_type: None,
                    size: None,
                });
            }
        };

        if content.is_empty() {
            break;
        }

        let document = UploadedDocument::new(content, &declared_mime, filename.clone());
        if !is_image_mime(&document.mime_type) {
            // The picker restricts to image/* client-side only; anything
            // that slips through is accepted and forwarded unvalidated.
            tracing::debug!("Non-image upload accepted: {}", document.mime_type);
        }
        let response = UploadResponse {
            ok: true,
            filename: document.filename.clone(),
            mime_type: Some(document.mime_type.clone()),
            size: Some(document.size()),
        };
        state.scanner.select_document(document).await;
        return Json(response);
    }

    Json(UploadResponse {
        ok: false,
        filename: None,
        mime_type: None,
        size: None,
    })
}

/// Trigger one extraction against the current document.
pub async fn run_scan(State(state): State<AppState>) -> impl IntoResponse {
    match state.scanner.scan().await {
        Ok(fields) => (
            StatusCode::OK,
            Json(ScanResponse {
                ok: true,
                fields: Some(fields),
                error: None,
            }),
        ),
        Err(err) => {
            tracing::warn!("Scan failed: {}", err);
            let status = match err {
                ExtractionError::NoDocumentSelected => StatusCode::BAD_REQUEST,
                ExtractionError::UnparseableResponse(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ExtractionError::RemoteCallFailed(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ScanResponse {
                    ok: false,
                    fields: None,
                    error: Some(err.user_message().to_string()),
                }),
            )
        }
    }
}

/// Busy flag, selection state, and current fields.
pub async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        busy: state.scanner.is_busy(),
        has_document: state.scanner.current_document().await.is_some(),
        fields: state.scanner.current_result().await,
    })
}

/// Serve CSS.
pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

/// Serve JavaScript.
pub async fn serve_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], assets::JS)
}
