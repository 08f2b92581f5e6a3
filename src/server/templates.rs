//! HTML templates for the scan interface.

use crate::models::{CardFields, UploadedDocument};
use crate::utils::html_escape;

/// Render the single scan page: file picker, scan trigger, and the three
/// read-only output fields, pre-filled with the current result.
pub fn scan_page(fields: &CardFields, document: Option<&UploadedDocument>) -> String {
    let selection = match document {
        Some(doc) => format!(
            "{} ({}, {} bytes)",
            html_escape(doc.filename.as_deref().unwrap_or("unnamed")),
            html_escape(&doc.mime_type),
            doc.size()
        ),
        None => "No file selected".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Aadhaar Scan - idscan</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">idscan</a>
        </nav>
    </header>
    <main>
        <h1>Aadhaar Scan</h1>
        <div class="upload-row">
            <input type="file" id="document-input" accept="image/*">
            <button id="scan-button">Scan</button>
        </div>
        <p id="selection-info">{selection}</p>
        <p id="scan-message" class="message"></p>
        <div class="form">
            <label for="field-name">Full Name:</label>
            <input type="text" id="field-name" value="{name}" readonly>

            <label for="field-identifier">Aadhaar Number:</label>
            <input type="text" id="field-identifier" value="{identifier}" readonly>

            <label for="field-address">Residential Address:</label>
            <textarea id="field-address" readonly>{address}</textarea>
        </div>
    </main>
    <script src="/static/app.js"></script>
</body>
</html>"#,
        selection = selection,
        name = html_escape(&fields.name),
        identifier = html_escape(&fields.identifier_number),
        address = html_escape(&fields.address),
    )
}
