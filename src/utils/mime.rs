//! Media type detection for uploaded files.

/// Determine the effective media type for a file.
///
/// Sniffs the content with `infer` first; the declared type from the file
/// picker is only a fallback since browsers report it from the extension.
/// Returns `application/octet-stream` when neither source knows.
pub fn detect_mime(content: &[u8], declared: &str) -> String {
    if let Some(kind) = infer::get(content) {
        return kind.mime_type().to_string();
    }
    if !declared.is_empty() {
        return declared.to_string();
    }
    "application/octet-stream".to_string()
}

/// True if the media type names an image format.
pub fn is_image_mime(mime: &str) -> bool {
    mime.to_lowercase().starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime_png() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_mime(&png, ""), "image/png");
    }

    #[test]
    fn test_detect_mime_jpeg() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
        assert_eq!(detect_mime(&jpeg, "text/plain"), "image/jpeg");
    }

    #[test]
    fn test_detect_mime_fallback() {
        assert_eq!(detect_mime(b"plain text", "image/jpeg"), "image/jpeg");
        assert_eq!(detect_mime(b"plain text", ""), "application/octet-stream");
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("IMAGE/JPEG"));
        assert!(!is_image_mime("application/pdf"));
    }
}
