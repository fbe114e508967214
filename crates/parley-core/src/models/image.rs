//! Inline image payloads.
//!
//! Images travel through the system as `data:<mime>;base64,<bytes>` URIs so a
//! turn's content is always a plain string. The size ceiling applies to the
//! raw bytes at ingestion time, before encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::CoreError;

/// Largest raw image accepted at ingestion (3 MiB).
pub const MAX_IMAGE_BYTES: usize = 3 * 1024 * 1024;

/// A validated `data:image/...;base64,` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data_uri: String,
}

impl ImagePayload {
    /// Encode raw image bytes. Rejects oversized input and non-image MIME
    /// types before any encoding work is done.
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<Self, CoreError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(CoreError::PayloadTooLarge {
                size: bytes.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        if !is_image_mime(mime) {
            return Err(CoreError::UnsupportedMediaType(mime.to_string()));
        }

        let encoded = STANDARD.encode(bytes);
        Ok(Self {
            data_uri: format!("data:{mime};base64,{encoded}"),
        })
    }

    /// Validate an existing data URI, e.g. one picked from the gallery.
    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let rest = content
            .strip_prefix("data:")
            .ok_or_else(|| CoreError::InvalidImagePayload("missing data: scheme".to_string()))?;
        let (mime, data) = rest.split_once(";base64,").ok_or_else(|| {
            CoreError::InvalidImagePayload("payload is not base64-encoded".to_string())
        })?;

        if !is_image_mime(mime) {
            return Err(CoreError::UnsupportedMediaType(mime.to_string()));
        }

        let decoded_len = STANDARD
            .decode(data)
            .map_err(|e| CoreError::InvalidImagePayload(e.to_string()))?
            .len();
        if decoded_len > MAX_IMAGE_BYTES {
            return Err(CoreError::PayloadTooLarge {
                size: decoded_len,
                limit: MAX_IMAGE_BYTES,
            });
        }

        Ok(Self {
            data_uri: content.to_string(),
        })
    }

    pub fn mime(&self) -> &str {
        self.data_uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.data_uri
    }

    pub fn into_data_uri(self) -> String {
        self.data_uri
    }
}

/// Guess an image MIME type from a file extension (case-insensitive).
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

fn is_image_mime(mime: &str) -> bool {
    mime.strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}
