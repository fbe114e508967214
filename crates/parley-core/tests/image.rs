use parley_core::error::CoreError;
use parley_core::models::image::{ImagePayload, MAX_IMAGE_BYTES, mime_for_extension};

#[test]
fn small_image_is_encoded() {
    let payload = ImagePayload::from_bytes(b"abc", "image/gif").unwrap();
    assert_eq!(payload.as_str(), "data:image/gif;base64,YWJj");
    assert_eq!(payload.mime(), "image/gif");
}

#[test]
fn image_at_limit_is_accepted() {
    let bytes = vec![0u8; MAX_IMAGE_BYTES];
    assert!(ImagePayload::from_bytes(&bytes, "image/png").is_ok());
}

#[test]
fn oversized_image_is_rejected() {
    let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
    let err = ImagePayload::from_bytes(&bytes, "image/png").unwrap_err();
    assert!(matches!(
        err,
        CoreError::PayloadTooLarge { size, limit } if size == MAX_IMAGE_BYTES + 1 && limit == MAX_IMAGE_BYTES
    ));
}

#[test]
fn non_image_mime_is_rejected() {
    let err = ImagePayload::from_bytes(b"%PDF", "application/pdf").unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedMediaType(_)));
}

#[test]
fn parse_accepts_encoded_payload() {
    let payload = ImagePayload::parse("data:image/png;base64,YWJj").unwrap();
    assert_eq!(payload.mime(), "image/png");
}

#[test]
fn parse_rejects_plain_text() {
    assert!(matches!(
        ImagePayload::parse("hello"),
        Err(CoreError::InvalidImagePayload(_))
    ));
    assert!(matches!(
        ImagePayload::parse("data:image/png,raw"),
        Err(CoreError::InvalidImagePayload(_))
    ));
    assert!(matches!(
        ImagePayload::parse("data:text/plain;base64,YWJj"),
        Err(CoreError::UnsupportedMediaType(_))
    ));
}

#[test]
fn extension_lookup_is_case_insensitive() {
    assert_eq!(mime_for_extension("PNG"), Some("image/png"));
    assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
    assert_eq!(mime_for_extension("txt"), None);
}
