//! Test fixtures: minimal image blobs and classifier replies.

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// JPEG-looking blob of `size` bytes (SOI marker, zero padding, EOI marker).
pub fn create_test_jpeg(size: usize) -> Vec<u8> {
    let mut jpeg = vec![0u8; size.max(4)];
    jpeg[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
    let len = jpeg.len();
    jpeg[len - 2..].copy_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// Classifier reply for a confident plastic prediction.
pub const PLASTIC_REPLY: &str = r#"{"success":true,"waste_category":"plastic","confidence":0.92,"original_class":"PET_bottle"}"#;
