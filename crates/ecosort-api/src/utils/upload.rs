//! Extraction of the submitted image from the request body
//!
//! An image arrives either as the multipart file field `file`, or inline as a
//! base64 string (optionally a `data:` URL) in the JSON field `image` or the
//! multipart text field `image`.

use axum::extract::Multipart;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ecosort_core::AppError;
use ecosort_storage::keys::normalize_mime_type;
use ecosort_storage::InboundUpload;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

use crate::services::submission::{Prediction, SubmissionService};

/// Room for multipart boundaries and part headers on top of the file itself
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

const FILE_FIELD: &str = "file";
const INLINE_FIELD: &str = "image";
const INLINE_FILE_NAME: &str = "inline-image";

/// Largest acceptable multipart body for a file of `max_file_size` bytes
pub fn multipart_body_limit(max_file_size: u64) -> u64 {
    max_file_size.saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Largest acceptable JSON body: base64 costs 4 bytes per 3
pub fn inline_body_limit(max_file_size: u64) -> u64 {
    max_file_size
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Request body forms carrying an image
pub enum ImageSource {
    Multipart(Multipart),
    Inline(String),
}

impl ImageSource {
    /// Feed the image into the submission pipeline
    pub async fn submit(self, service: &SubmissionService) -> Result<Prediction, AppError> {
        match self {
            ImageSource::Multipart(multipart) => submit_multipart(service, multipart).await,
            ImageSource::Inline(data) => submit_inline(service, &data).await,
        }
    }
}

/// Stream the first `file` field into the pipeline; fall back to an inline
/// `image` text field when no file is present.
async fn submit_multipart(
    service: &SubmissionService,
    mut multipart: Multipart,
) -> Result<Prediction, AppError> {
    let mut inline: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let stream = field.map_err(std::io::Error::other);
                let body = StreamReader::new(Box::pin(stream));

                return service
                    .submit(InboundUpload {
                        original_name,
                        content_type,
                        declared_size: None,
                        body: Box::pin(body),
                    })
                    .await;
            }
            Some(INLINE_FIELD) if inline.is_none() => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read image field: {}", e))
                })?;
                inline = Some(text);
            }
            _ => {}
        }
    }

    match inline {
        Some(data) => submit_inline(service, &data).await,
        None => Err(AppError::MissingImage),
    }
}

async fn submit_inline(service: &SubmissionService, data: &str) -> Result<Prediction, AppError> {
    let image = decode_inline_image(data, service.max_file_size())?;
    let size = image.bytes.len() as u64;

    service
        .submit(InboundUpload {
            original_name: INLINE_FILE_NAME.to_string(),
            content_type: image.content_type,
            declared_size: Some(size),
            body: Box::pin(std::io::Cursor::new(image.bytes)),
        })
        .await
}

#[derive(Debug)]
pub struct DecodedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 image or `data:` URL.
///
/// The MIME type comes from the data URL header, or is sniffed from the
/// decoded bytes when absent.
pub fn decode_inline_image(data: &str, max_file_size: u64) -> Result<DecodedImage, AppError> {
    let data = data.trim();
    if data.is_empty() {
        return Err(AppError::MissingImage);
    }

    let (declared_type, payload) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| AppError::InvalidInput("Malformed data URL".to_string()))?;
            let mut params = header.split(';');
            let mime = params.next().map(normalize_mime_type).unwrap_or_default();
            if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
                return Err(AppError::InvalidInput(
                    "Inline image must be base64 encoded".to_string(),
                ));
            }
            (Some(mime).filter(|m| !m.is_empty()), payload)
        }
        None => (None, data),
    };

    // Reject before decoding anything that cannot fit once decoded.
    let encoded_len = payload.len() as u64;
    if encoded_len / 4 * 3 > max_file_size + 2 {
        return Err(AppError::PayloadTooLarge(format!(
            "inline image of about {} bytes exceeds max {} bytes",
            encoded_len / 4 * 3,
            max_file_size
        )));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 image: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::MissingImage);
    }

    let content_type = declared_type
        .or_else(|| sniff_image_type(&bytes).map(str::to_string))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(DecodedImage {
        content_type,
        bytes,
    })
}

/// Identify common image formats by their magic bytes
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}
