use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogoError {
    #[error("No logo data provided")]
    Missing,

    #[error("Logo must be a data URL of the form data:image/<type>;base64,<data>")]
    NotDataUrl,

    #[error("Unsupported image type '{0}'. Allowed: png, jpeg, jpg, gif, webp")]
    UnsupportedType(String),

    #[error("Logo exceeds the maximum size of {0} bytes")]
    TooLarge(usize),

    #[error("Invalid base64 image data")]
    InvalidBase64,

    #[error("Image content does not match declared type '{0}'")]
    ContentMismatch(String),
}

impl From<LogoError> for ApiError {
    fn from(err: LogoError) -> Self {
        ApiError::invalid_field("logo_base64", err.to_string())
    }
}

const ALLOWED_TYPES: &[&str] = &["png", "jpeg", "jpg", "gif", "webp"];

fn magic_matches(image_type: &str, bytes: &[u8]) -> bool {
    match image_type {
        "png" => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "jpeg" | "jpg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "gif" => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        "webp" => bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP",
        _ => false,
    }
}

/// Decoded size implied by a base64 payload, without decoding it
fn estimated_size(payload: &str) -> usize {
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    (payload.len() / 4 * 3).saturating_sub(padding)
}

/// Validates a `data:image/<type>;base64,<payload>` logo and returns it normalized
pub fn validate_logo(data_url: &str, max_bytes: usize) -> Result<String, LogoError> {
    let data_url = data_url.trim();
    if data_url.is_empty() {
        return Err(LogoError::Missing);
    }

    let rest = data_url.strip_prefix("data:image/").ok_or(LogoError::NotDataUrl)?;
    let (image_type, payload) = rest.split_once(";base64,").ok_or(LogoError::NotDataUrl)?;
    let image_type = image_type.to_ascii_lowercase();
    if !ALLOWED_TYPES.contains(&image_type.as_str()) {
        return Err(LogoError::UnsupportedType(image_type));
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if payload.is_empty() {
        return Err(LogoError::Missing);
    }
    if estimated_size(&payload) > max_bytes {
        return Err(LogoError::TooLarge(max_bytes));
    }

    let bytes = STANDARD.decode(payload.as_bytes()).map_err(|_| LogoError::InvalidBase64)?;
    if bytes.len() > max_bytes {
        return Err(LogoError::TooLarge(max_bytes));
    }
    if !magic_matches(&image_type, &bytes) {
        return Err(LogoError::ContentMismatch(image_type));
    }

    Ok(format!("data:image/{};base64,{}", image_type, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    fn png_url() -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(PNG_HEADER))
    }

    #[test]
    fn accepts_valid_png() {
        let url = png_url();
        assert_eq!(validate_logo(&url, 1024).unwrap(), url);
    }

    #[test]
    fn rejects_malformed_inputs() {
        assert_eq!(validate_logo("  ", 1024), Err(LogoError::Missing));
        assert_eq!(validate_logo("https://x/logo.png", 1024), Err(LogoError::NotDataUrl));
        assert_eq!(validate_logo("data:image/png,abc", 1024), Err(LogoError::NotDataUrl));
        assert_eq!(
            validate_logo("data:image/bmp;base64,Qk0=", 1024),
            Err(LogoError::UnsupportedType("bmp".into()))
        );
        assert_eq!(validate_logo("data:image/png;base64,@@@@", 1024), Err(LogoError::InvalidBase64));
    }

    #[test]
    fn rejects_mismatched_content() {
        let url = format!("data:image/gif;base64,{}", STANDARD.encode(PNG_HEADER));
        assert_eq!(validate_logo(&url, 1024), Err(LogoError::ContentMismatch("gif".into())));
    }

    #[test]
    fn rejects_oversized_before_decoding() {
        let big = "A".repeat(4000);
        let url = format!("data:image/png;base64,{}", big);
        assert_eq!(validate_logo(&url, 1000), Err(LogoError::TooLarge(1000)));
    }

    #[test]
    fn size_estimate_accounts_for_padding() {
        assert_eq!(estimated_size(&STANDARD.encode([1u8; 10])), 10);
        assert_eq!(estimated_size(&STANDARD.encode([1u8; 12])), 12);
    }
}
