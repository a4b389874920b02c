use std::{io::Cursor, path::Path};

use anyhow::Context as _;
use base64::Engine as _;

use crate::{
    assets::fetch::ImageFetcher,
    foundation::error::{CardError, CardResult},
};

/// MIME type of every PNG this crate writes.
pub const PNG_MIME: &str = "image/png";

/// A decoded `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUri {
    /// Lower-cased MIME type; `text/plain` when the header omits it.
    pub mime: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Encode `bytes` as a base64 `data:` URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{b64}")
}

/// Parse a base64 `data:` URI. Percent-encoded (non-base64) payloads are rejected since
/// images are never produced in that form.
pub fn parse_data_uri(uri: &str) -> CardResult<DataUri> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| CardError::decode("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CardError::decode("data URI is missing ','"))?;
    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(CardError::decode("data URI payload must be base64"));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| CardError::decode(format!("data URI base64: {e}")))?;
    Ok(DataUri {
        mime: if mime.is_empty() {
            "text/plain".to_string()
        } else {
            mime
        },
        bytes,
    })
}

/// True for `http://` and `https://` sources.
pub fn is_remote(href: &str) -> bool {
    let lower = href.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// True for inline `data:` sources.
pub fn is_data_uri(href: &str) -> bool {
    href.trim_start().starts_with("data:")
}

/// Guess an image MIME type from its magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Read image width and height without decoding the pixels.
pub fn image_dimensions(bytes: &[u8]) -> CardResult<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?;
    reader
        .into_dimensions()
        .map_err(|e| CardError::decode(format!("read image dimensions: {e}")))
}

/// Load image bytes from a data URI, an http(s) URL, or a local file path.
pub fn resolve_bytes(source: &str, fetcher: &dyn ImageFetcher) -> CardResult<Vec<u8>> {
    let source = source.trim();
    if source.is_empty() {
        return Err(CardError::validation("image source must be non-empty"));
    }
    if is_data_uri(source) {
        return Ok(parse_data_uri(source)?.bytes);
    }
    if is_remote(source) {
        return fetcher.fetch(source);
    }
    let path = Path::new(source);
    std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))
        .map_err(CardError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
