//! Decoding of the base64 URL list parameter.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;

use crate::error::CarouselError;

/// Decode a base64 payload into its comma separated URLs, in order.
///
/// Standard base64 is tried first, then the URL-safe alphabet, each with and
/// without padding. Segments are trimmed and blank segments dropped, so an
/// empty payload yields [`CarouselError::NoImages`].
pub fn decode_url_list(payload: &str) -> Result<Vec<String>, CarouselError> {
    let payload = payload.trim();

    let raw = [&STANDARD, &URL_SAFE, &URL_SAFE_NO_PAD, &STANDARD_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(payload).ok())
        .ok_or_else(|| CarouselError::InvalidUrlList {
            message: "payload is not valid base64".to_string(),
        })?;

    let text = String::from_utf8(raw).map_err(|e| CarouselError::InvalidUrlList {
        message: format!("decoded payload is not UTF-8: {e}"),
    })?;

    let urls: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        return Err(CarouselError::NoImages);
    }

    Ok(urls)
}

/// Inverse of [`decode_url_list`], using standard padded base64.
pub fn encode_url_list<S: AsRef<str>>(urls: &[S]) -> String {
    let joined = urls.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
    STANDARD.encode(joined)
}
