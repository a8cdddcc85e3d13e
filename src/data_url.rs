//! Splitting browser data URLs into the media type and base64 payload the
//! upstream API expects.

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;

/// Sent upstream whenever the data URL does not declare an image type.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Enough base64 to cover every magic number `image` checks for.
const SNIFF_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub media_type: String,
    pub data: String,
}

impl ImagePayload {
    /// `data:image/png;base64,AAAA` becomes `("image/png", "AAAA")`.
    ///
    /// The media type is only recognised as `image/` followed by word
    /// characters; anything else (including `image/svg+xml`) falls back to
    /// JPEG. The payload is forwarded untouched when the prefix is missing.
    pub fn from_data_url(input: &str) -> Self {
        let declared = declared_image_type(input);

        let data = declared
            .and_then(|media_type| {
                input
                    .strip_prefix("data:")?
                    .strip_prefix(media_type)?
                    .strip_prefix(";base64,")
            })
            .unwrap_or(input);

        ImagePayload {
            media_type: declared.unwrap_or(DEFAULT_MEDIA_TYPE).to_string(),
            data: data.to_string(),
        }
    }

    /// Guesses the real format from the payload's leading bytes.
    pub fn sniff_media_type(&self) -> Option<&'static str> {
        let head: String = self
            .data
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
            .take(SNIFF_CHARS)
            .collect();
        // Decode whole quads only so a truncated tail never trips the decoder.
        let head = &head[..head.len() - head.len() % 4];
        let bytes = general_purpose::STANDARD.decode(head).ok()?;

        image::guess_format(&bytes).ok().and_then(media_type_of)
    }
}

/// Matches `data:image/<word>;` at the start of `input`, returning `image/<word>`.
fn declared_image_type(input: &str) -> Option<&str> {
    let rest = input.strip_prefix("data:")?;
    let subtype = rest.strip_prefix("image/")?;
    let word_len = subtype
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();

    if word_len == 0 || subtype.as_bytes().get(word_len) != Some(&b';') {
        return None;
    }
    Some(&rest[.."image/".len() + word_len])
}

fn media_type_of(format: ImageFormat) -> Option<&'static str> {
    let media_type = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Avif => "image/avif",
        _ => return None,
    };
    Some(media_type)
}
