//! Run photo rules: accepted content types and storage object keys.

use std::str::FromStr;

use myrun_core::AppError;
use serde::{Deserialize, Serialize};

/// Image formats accepted for run photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageContentType {
    /// `image/png`
    Png,
    /// `image/jpeg` or `image/jpg`
    Jpeg,
    /// `image/webp`
    Webp,
    /// `image/gif`
    Gif,
}

impl ImageContentType {
    /// Returns the canonical MIME type sent to object storage.
    #[must_use]
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }
}

impl FromStr for ImageContentType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((kind, subtype)) = value.split_once('/') else {
            return Err(unsupported_image_type(value));
        };
        if !kind.eq_ignore_ascii_case("image") {
            return Err(unsupported_image_type(value));
        }

        match subtype.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "gif" => Ok(Self::Gif),
            _ => Err(unsupported_image_type(value)),
        }
    }
}

fn unsupported_image_type(value: &str) -> AppError {
    AppError::Validation(format!(
        "unsupported image type '{value}', expected PNG, JPG, WEBP or GIF"
    ))
}

/// Builds the storage key for an uploaded photo.
///
/// The key is `<millis>-<file name>` with every whitespace run replaced by a
/// single `-`. Only the last path component of `file_name` is kept.
#[must_use]
pub fn image_object_key(file_name: &str, uploaded_at_millis: i64) -> String {
    let base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    collapse_whitespace(&format!("{uploaded_at_millis}-{base_name}"))
}

fn collapse_whitespace(value: &str) -> String {
    let mut collapsed = String::with_capacity(value.len());
    let mut in_whitespace = false;

    for character in value.chars() {
        if character.is_whitespace() {
            if !in_whitespace {
                collapsed.push('-');
            }
            in_whitespace = true;
        } else {
            collapsed.push(character);
            in_whitespace = false;
        }
    }

    collapsed
}
