//! Storage URL layout and object path normalization.
//!
//! Stored run rows reference photos by full URL. Listing needs the bare
//! `<bucket>/<key>` object path to request a fresh signed URL, whether the row
//! holds a public URL, an older signed URL, or just a file name.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

/// Bytes escaped inside one key segment so the key survives URL parsing.
const KEY_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Path prefix of public object URLs.
pub const PUBLIC_OBJECT_PATH_PREFIX: &str = "/storage/v1/object/public/";

/// Path prefix of signed object URLs.
pub const SIGNED_OBJECT_PATH_PREFIX: &str = "/storage/v1/object/sign/";

/// Returns the public URL of `key` inside `bucket`.
///
/// Key segments are percent-encoded; [`normalize_object_path`] decodes them
/// back to the stored key.
#[must_use]
pub fn public_object_url(base_url: &str, bucket: &str, key: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{}{PUBLIC_OBJECT_PATH_PREFIX}{bucket}/{encoded_key}",
        base_url.trim_end_matches('/')
    )
}

/// Converts a stored image reference into a `<bucket>/<key>` object path.
///
/// Never fails: input that is neither a recognised storage URL nor a path is
/// passed through, and a bare file name is placed in `bucket`. Paths taken from
/// storage URLs are percent-decoded, so the result is the key as uploaded.
#[must_use]
pub fn normalize_object_path(source: Option<&str>, bucket: &str) -> Option<String> {
    let source = source.map(str::trim).filter(|value| !value.is_empty())?;

    if let Ok(url) = Url::parse(source) {
        let path = url.path();
        let object_path = path
            .strip_prefix(SIGNED_OBJECT_PATH_PREFIX)
            .or_else(|| path.strip_prefix(PUBLIC_OBJECT_PATH_PREFIX));
        if let Some(object_path) = object_path {
            return Some(decode_object_path(object_path));
        }
    }

    if source.contains('/') {
        Some(source.to_owned())
    } else {
        Some(format!("{bucket}/{source}"))
    }
}

// Invalid UTF-8 after decoding keeps the encoded form.
fn decode_object_path(encoded: &str) -> String {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| encoded.to_owned())
}

/// Strips a leading `<bucket>/` so the path can be addressed within the bucket.
#[must_use]
pub fn bucket_relative_key<'a>(object_path: &'a str, bucket: &str) -> &'a str {
    object_path
        .strip_prefix(bucket)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(object_path)
}
