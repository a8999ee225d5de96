//! The dataurl module embeds file and certificate contents in Ignition documents as RFC 2397
//! `data:` URLs.

use crate::error::{self, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;
use snafu::{OptionExt, ResultExt};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

// RFC 2397 section 2: the media type an empty header stands for.
const DEFAULT_MEDIA_TYPE: &str = "text/plain;charset=US-ASCII";

// Only the leading bytes of the content are inspected when guessing its media type.
const SNIFF_LEN: usize = 512;

const TEXT_MEDIA_TYPE: &str = "text/plain;charset=utf-8";
const BINARY_MEDIA_TYPE: &str = "application/octet-stream";

/// Magic prefixes checked, in order, before falling back to the text/binary heuristic.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\xfe\xff", "text/plain;charset=utf-16be"),
    (b"\xff\xfe", "text/plain;charset=utf-16le"),
    (b"\xef\xbb\xbf", TEXT_MEDIA_TYPE),
    (b"%PDF-", "application/pdf"),
    (b"\x1f\x8b\x08", "application/x-gzip"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x89PNG\x0d\x0a\x1a\x0a", "image/png"),
];

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Encodes arbitrary bytes, including an empty slice, as a base64 `data:` URL labelled with the
/// media type detected from the content.
pub fn encode(data: &[u8]) -> String {
    format!(
        "{}{}{},{}",
        SCHEME,
        media_type(data),
        BASE64_MARKER,
        STANDARD.encode(data)
    )
}

/// Guesses the media type of `data` from its leading bytes.
pub fn media_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];
    if let Some((_, media_type)) = SIGNATURES
        .iter()
        .find(|(magic, _)| head.starts_with(magic))
    {
        return *media_type;
    }

    if head.iter().copied().any(is_binary) {
        BINARY_MEDIA_TYPE
    } else {
        TEXT_MEDIA_TYPE
    }
}

// Control bytes that don't show up in text files.
fn is_binary(byte: u8) -> bool {
    matches!(byte, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f)
}

/// Parses a `data:` URL, accepting both base64 and percent-encoded payloads.
pub fn decode(url: &str) -> Result<DataUrl> {
    let rest = url.strip_prefix(SCHEME).context(error::DataUrlSchemeSnafu)?;
    let (header, payload) = rest
        .split_once(',')
        .context(error::DataUrlSeparatorSnafu)?;

    let (media_type, data) = match header.strip_suffix(BASE64_MARKER) {
        Some(media_type) => (
            media_type,
            STANDARD
                .decode(payload)
                .context(error::DataUrlBase64Snafu)?,
        ),
        None => (header, percent_decode_str(payload).collect()),
    };

    let media_type = if media_type.is_empty() {
        DEFAULT_MEDIA_TYPE.to_string()
    } else {
        media_type.to_string()
    };

    Ok(DataUrl { media_type, data })
}
