//! The trust_bundle module splits a concatenated PEM bundle into one [`TrustAnchor`] per
//! certificate, each re-encoded from its own decoded block so every anchor carries canonical PEM
//! framing.
//!
//! Text before a block, such as the `# Subject` comments found in system bundles, is skipped.
//! Each block may be followed by the line ending of its END line. Any other bytes after the last
//! block are an error, as is a non-empty bundle without any block.

use crate::dataurl;
use crate::model::TrustAnchor;
use pem::{EncodeConfig, LineEnding};
use snafu::{OptionExt, ResultExt, Snafu};

// PEM delimiters
const PEM_HEADER: &str = "-----BEGIN";
const PEM_FOOTER: &str = "-----END";
const PEM_SUFFIX: &str = "-----";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display(
        "no complete PEM block found at byte {}; check the CA certificates supplied",
        offset
    ))]
    NoBlock { offset: usize },

    #[snafu(display("invalid PEM block at byte {}: {}", offset, source))]
    InvalidBlock {
        offset: usize,
        source: pem::PemError,
    },
}

/// Splits `bundle` into trust anchors, preserving the order of the certificates. An empty bundle
/// yields no anchors.
pub fn split(bundle: &[u8]) -> Result<Vec<TrustAnchor>, Error> {
    let mut anchors = Vec::new();
    let mut offset = 0;

    while offset < bundle.len() {
        let rest = &bundle[offset..];
        let (start, end) = find_block(rest).context(NoBlockSnafu { offset })?;
        let block = pem::parse(&rest[start..end]).context(InvalidBlockSnafu {
            offset: offset + start,
        })?;

        match subject(&block.contents) {
            Some(subject) => debug!("Adding trust anchor for '{}'", subject),
            None => debug!("Adding trust anchor for {} block", block.tag),
        }
        let canonical = pem::encode_config(
            &block,
            EncodeConfig {
                line_ending: LineEnding::LF,
            },
        );
        anchors.push(TrustAnchor::new(dataurl::encode(canonical.as_bytes())));

        offset += end + line_ending_len(&rest[end..]);
    }

    trace!("Split trust bundle into {} anchors", anchors.len());
    Ok(anchors)
}

/// Returns the byte range of the first complete `-----BEGIN ...-----`/`-----END ...-----` block.
fn find_block(data: &[u8]) -> Option<(usize, usize)> {
    let start = find(data, PEM_HEADER.as_bytes())?;
    let footer = start + find(&data[start..], PEM_FOOTER.as_bytes())?;
    let label = footer + PEM_FOOTER.len();
    let end = label + find(&data[label..], PEM_SUFFIX.as_bytes())? + PEM_SUFFIX.len();
    Some((start, end))
}

// The line ending that closes an END line belongs to its block; anything after it doesn't.
fn line_ending_len(data: &[u8]) -> usize {
    if data.starts_with(b"\r\n") {
        2
    } else if data.starts_with(b"\n") {
        1
    } else {
        0
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Returns a string from the common name, organizational unit or organization fields of a DER
/// certificate, if it is one.
fn subject(der: &[u8]) -> Option<String> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;
    let subject = &cert.tbs_certificate.subject;
    let name = subject
        .iter_common_name()
        .chain(subject.iter_organizational_unit())
        .chain(subject.iter_organization())
        .next()?;

    name.as_str().ok().map(|name| name.to_string())
}
