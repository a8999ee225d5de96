//! The size module bounds rendered documents that travel through instance user data, which
//! metadata services such as OpenStack Nova cap at 64KB after base64 encoding.

use crate::document::Document;
use crate::error::{self, Result};
use crate::schema::Schema;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use snafu::ensure;

/// The largest base64-encoded document accepted as instance user data.
pub const MAX_USER_DATA_SIZE: usize = 65535;

/// Fails if `data` exceeds `limit` bytes once base64-encoded.
pub fn ensure_within_limit(data: &[u8], limit: usize) -> Result<()> {
    check_encoded_size(STANDARD.encode(data).len(), limit)
}

fn check_encoded_size(size: usize, limit: usize) -> Result<()> {
    trace!("Rendered config is {} bytes base64-encoded, limit {}", size, limit);
    ensure!(size <= limit, error::DocumentTooLargeSnafu { size, limit });
    Ok(())
}

impl<S: Schema> Document<S> {
    /// Serializes the document to JSON, failing if the result exceeds `limit` bytes once
    /// base64-encoded. Nothing is truncated; callers shrink their inputs instead.
    pub fn to_bounded_json(&self, limit: usize) -> Result<String> {
        let json = self.to_json()?;
        ensure_within_limit(json.as_bytes(), limit)?;
        Ok(json)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::file::file_from_bytes;
    use crate::schema::V2;

    #[test]
    fn limit_boundary() {
        assert!(check_encoded_size(MAX_USER_DATA_SIZE, MAX_USER_DATA_SIZE).is_ok());
        assert!(matches!(
            check_encoded_size(MAX_USER_DATA_SIZE + 1, MAX_USER_DATA_SIZE),
            Err(crate::Error::DocumentTooLarge {
                size: 65536,
                limit: 65535
            })
        ));
    }

    #[test]
    fn encoded_length_is_measured() {
        // 49149 raw bytes encode to 65532 base64 bytes, 49150 to 65536
        assert!(ensure_within_limit(&vec![b'a'; 49149], MAX_USER_DATA_SIZE).is_ok());
        assert!(ensure_within_limit(&vec![b'a'; 49150], MAX_USER_DATA_SIZE).is_err());
        assert!(ensure_within_limit(b"", 0).is_ok());
    }

    #[test]
    fn bounded_document() {
        let mut document = Document::<V2>::minimal();
        assert!(document.to_bounded_json(MAX_USER_DATA_SIZE).is_ok());

        document.merge_file(file_from_bytes("/etc/big", "root", 0o644, &vec![b'a'; 60000]));
        let before = document.clone();
        let err = document.to_bounded_json(MAX_USER_DATA_SIZE).unwrap_err();
        assert!(err.to_string().contains("CA certificate bundle"));
        assert_eq!(document, before);
    }
}
