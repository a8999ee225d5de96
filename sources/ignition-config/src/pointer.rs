//! The pointer module builds documents whose job is to fetch the real config from elsewhere.
//!
//! A pointer document references the config served by the machine config server and trusts the
//! CA it presents. A shim document is used when the bootstrap config sits behind an endpoint
//! secured by a self-signed or private CA: besides the reference, it carries the user's CA bundle
//! split into one trust anchor per certificate, an auth token header for the fetch, and the
//! bootstrap host's name. Ignition can't be given the bundle any later, because the security
//! section has to be in place before the fetch happens.

use crate::dataurl;
use crate::document::Document;
use crate::error::{self, Result};
use crate::model::{FetchDirective, ManagedFile, TrustAnchor};
use crate::schema::Schema;
use crate::size::MAX_USER_DATA_SIZE;
use crate::trust_bundle;
use snafu::ResultExt;

/// Where the shim writes the bootstrap host's name.
pub const HOSTNAME_PATH: &str = "/etc/hostname";

/// Where the shim writes the user's CA bundle for later consumers on the host.
pub const CLOUD_CA_CERT_PATH: &str = "/opt/openshift/tls/cloud-ca-cert.pem";

/// The header authenticating the shim's fetch of the bootstrap config.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

// 0644
const SHIM_FILE_MODE: u32 = 0o644;

impl<S: Schema> Document<S> {
    /// Returns a document that merges the config at `url`, trusting `root_ca` as a single
    /// certificate authority.
    pub fn pointer<U>(url: U, root_ca: &[u8]) -> Self
    where
        U: Into<String>,
    {
        let mut document = Self::minimal();
        document.fetch_directives.push(FetchDirective::merge(url));
        document
            .trust_anchors
            .push(TrustAnchor::new(dataurl::encode(root_ca)));
        document
    }

    /// Returns a document that merges the bootstrap config at `bootstrap_config_url` with the
    /// given auth token, trusting each certificate in `user_ca`.
    ///
    /// An empty `user_ca` adds no trust anchors; a bundle that can't be parsed fails with
    /// [`Error::MalformedTrustBundle`](crate::Error::MalformedTrustBundle).
    pub fn shim(
        user_ca: &str,
        cluster_id: &str,
        bootstrap_config_url: &str,
        token_id: &str,
    ) -> Result<Self> {
        let mut document = Self::minimal();

        let hostname = format!("{}-bootstrap", cluster_id);
        document.files.push(ManagedFile::new(
            HOSTNAME_PATH,
            None,
            Some(SHIM_FILE_MODE),
            dataurl::encode(hostname.as_bytes()),
        ));
        document.files.push(ManagedFile::new(
            CLOUD_CA_CERT_PATH,
            None,
            Some(SHIM_FILE_MODE),
            dataurl::encode(user_ca.as_bytes()),
        ));

        if !user_ca.is_empty() {
            document.trust_anchors = trust_bundle::split(user_ca.as_bytes())
                .context(error::MalformedTrustBundleSnafu)?;
        }

        document.fetch_directives.push(
            FetchDirective::merge(bootstrap_config_url).with_header(AUTH_TOKEN_HEADER, token_id),
        );

        debug!(
            "Built shim for '{}' with {} trust anchors",
            hostname,
            document.trust_anchors.len()
        );
        Ok(document)
    }
}

/// Renders the shim document to JSON, failing if it is too large to pass as instance user data.
pub fn render_shim<S: Schema>(
    user_ca: &str,
    cluster_id: &str,
    bootstrap_config_url: &str,
    token_id: &str,
) -> Result<String> {
    Document::<S>::shim(user_ca, cluster_id, bootstrap_config_url, token_id)?
        .to_bounded_json(MAX_USER_DATA_SIZE)
}
