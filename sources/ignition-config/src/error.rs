use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display("Unable to parse certificate bundle: {}", source))]
    MalformedTrustBundle { source: crate::trust_bundle::Error },

    #[snafu(display(
        "Rendered Ignition config is {} bytes once base64-encoded, exceeding the {} byte limit for instance user data; try reducing the size of the CA certificate bundle",
        size,
        limit
    ))]
    DocumentTooLarge { size: usize, limit: usize },

    #[snafu(display("Failed to serialize {} Ignition config: {}", what, source))]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },

    #[snafu(display("Failed to deserialize {} Ignition config: {}", what, source))]
    Deserialize {
        what: &'static str,
        source: serde_json::Error,
    },

    #[snafu(display("Bootstrap Ignition config's 'storage.files' is not a list"))]
    BootstrapFiles,

    #[snafu(display("Data URL must start with 'data:'"))]
    DataUrlScheme,

    #[snafu(display("Data URL is missing the ',' separating media type from data"))]
    DataUrlSeparator,

    #[snafu(display("Invalid base64 in data URL: {}", source))]
    DataUrlBase64 { source: base64::DecodeError },
}

pub type Result<T> = std::result::Result<T, Error>;
