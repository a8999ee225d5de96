use argh::FromArgs;
use ignition_config::Config;
use snafu::ResultExt;
use std::path::PathBuf;

use crate::error::{self, Result};
use crate::read_input;

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "pointer")]
/// Render a config that fetches the real config from the machine config server.
pub(crate) struct Pointer {
    #[argh(option)]
    /// URL of the config to fetch
    url: String,

    #[argh(option)]
    /// path to the CA certificate the machine config server presents
    root_ca: PathBuf,
}

impl Pointer {
    pub(crate) fn run(self) -> Result<String> {
        let root_ca = read_input(&self.root_ca)?;
        log::info!("Rendering pointer to '{}'", self.url);
        Config::pointer(self.url, &root_ca)
            .to_json()
            .context(error::RenderSnafu)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ignition_config::dataurl;
    use serde_json::Value;
    use std::fs;

    #[test]
    fn renders_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let root_ca = dir.path().join("root-ca.pem");
        fs::write(&root_ca, "-----BEGIN CERTIFICATE-----\n").unwrap();

        let pointer = Pointer {
            url: "https://api-int.example:22623/config/worker".to_string(),
            root_ca,
        };
        let value: Value = serde_json::from_str(&pointer.run().unwrap()).unwrap();
        let source = value["ignition"]["security"]["tls"]["certificateAuthorities"][0]["source"]
            .as_str()
            .unwrap();
        assert_eq!(
            dataurl::decode(source).unwrap().data,
            b"-----BEGIN CERTIFICATE-----\n"
        );
        assert!(value["ignition"]["config"].to_string().contains("/config/worker"));
    }
}
