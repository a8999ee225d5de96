use argh::FromArgs;
use ignition_config::pointer::render_shim;
use ignition_config::Current;
use serde::Deserialize;
use snafu::ResultExt;
use std::path::{Path, PathBuf};

use crate::error::{self, Result};
use crate::read_text_input;

const DEFAULT_CONFIG_PATH: &str = "/etc/ignition-render/shim.toml";

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "shim")]
/// Render a config that fetches the bootstrap config from an endpoint secured by a private CA.
pub(crate) struct Shim {
    #[argh(option, short = 'c', default = "DEFAULT_CONFIG_PATH.into()")]
    /// path to the shim's TOML config
    config_path: PathBuf,
}

/// Describes the shim to render.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
struct ShimConfig {
    cluster_id: String,
    bootstrap_config_url: String,
    token_id: String,
    /// Path to a PEM bundle of CAs to trust; none are added if unset.
    ca_bundle: Option<PathBuf>,
}

impl ShimConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let text = read_text_input(path)?;
        toml::from_str(&text).context(error::ShimConfigSnafu { path })
    }
}

impl Shim {
    pub(crate) fn run(self) -> Result<String> {
        let config = ShimConfig::from_file(&self.config_path)?;
        let user_ca = match &config.ca_bundle {
            Some(path) => read_text_input(path)?,
            None => String::new(),
        };

        log::info!("Rendering shim for cluster '{}'", config.cluster_id);
        render_shim::<Current>(
            &user_ca,
            &config.cluster_id,
            &config.bootstrap_config_url,
            &config.token_id,
        )
        .context(error::RenderSnafu)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use serde_json::Value;
    use std::fs;

    static TEST_PEM: &str = include_str!("../../ignition-config/tests/data/test-pem");

    fn write_config(dir: &Path, bundle: &Path) -> PathBuf {
        let path = dir.join("shim.toml");
        let config = format!(
            r#"
cluster-id = "c1"
bootstrap-config-url = "https://swift.example/bootstrap.ign"
token-id = "tok"
ca-bundle = "{}"
"#,
            bundle.display()
        );
        fs::write(&path, config).unwrap();
        path
    }

    #[test]
    fn parse_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shim.toml");
        fs::write(
            &path,
            r#"
cluster-id = "c1"
bootstrap-config-url = "https://swift.example/bootstrap.ign"
token-id = "tok"
"#,
        )
        .unwrap();

        assert_eq!(
            ShimConfig::from_file(&path).unwrap(),
            ShimConfig {
                cluster_id: "c1".to_string(),
                bootstrap_config_url: "https://swift.example/bootstrap.ign".to_string(),
                token_id: "tok".to_string(),
                ca_bundle: None,
            }
        );
    }

    #[test]
    fn missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shim.toml");
        fs::write(&path, "cluster-id = \"c1\"\n").unwrap();
        assert!(matches!(
            ShimConfig::from_file(&path),
            Err(Error::ShimConfig { .. })
        ));
    }

    #[test]
    fn renders_with_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        fs::write(&bundle, TEST_PEM).unwrap();
        let path = write_config(dir.path(), &bundle);

        let rendered = Shim { config_path: path }.run().unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value["ignition"]["security"]["tls"]["certificateAuthorities"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
        assert_eq!(value["storage"]["files"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn bundle_not_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        let mut data = TEST_PEM.as_bytes().to_vec();
        data.extend_from_slice(b"# \xff\xfe\n");
        fs::write(&bundle, data).unwrap();
        let path = write_config(dir.path(), &bundle);

        assert!(matches!(
            Shim { config_path: path }.run(),
            Err(Error::InputEncoding { .. })
        ));
    }

    #[test]
    fn malformed_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        fs::write(&bundle, "not a certificate").unwrap();
        let path = write_config(dir.path(), &bundle);

        assert!(matches!(
            Shim { config_path: path }.run(),
            Err(Error::Render {
                source: ignition_config::Error::MalformedTrustBundle { .. }
            })
        ));
    }
}
