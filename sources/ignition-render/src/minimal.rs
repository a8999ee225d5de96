use argh::FromArgs;
use ignition_config::Config;
use snafu::ResultExt;

use crate::error::{self, Result};

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "minimal")]
/// Render a config with nothing but the admin user's SSH keys.
pub(crate) struct Minimal {
    #[argh(option)]
    /// an SSH public key to authorize for the admin user; may be repeated
    ssh_key: Vec<String>,
}

impl Minimal {
    pub(crate) fn run(self) -> Result<String> {
        let mut config = Config::minimal();
        log::info!("Authorizing {} SSH keys", self.ssh_key.len());
        config.add_ssh_keys(self.ssh_key);
        config.to_json().context(error::RenderSnafu)
    }
}
