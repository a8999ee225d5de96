use argh::FromArgs;
use ignition_config::install_info::inject_install_info;
use ignition_config::Current;
use snafu::ResultExt;
use std::path::PathBuf;

use crate::error::{self, Result};
use crate::read_input;

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "inject-install-info")]
/// Add the install record to a rendered bootstrap config.
pub(crate) struct InjectInstallInfo {
    #[argh(option)]
    /// path to the rendered bootstrap config
    bootstrap: PathBuf,

    #[argh(option)]
    /// path to the rendered install record
    install_info: PathBuf,
}

impl InjectInstallInfo {
    pub(crate) fn run(self) -> Result<String> {
        let bootstrap = read_input(&self.bootstrap)?;
        let install_info = read_input(&self.install_info)?;
        log::info!(
            "Injecting '{}' into '{}'",
            self.install_info.display(),
            self.bootstrap.display()
        );
        inject_install_info::<Current>(&bootstrap, &install_info).context(error::RenderSnafu)
    }
}
