use argh::FromArgs;
use ignition_config::machine_config::MachineConfig;
use ignition_config::Current;
use snafu::{ensure, ResultExt};

use crate::error::{self, Result};

#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "machine-config")]
/// Render a MachineConfig manifest for the nodes of one role.
pub(crate) struct MachineConfigArgs {
    #[argh(option)]
    /// the node role the manifest applies to, such as 'master' or 'worker'
    role: String,

    #[argh(option)]
    /// authorize this SSH public key for the admin user
    ssh_key: Option<String>,

    #[argh(switch)]
    /// enable FIPS mode
    fips: bool,

    #[argh(switch)]
    /// disable simultaneous multithreading
    disable_hyperthreading: bool,
}

impl MachineConfigArgs {
    fn select(&self) -> Result<MachineConfig<Current>> {
        let count = usize::from(self.ssh_key.is_some())
            + usize::from(self.fips)
            + usize::from(self.disable_hyperthreading);
        ensure!(count == 1, error::MachineConfigKindSnafu { count });

        Ok(match &self.ssh_key {
            Some(key) => MachineConfig::for_authorized_keys(key, &self.role),
            None if self.fips => MachineConfig::for_fips_enabled(&self.role),
            None => MachineConfig::for_hyperthreading_disabled(&self.role),
        })
    }

    pub(crate) fn run(self) -> Result<String> {
        let machine_config = self.select()?;
        log::info!("Rendering machine config '{}'", machine_config.name());
        machine_config.to_json().context(error::RenderSnafu)
    }
}
