/*!
# Introduction

ignition-render renders first-boot Ignition configs with `ignition-config`, for operators and
test harnesses that need a config outside of the installer.

The rendered config is written to stdout, or to the path given with `--output`. Log messages go
to stderr so they never mix with the config.

ignition-render can:
* Render a minimal config, optionally authorizing SSH keys for the admin user.
* Render a pointer config that fetches the real config from the machine config server.
* Render a shim config described by a TOML file.
* Inject the install record into a rendered bootstrap config.
* Render a role-scoped `MachineConfig` manifest.

The Ignition spec generation is fixed when `ignition-config` is built.
*/

#![deny(rust_2018_idioms)]

use argh::FromArgs;
use ignition_config::{Current, Schema};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use snafu::ResultExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, io, process};

use crate::error::Result;

pub(crate) mod error;
mod install_info;
mod machine_config;
mod minimal;
mod pointer;
mod shim;

/// Renders first-boot Ignition configs.
#[derive(FromArgs, Debug)]
struct Args {
    #[argh(option, default = "LevelFilter::Info")]
    /// filter level for log messages
    log_level: LevelFilter,

    #[argh(option)]
    /// where to write the rendered config; defaults to stdout
    output: Option<PathBuf>,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Minimal(minimal::Minimal),
    Pointer(pointer::Pointer),
    Shim(shim::Shim),
    InjectInstallInfo(install_info::InjectInstallInfo),
    MachineConfig(machine_config::MachineConfigArgs),
}

fn run() -> Result<()> {
    let args: Args = argh::from_env();

    // TerminalMode::Stderr keeps log messages out of a config written to stdout.
    TermLogger::init(
        args.log_level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context(error::LoggerSnafu)?;

    log::info!(
        "ignition-render started, rendering Ignition {} configs",
        <Current as Schema>::MAX_VERSION
    );

    let rendered = match args.command {
        Commands::Minimal(minimal) => minimal.run()?,
        Commands::Pointer(pointer) => pointer.run()?,
        Commands::Shim(shim) => shim.run()?,
        Commands::InjectInstallInfo(inject) => inject.run()?,
        Commands::MachineConfig(machine_config) => machine_config.run()?,
    };

    write_output(args.output.as_deref(), &rendered)
}

/// Writes the rendered config to `output`, or to stdout if there is none.
fn write_output(output: Option<&Path>, rendered: &str) -> Result<()> {
    match output {
        Some(path) => {
            log::info!("Writing rendered config to '{}'", path.display());
            fs::write(path, rendered).context(error::WriteOutputSnafu { path })
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered).context(error::WriteStdoutSnafu)
        }
    }
}

/// Reads a file named on the command line.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    log::debug!("Reading '{}'", path.display());
    fs::read(path).context(error::ReadInputSnafu { path })
}

/// Reads a text file named on the command line, rejecting anything that isn't UTF-8.
pub(crate) fn read_text_input(path: &Path) -> Result<String> {
    String::from_utf8(read_input(path)?).context(error::InputEncodingSnafu { path })
}

// Returning a Result from main makes it print a Debug representation of the error, but with Snafu
// we have nice Display representations of the error, so we wrap "main" (run) and print any error.
// https://github.com/shepmaster/snafu/issues/110
fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ign");
        write_output(Some(&path), "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn output_to_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.ign");
        assert!(matches!(
            write_output(Some(&path), "{}"),
            Err(error::Error::WriteOutput { .. })
        ));
    }

    #[test]
    fn missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_input(&dir.path().join("absent")),
            Err(error::Error::ReadInput { .. })
        ));
    }

    #[test]
    fn text_input_must_be_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ca.pem");
        fs::write(&path, b"-----BEGIN \xff").unwrap();
        assert!(matches!(
            read_text_input(&path),
            Err(error::Error::InputEncoding { .. })
        ));

        fs::write(&path, "plain text").unwrap();
        assert_eq!(read_text_input(&path).unwrap(), "plain text");
    }

    #[test]
    fn parse_args() {
        let args = Args::from_args(
            &["ignition-render"],
            &[
                "--output",
                "/tmp/out.ign",
                "pointer",
                "--url",
                "https://mcs.example:22623/config/worker",
                "--root-ca",
                "/tmp/ca.pem",
            ],
        )
        .unwrap();
        assert_eq!(args.log_level, LevelFilter::Info);
        assert_eq!(args.output, Some(PathBuf::from("/tmp/out.ign")));
        assert!(matches!(args.command, Commands::Pointer(_)));
    }
}
