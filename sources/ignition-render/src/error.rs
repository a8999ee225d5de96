use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub(crate) enum Error {
    #[snafu(display("Logger setup error: {}", source))]
    Logger { source: log::SetLoggerError },

    #[snafu(display("Failed to read '{}': {}", path.display(), source))]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("'{}' is not valid UTF-8: {}", path.display(), source))]
    InputEncoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[snafu(display("Failed to parse shim config '{}': {}", path.display(), source))]
    ShimConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[snafu(display("Failed to write output to '{}': {}", path.display(), source))]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to write output to stdout: {}", source))]
    WriteStdout { source: std::io::Error },

    #[snafu(display(
        "Exactly one of --ssh-key, --fips or --disable-hyperthreading must be given, found {}",
        count
    ))]
    MachineConfigKind { count: usize },

    #[snafu(display("{}", source))]
    Render { source: ignition_config::Error },
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
