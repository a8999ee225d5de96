/*!
This library describes an Ignition spec generation, i.e. the family of config versions sharing one
wire format, and provides the functionality build scripts need to compile generation-specific code.

Exactly one generation is rendered by any given build of `ignition-config`. The choice is made with
the `IGNITION_GENERATION` environment variable, read by that crate's `build.rs`.
*/

use error::Error;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, OptionExt, ResultExt};
use std::env::VarError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The name of the environment variable that selects the generation. Generation-sensitive crates
/// need to be rebuilt if this changes.
pub const GENERATION_ENV: &str = "IGNITION_GENERATION";

/// The name of the `cfg` emitted by [`Generation::emit_cfgs`].
pub const GENERATION_CFG: &str = "ignition_generation";

pub type Result<T> = std::result::Result<T, error::Error>;

pub mod error {
    use snafu::Snafu;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(super)))]
    pub enum Error {
        #[snafu(display(
            "The 'IGNITION_GENERATION' environment variable is missing or unable to be read: {}",
            source
        ))]
        GenerationEnv { source: std::env::VarError },

        #[snafu(display("Ignition generation may not be empty"))]
        Empty,

        #[snafu(display("Unable to read a major version from Ignition generation '{}'", input))]
        MajorVersion { input: String },

        #[snafu(display(
            "Unsupported Ignition generation '{}', expected one of 'v2' or 'v3'",
            input
        ))]
        Unsupported { input: String },
    }
}

/// # Generation
///
/// An Ignition spec generation. Configs within one generation share their wire format, and the
/// newest version of the generation is what documents are tagged with.
///
/// Generations may be written as the bare major version or as any version in the generation, with
/// or without a leading `v`:
/// - `v2`, `2`, `2.2`, `2.4.0`
/// - `v3`, `3`, `3.0`, `3.1.0`
///
/// # Example
///
/// ```rust
/// use ignition_generation::Generation;
/// let generation: Generation = "3.1.0".parse().unwrap();
///
/// assert_eq!(generation, Generation::V3);
/// assert_eq!(generation.to_string(), "v3");
///
/// // In a `build.rs` file, you may want to emit cfgs that you can use for conditional compilation.
/// generation.emit_cfgs();
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum Generation {
    /// Ignition 2.x, rendered as version 2.4.0.
    #[default]
    V2,
    /// Ignition 3.x, rendered as version 3.1.0.
    V3,
}

impl Generation {
    /// Create a `Generation` from the `IGNITION_GENERATION` environment variable's value, which
    /// must name a supported generation. An unset environment variable yields the default
    /// generation.
    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var(GENERATION_ENV) {
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(source) => Err(source).context(error::GenerationEnvSnafu),
            Ok(value) => value.parse(),
        }
    }

    /// The major Ignition version of this generation.
    pub fn major(&self) -> u32 {
        match self {
            Generation::V2 => 2,
            Generation::V3 => 3,
        }
    }

    /// The identifier used for this generation in the emitted `cfg`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::V2 => "v2",
            Generation::V3 => "v3",
        }
    }

    /// This can be used in a `build.rs` file to tell cargo that the crate needs to be rebuilt if
    /// the generation changes.
    pub fn rerun_if_changed() {
        println!("cargo:rerun-if-env-changed={}", GENERATION_ENV);
    }

    /// This can be used in a `build.rs` file to emit a `cfg` value for conditional compilation
    /// based on the generation. This function also emits rerun-if-changed so that
    /// generation-sensitive builds will rebuild if the generation changes.
    ///
    /// # Example
    ///
    /// Given the generation `v3`, if this function has been called in `build.rs`, then
    /// `#[cfg(ignition_generation = "v3")]` evaluates to `true`.
    pub fn emit_cfgs(&self) {
        Self::rerun_if_changed();
        println!(
            "cargo:rustc-check-cfg=cfg({}, values(\"v2\", \"v3\"))",
            GENERATION_CFG
        );
        println!("cargo:rustc-cfg={}=\"{}\"", GENERATION_CFG, self.as_str());
    }

    fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        ensure!(!trimmed.is_empty(), error::EmptySnafu);
        let version = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let major = version
            .split('.')
            .next()
            .and_then(|major| major.parse::<u32>().ok())
            .context(error::MajorVersionSnafu { input: value })?;
        match major {
            2 => Ok(Generation::V2),
            3 => Ok(Generation::V3),
            _ => error::UnsupportedSnafu { input: value }.fail(),
        }
    }
}

impl FromStr for Generation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Generation::parse(s)
    }
}

impl TryFrom<&str> for Generation {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Generation::parse(value)
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Generation {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Generation {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Generation, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Generation::parse(&value)
            .map_err(|e| D::Error::custom(format!("Error parsing Ignition generation: {}", e)))
    }
}

#[test]
fn parse_ok() {
    struct Test {
        input: &'static str,
        generation: Generation,
        major: u32,
    }

    let tests = vec![
        Test {
            input: "v2",
            generation: Generation::V2,
            major: 2,
        },
        Test {
            input: "2.2",
            generation: Generation::V2,
            major: 2,
        },
        Test {
            input: "2.4.0",
            generation: Generation::V2,
            major: 2,
        },
        Test {
            input: " V3 ",
            generation: Generation::V3,
            major: 3,
        },
        Test {
            input: "3.1.0",
            generation: Generation::V3,
            major: 3,
        },
    ];

    for test in tests {
        let parsed: Generation = test.input.parse().unwrap();
        assert_eq!(parsed, test.generation);
        assert_eq!(parsed.major(), test.major);
    }
}

#[test]
fn parse_err() {
    let tests = vec!["", "  ", "v", "vx", "1", "4.0.0", "two"];
    for test in tests {
        let result = Generation::try_from(test);
        assert!(
            result.is_err(),
            "Expected Generation::try_from(\"{}\") to return an error",
            test
        );
    }
}

#[test]
fn serde_round_trip() {
    let json = serde_json::to_string(&Generation::V3).unwrap();
    assert_eq!(json, "\"v3\"");
    let parsed: Generation = serde_json::from_str("\"2.4\"").unwrap();
    assert_eq!(parsed, Generation::V2);
    assert!(serde_json::from_str::<Generation>("\"5\"").is_err());
}

#[test]
fn from_env() {
    // The only test touching the environment, so nothing races with it
    std::env::set_var(GENERATION_ENV, "3.1");
    assert_eq!(Generation::from_env_or_default().unwrap(), Generation::V3);
    std::env::set_var(GENERATION_ENV, "v4");
    assert!(Generation::from_env_or_default().is_err());
    std::env::remove_var(GENERATION_ENV);
    assert_eq!(Generation::from_env_or_default().unwrap(), Generation::V2);
}
