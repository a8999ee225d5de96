/*!
# Introduction

ignition-config assembles the first-boot Ignition configs that cluster nodes consume before any
cluster software runs.

A [`Document`] collects files, users, systemd units, trust anchors and references to remote
configs, and renders them in the wire format of one Ignition spec generation.
The library can:
* Embed file contents as `data:` URLs, and read them back.
* Split a concatenated PEM bundle into one trust anchor per certificate.
* Build pointer configs, which fetch the real config from the machine config server.
* Build shim configs, which fetch the bootstrap config from an endpoint secured by a private CA.
* Refuse to render a config that is too large to pass as instance user data.
* Inject the install record into a rendered bootstrap config.
* Wrap configs in role-scoped `MachineConfig` manifests.

# Generations

Both the 2.x ([`V2`]) and 3.x ([`V3`]) wire formats are always available.
The build selects one as [`Current`], using the `IGNITION_GENERATION` environment variable read
by `build.rs`; it defaults to `v2`.
*/

#![deny(rust_2018_idioms)]

#[macro_use]
extern crate log;

pub mod dataurl;
pub mod document;
mod error;
pub mod file;
pub mod install_info;
pub mod machine_config;
pub mod merge;
pub mod model;
pub mod pointer;
pub mod schema;
pub mod size;
pub mod systemd;
pub mod trust_bundle;

pub use document::{Document, ADMIN_USER};
pub use error::{Error, Result};
pub use ignition_generation::Generation;
pub use schema::{Schema, V2, V3};

/// The schema selected at build time.
#[cfg(not(ignition_generation = "v3"))]
pub type Current = V2;

/// The schema selected at build time.
#[cfg(ignition_generation = "v3")]
pub type Current = V3;

/// A document rendered with the schema selected at build time.
pub type Config = Document<Current>;
