//! The install_info module records how a cluster was installed inside an already-rendered
//! bootstrap config, so the record is laid down on the bootstrap host with everything else.
//!
//! The bootstrap config is edited as parsed JSON rather than through [`Document`], so fields the
//! model doesn't carry, such as directories, links, masked units or file verification, come out
//! as they went in.

use crate::document::Document;
use crate::error::{self, Result};
use crate::file::file_from_bytes;
use crate::model::ManagedFile;
use crate::schema::Schema;
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};

/// Where the install record is written on the bootstrap host.
pub const INSTALL_INFO_PATH: &str = "/opt/openshift/manifests/openshift-install.yaml";

// 0644
const INSTALL_INFO_MODE: u32 = 0o644;

/// Parses `bootstrap` in the wire format of `S`, merges a root-owned file holding the bytes of
/// `install_info`, and returns the re-serialized config.
///
/// A file already at [`INSTALL_INFO_PATH`] is replaced; everything else is kept verbatim.
pub fn inject_install_info<S: Schema>(bootstrap: &[u8], install_info: &[u8]) -> Result<String> {
    // The config must be valid for the schema, even though it's edited as plain JSON.
    serde_json::from_slice::<S::Config>(bootstrap)
        .context(error::DeserializeSnafu { what: "bootstrap" })?;
    let mut config: Map<String, Value> = serde_json::from_slice(bootstrap)
        .context(error::DeserializeSnafu { what: "bootstrap" })?;

    let file = wire_file::<S>(file_from_bytes(
        INSTALL_INFO_PATH,
        "root",
        INSTALL_INFO_MODE,
        install_info,
    ))?;

    let files = files_mut(&mut config).context(error::BootstrapFilesSnafu)?;
    debug!(
        "Injecting install info into bootstrap config with {} files",
        files.len()
    );
    match files
        .iter_mut()
        .find(|existing| existing.get("path").and_then(Value::as_str) == Some(INSTALL_INFO_PATH))
    {
        Some(existing) => *existing = file,
        None => files.push(file),
    }

    serde_json::to_string(&config).context(error::SerializeSnafu { what: "bootstrap" })
}

/// Renders a single file in the wire format of `S`.
fn wire_file<S: Schema>(file: ManagedFile) -> Result<Value> {
    let mut document = Document::<S>::minimal();
    document.merge_file(file);
    let mut config = serde_json::to_value(document.to_wire())
        .context(error::SerializeSnafu { what: "install info" })?;
    Ok(config
        .pointer_mut("/storage/files/0")
        .map(Value::take)
        .unwrap_or_default())
}

/// Returns the config's `storage.files` list, creating it if needed.
fn files_mut(config: &mut Map<String, Value>) -> Option<&mut Vec<Value>> {
    config
        .entry("storage")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()?
        .entry("files")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
}
