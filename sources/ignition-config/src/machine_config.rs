//! The machine_config module builds role-scoped `MachineConfig` manifests, which the machine
//! config operator applies to every node of a role after the cluster is up.
//!
//! Only the manifest fields set here are modelled: the object's type, its name, its role label,
//! the wrapped Ignition config and the FIPS switch.

use crate::document::Document;
use crate::error::{self, Result};
use crate::file::file_from_string;
use crate::schema::Schema;
use maplit::btreemap;
use serde::Serialize;
use snafu::ResultExt;
use std::collections::BTreeMap;

pub const API_VERSION: &str = "machineconfiguration.openshift.io/v1";
pub const KIND: &str = "MachineConfig";

/// The label that scopes a machine config to the nodes of one role.
pub const ROLE_LABEL: &str = "machineconfiguration.openshift.io/role";

/// The kernel argument override file read by the host's pivot service.
pub const KERNEL_ARGS_PATH: &str = "/etc/pivot/kernel-args";

// 0600
const KERNEL_ARGS_MODE: u32 = 0o600;

/// A `MachineConfig` manifest wrapping a document rendered with schema `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineConfig<S> {
    name: String,
    role: String,
    config: Document<S>,
    fips: bool,
}

impl<S: Schema> MachineConfig<S> {
    fn new(name: String, role: &str, config: Document<S>) -> Self {
        Self {
            name,
            role: role.to_string(),
            config,
            fips: false,
        }
    }

    /// Authorizes `key` for the admin user on nodes of `role`.
    pub fn for_authorized_keys(key: &str, role: &str) -> Self {
        let mut config = Document::minimal();
        config.add_ssh_keys([key]);
        Self::new(format!("99-{}-ssh", role), role, config)
    }

    /// Turns on FIPS mode for nodes of `role`.
    pub fn for_fips_enabled(role: &str) -> Self {
        let mut machine_config = Self::new(format!("99-{}-fips", role), role, Document::minimal());
        machine_config.fips = true;
        machine_config
    }

    /// Disables simultaneous multithreading on nodes of `role` through a kernel argument.
    pub fn for_hyperthreading_disabled(role: &str) -> Self {
        let mut config = Document::minimal();
        config.merge_file(file_from_string(
            KERNEL_ARGS_PATH,
            "root",
            KERNEL_ARGS_MODE,
            "ADD nosmt",
        ));
        Self::new(format!("99-{}-disable-hyperthreading", role), role, config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn config(&self) -> &Document<S> {
        &self.config
    }

    pub fn fips(&self) -> bool {
        self.fips
    }

    /// Serializes the manifest to JSON, with the config in the wire format of `S`.
    pub fn to_json(&self) -> Result<String> {
        let manifest = Manifest {
            api_version: API_VERSION,
            kind: KIND,
            metadata: Metadata {
                name: &self.name,
                labels: btreemap! { ROLE_LABEL => self.role.as_str() },
            },
            spec: Spec {
                config: self.config.to_wire(),
                fips: self.fips,
            },
        };
        debug!("Rendering machine config '{}'", self.name);
        serde_json::to_string(&manifest).context(error::SerializeSnafu {
            what: "machine config",
        })
    }
}

// =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a, C> {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata<'a>,
    spec: Spec<C>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    name: &'a str,
    labels: BTreeMap<&'static str, &'a str>,
}

#[derive(Serialize)]
struct Spec<C> {
    config: C,
    #[serde(skip_serializing_if = "is_false")]
    fips: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dataurl;
    use crate::schema::{V2, V3};
    use serde_json::{json, Value};

    fn rendered<S: Schema>(machine_config: &MachineConfig<S>) -> Value {
        serde_json::from_str(&machine_config.to_json().unwrap()).unwrap()
    }

    #[test]
    fn authorized_keys() {
        let machine_config = MachineConfig::<V2>::for_authorized_keys("ssh-ed25519 AAAA", "worker");
        assert_eq!(machine_config.name(), "99-worker-ssh");
        assert_eq!(machine_config.role(), "worker");
        assert!(!machine_config.fips());

        let users = machine_config.config().users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name(), "core");
        assert_eq!(users[0].ssh_authorized_keys(), ["ssh-ed25519 AAAA"]);

        let value = rendered(&machine_config);
        assert_eq!(value["apiVersion"], API_VERSION);
        assert_eq!(value["kind"], "MachineConfig");
        assert_eq!(
            value["metadata"],
            json!({
                "name": "99-worker-ssh",
                "labels": {"machineconfiguration.openshift.io/role": "worker"}
            })
        );
        assert_eq!(value["spec"]["config"]["ignition"]["version"], "2.4.0");
        assert_eq!(
            value["spec"]["config"]["passwd"]["users"][0]["sshAuthorizedKeys"],
            json!(["ssh-ed25519 AAAA"])
        );
        assert!(value["spec"].get("fips").is_none());
    }

    #[test]
    fn fips_enabled() {
        let machine_config = MachineConfig::<V3>::for_fips_enabled("master");
        assert_eq!(machine_config.name(), "99-master-fips");
        assert!(machine_config.fips());
        assert!(machine_config.config().files().is_empty());

        let value = rendered(&machine_config);
        assert_eq!(value["spec"]["fips"], true);
        assert_eq!(value["spec"]["config"]["ignition"]["version"], "3.1.0");
    }

    #[test]
    fn hyperthreading_disabled() {
        let machine_config = MachineConfig::<V2>::for_hyperthreading_disabled("worker");
        assert_eq!(machine_config.name(), "99-worker-disable-hyperthreading");

        let files = machine_config.config().files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path(), KERNEL_ARGS_PATH);
        assert_eq!(files[0].user(), Some("root"));
        assert_eq!(files[0].mode(), Some(384));
        let decoded = dataurl::decode(files[0].contents().unwrap()).unwrap();
        assert_eq!(decoded.data, b"ADD nosmt");

        let value = rendered(&machine_config);
        assert_eq!(
            value["spec"]["config"]["storage"]["files"][0]["path"],
            "/etc/pivot/kernel-args"
        );
    }
}
