//! Ignition 3.x wire format. Optional names and sources are nullable rather than empty, files are
//! always written to the root filesystem, and remote configs are listed under
//! `ignition.config.merge`.
//!
//! Documents are tagged 3.1.0, the first 3.x version whose config references carry HTTP headers.

use super::Schema;
use crate::document::Document;
use crate::model::{
    FetchDirective, HttpHeader as HeaderModel, ManagedFile, MergeStrategy, ServiceUnit,
    TrustAnchor, UnitDropin, User,
};
use ignition_generation::Generation;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// The Ignition 3.x schema, rendered as version 3.1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct V3;

impl Schema for V3 {
    const GENERATION: Generation = Generation::V3;
    const MAX_VERSION: &'static str = "3.1.0";
    type Config = Config;

    fn encode(document: &Document<Self>) -> Config {
        let mut config = IgnitionConfig::default();
        for directive in document.fetch_directives() {
            let reference = encode_reference(directive);
            match directive.strategy() {
                MergeStrategy::Merge => config.merge.push(reference),
                MergeStrategy::Replace => config.replace = Some(reference),
            }
        }

        Config {
            ignition: Ignition {
                version: document.version().to_string(),
                config,
                security: encode_security(document.trust_anchors()),
            },
            passwd: Passwd {
                users: document.users().iter().map(encode_user).collect(),
            },
            storage: Storage {
                files: document.files().iter().map(encode_file).collect(),
            },
            systemd: Systemd {
                units: document.units().iter().map(encode_unit).collect(),
            },
        }
    }

    fn decode(config: Config) -> Document<Self> {
        let Config {
            ignition,
            passwd,
            storage,
            systemd,
        } = config;

        let mut fetch_directives: Vec<FetchDirective> = ignition
            .config
            .merge
            .into_iter()
            .map(|reference| decode_reference(reference, MergeStrategy::Merge))
            .collect();
        if let Some(reference) = ignition.config.replace {
            fetch_directives.push(decode_reference(reference, MergeStrategy::Replace));
        }

        Document {
            version: ignition.version,
            files: storage.files.into_iter().map(decode_file).collect(),
            users: passwd.users.into_iter().map(decode_user).collect(),
            units: systemd.units.into_iter().map(decode_unit).collect(),
            trust_anchors: ignition
                .security
                .tls
                .certificate_authorities
                .into_iter()
                .map(|ca| TrustAnchor::new(ca.source.unwrap_or_default()))
                .collect(),
            fetch_directives,
            schema: PhantomData,
        }
    }
}

fn source(source: &str) -> Resource {
    Resource {
        source: Some(source.to_string()),
        http_headers: Vec::new(),
    }
}

fn encode_file(file: &ManagedFile) -> File {
    File {
        path: file.path().to_string(),
        user: NodeUser {
            name: file.user().map(str::to_string),
        },
        contents: Resource {
            source: file.contents().map(str::to_string),
            http_headers: Vec::new(),
        },
        mode: file.mode(),
    }
}

fn decode_file(file: File) -> ManagedFile {
    ManagedFile {
        path: file.path,
        user: file.user.name,
        mode: file.mode,
        contents: file.contents.source,
    }
}

fn encode_user(user: &User) -> PasswdUser {
    PasswdUser {
        name: user.name().to_string(),
        ssh_authorized_keys: user.ssh_authorized_keys().to_vec(),
    }
}

fn decode_user(user: PasswdUser) -> User {
    User {
        name: user.name,
        ssh_authorized_keys: user.ssh_authorized_keys,
    }
}

fn encode_unit(unit: &ServiceUnit) -> Unit {
    Unit {
        name: unit.name().to_string(),
        contents: unit.contents().map(str::to_string),
        enabled: unit.enabled(),
        dropins: unit
            .dropins()
            .iter()
            .map(|dropin| Dropin {
                name: dropin.name().to_string(),
                contents: dropin.contents().map(str::to_string),
            })
            .collect(),
    }
}

fn decode_unit(unit: Unit) -> ServiceUnit {
    ServiceUnit {
        name: unit.name,
        contents: unit.contents,
        enabled: unit.enabled,
        dropins: unit
            .dropins
            .into_iter()
            .map(|dropin| UnitDropin {
                name: dropin.name,
                contents: dropin.contents,
            })
            .collect(),
    }
}

fn encode_security(anchors: &[TrustAnchor]) -> Security {
    Security {
        tls: Tls {
            certificate_authorities: anchors
                .iter()
                .map(|anchor| source(anchor.source()))
                .collect(),
        },
    }
}

fn encode_reference(directive: &FetchDirective) -> Resource {
    Resource {
        http_headers: directive
            .http_headers()
            .iter()
            .map(|header| HttpHeader {
                name: header.name().to_string(),
                value: header.value().map(str::to_string),
            })
            .collect(),
        ..source(directive.source())
    }
}

fn decode_reference(reference: Resource, strategy: MergeStrategy) -> FetchDirective {
    FetchDirective {
        source: reference.source.unwrap_or_default(),
        http_headers: reference
            .http_headers
            .into_iter()
            .map(|header| HeaderModel {
                name: header.name,
                value: header.value,
            })
            .collect(),
        strategy,
    }
}

// =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ignition: Ignition,
    #[serde(skip_serializing_if = "Passwd::is_empty")]
    pub passwd: Passwd,
    #[serde(skip_serializing_if = "Storage::is_empty")]
    pub storage: Storage,
    #[serde(skip_serializing_if = "Systemd::is_empty")]
    pub systemd: Systemd,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ignition {
    pub version: String,
    #[serde(skip_serializing_if = "IgnitionConfig::is_empty")]
    pub config: IgnitionConfig,
    #[serde(skip_serializing_if = "Security::is_empty")]
    pub security: Security,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnitionConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merge: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<Resource>,
}

impl IgnitionConfig {
    fn is_empty(&self) -> bool {
        self.merge.is_empty() && self.replace.is_none()
    }
}

/// A remote or embedded resource; used for config references, CA references and file contents.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub http_headers: Vec<HttpHeader>,
}

impl Resource {
    fn is_empty(&self) -> bool {
        self.source.is_none() && self.http_headers.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpHeader {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Security {
    #[serde(skip_serializing_if = "Tls::is_empty")]
    pub tls: Tls,
}

impl Security {
    fn is_empty(&self) -> bool {
        self.tls.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tls {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificate_authorities: Vec<Resource>,
}

impl Tls {
    fn is_empty(&self) -> bool {
        self.certificate_authorities.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Passwd {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<PasswdUser>,
}

impl Passwd {
    fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswdUser {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_authorized_keys: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<File>,
}

impl Storage {
    fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    pub path: String,
    #[serde(skip_serializing_if = "NodeUser::is_empty")]
    pub user: NodeUser,
    #[serde(skip_serializing_if = "Resource::is_empty")]
    pub contents: Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NodeUser {
    fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Systemd {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<Unit>,
}

impl Systemd {
    fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unit {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropins: Vec<Dropin>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dropin {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}
