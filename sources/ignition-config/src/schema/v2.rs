//! Ignition 2.x wire format. Names and sources are plain strings where an empty string means
//! unset, files name the filesystem they're written to, and remote configs are listed under
//! `ignition.config.append`.

use super::Schema;
use crate::document::Document;
use crate::model::{
    FetchDirective, HttpHeader as HeaderModel, ManagedFile, MergeStrategy, ServiceUnit,
    TrustAnchor, UnitDropin, User,
};
use ignition_generation::Generation;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// All files are written to the root filesystem.
const ROOT_FILESYSTEM: &str = "root";

/// The Ignition 2.x schema, rendered as version 2.4.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct V2;

impl Schema for V2 {
    const GENERATION: Generation = Generation::V2;
    const MAX_VERSION: &'static str = "2.4.0";
    type Config = Config;

    fn encode(document: &Document<Self>) -> Config {
        let mut config = IgnitionConfig::default();
        for directive in document.fetch_directives() {
            let reference = encode_reference(directive);
            match directive.strategy() {
                MergeStrategy::Merge => config.append.push(reference),
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
            .append
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
                .map(|ca| TrustAnchor::new(ca.source))
                .collect(),
            fetch_directives,
            schema: PhantomData,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|value| !value.is_empty())
}

fn encode_file(file: &ManagedFile) -> File {
    File {
        filesystem: ROOT_FILESYSTEM.to_string(),
        path: file.path().to_string(),
        user: file.user().map(|name| NodeUser {
            name: name.to_string(),
        }),
        contents: FileContents {
            source: file.contents().unwrap_or_default().to_string(),
        },
        mode: file.mode(),
    }
}

fn decode_file(file: File) -> ManagedFile {
    ManagedFile {
        path: file.path,
        user: file.user.and_then(|user| non_empty(user.name)),
        mode: file.mode,
        contents: non_empty(file.contents.source),
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
        contents: unit.contents().unwrap_or_default().to_string(),
        enabled: unit.enabled(),
        dropins: unit
            .dropins()
            .iter()
            .map(|dropin| SystemdDropin {
                name: dropin.name().to_string(),
                contents: dropin.contents().unwrap_or_default().to_string(),
            })
            .collect(),
    }
}

fn decode_unit(unit: Unit) -> ServiceUnit {
    ServiceUnit {
        name: unit.name,
        contents: non_empty(unit.contents),
        enabled: unit.enabled,
        dropins: unit
            .dropins
            .into_iter()
            .map(|dropin| UnitDropin {
                name: dropin.name,
                contents: non_empty(dropin.contents),
            })
            .collect(),
    }
}

fn encode_security(anchors: &[TrustAnchor]) -> Security {
    Security {
        tls: Tls {
            certificate_authorities: anchors
                .iter()
                .map(|anchor| CaReference {
                    source: anchor.source().to_string(),
                })
                .collect(),
        },
    }
}

fn encode_reference(directive: &FetchDirective) -> ConfigReference {
    ConfigReference {
        source: directive.source().to_string(),
        http_headers: directive
            .http_headers()
            .iter()
            .map(|header| HttpHeader {
                name: header.name().to_string(),
                value: header.value().unwrap_or_default().to_string(),
            })
            .collect(),
    }
}

fn decode_reference(reference: ConfigReference, strategy: MergeStrategy) -> FetchDirective {
    FetchDirective {
        source: reference.source,
        http_headers: reference
            .http_headers
            .into_iter()
            .map(|header| HeaderModel {
                name: header.name,
                value: Some(header.value),
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
    pub append: Vec<ConfigReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<ConfigReference>,
}

impl IgnitionConfig {
    fn is_empty(&self) -> bool {
        self.append.is_empty() && self.replace.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigReference {
    pub source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub http_headers: Vec<HttpHeader>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
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
    pub certificate_authorities: Vec<CaReference>,
}

impl Tls {
    fn is_empty(&self) -> bool {
        self.certificate_authorities.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaReference {
    pub source: String,
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
    pub filesystem: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<NodeUser>,
    pub contents: FileContents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeUser {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContents {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
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
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contents: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropins: Vec<SystemdDropin>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemdDropin {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contents: String,
}
