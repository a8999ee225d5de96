//! The document module owns [`Document`], the Ignition config being assembled, and the
//! operations that add content to it.

use crate::error::{self, Result};
use crate::merge::replace_or_append;
use crate::model::{FetchDirective, ManagedFile, ServiceUnit, TrustAnchor, User};
use crate::schema::Schema;
use crate::systemd::{self, Dropin};
use snafu::ResultExt;
use std::marker::PhantomData;

/// The administrative user that SSH keys are authorized for.
pub const ADMIN_USER: &str = "core";

/// An Ignition config rendered with the wire format of `S`.
///
/// A document is either self-contained, or a pointer that carries just enough to trust and fetch
/// the real config. Serializing a document never modifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<S> {
    pub(crate) version: String,
    pub(crate) files: Vec<ManagedFile>,
    pub(crate) users: Vec<User>,
    pub(crate) units: Vec<ServiceUnit>,
    pub(crate) trust_anchors: Vec<TrustAnchor>,
    pub(crate) fetch_directives: Vec<FetchDirective>,
    pub(crate) schema: PhantomData<S>,
}

impl<S: Schema> Document<S> {
    /// Returns an empty document tagged with the schema's newest version.
    pub fn minimal() -> Self {
        Self {
            version: S::MAX_VERSION.to_string(),
            files: Vec::new(),
            users: Vec::new(),
            units: Vec::new(),
            trust_anchors: Vec::new(),
            fetch_directives: Vec::new(),
            schema: PhantomData,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn files(&self) -> &[ManagedFile] {
        &self.files
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn units(&self) -> &[ServiceUnit] {
        &self.units
    }

    pub fn trust_anchors(&self) -> &[TrustAnchor] {
        &self.trust_anchors
    }

    pub fn fetch_directives(&self) -> &[FetchDirective] {
        &self.fetch_directives
    }

    /// Authorizes SSH keys for [`ADMIN_USER`], adding the user if the document doesn't have it.
    pub fn add_ssh_keys<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return;
        }

        match self.users.iter_mut().find(|user| user.name == ADMIN_USER) {
            Some(user) => user.ssh_authorized_keys.extend(keys),
            None => self.users.push(User {
                name: ADMIN_USER.to_string(),
                ssh_authorized_keys: keys,
            }),
        }
    }

    /// Appends a systemd unit. Units sharing a name are not deduplicated.
    pub fn add_systemd_unit<N, C>(&mut self, name: N, contents: C, enabled: bool)
    where
        N: Into<String>,
        C: Into<String>,
    {
        self.units.push(systemd::unit(name, contents, enabled));
    }

    /// Appends a unit made only of dropins, which override parts of an existing unit.
    pub fn add_systemd_dropins<N>(&mut self, name: N, dropins: &[Dropin], enabled: bool)
    where
        N: Into<String>,
    {
        self.units
            .push(systemd::unit_with_dropins(name, dropins, enabled));
    }

    /// Adds a file, replacing any file already at the same path.
    pub fn merge_file(&mut self, file: ManagedFile) {
        trace!("Merging file '{}'", file.path());
        replace_or_append(&mut self.files, file);
    }

    /// Adds each file in turn, as [`Document::merge_file`] does.
    pub fn merge_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = ManagedFile>,
    {
        for file in files {
            self.merge_file(file);
        }
    }

    /// Renders the document in the schema's wire format.
    pub fn to_wire(&self) -> S::Config {
        S::encode(self)
    }

    /// Reads a document from the schema's wire format.
    pub fn from_wire(config: S::Config) -> Self {
        S::decode(config)
    }

    /// Serializes the document to JSON.
    pub fn to_json(&self) -> Result<String> {
        self.encode_json("rendered")
    }

    /// Parses a JSON document written in the schema's wire format. Wire fields the model doesn't
    /// carry are dropped; see [`crate::install_info`] for editing a config without losing them.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Self::decode_json(data, "input")
    }

    pub(crate) fn encode_json(&self, what: &'static str) -> Result<String> {
        serde_json::to_string(&self.to_wire()).context(error::SerializeSnafu { what })
    }

    pub(crate) fn decode_json(data: &[u8], what: &'static str) -> Result<Self> {
        let config: S::Config =
            serde_json::from_slice(data).context(error::DeserializeSnafu { what })?;
        Ok(Self::from_wire(config))
    }
}

impl<S: Schema> Default for Document<S> {
    fn default() -> Self {
        Self::minimal()
    }
}
