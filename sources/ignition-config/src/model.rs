//! The model module holds the schema-independent contents of an Ignition document. Each spec
//! generation's wire format is produced from these types by its [`Schema`](crate::Schema).
//!
//! Fields that some wire formats can leave absent are `Option`s, so that "absent" and "empty"
//! stay distinguishable wherever the wire format distinguishes them.

/// One file written on first boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    pub(crate) path: String,
    pub(crate) user: Option<String>,
    pub(crate) mode: Option<u32>,
    pub(crate) contents: Option<String>,
}

impl ManagedFile {
    pub(crate) fn new<P>(path: P, user: Option<String>, mode: Option<u32>, contents: String) -> Self
    where
        P: Into<String>,
    {
        Self {
            path: path.into(),
            user,
            mode,
            contents: Some(contents),
        }
    }

    /// Absolute path of the file; unique within a document.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the user owning the file.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn mode(&self) -> Option<u32> {
        self.mode
    }

    /// The `data:` URL holding the file's contents.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

/// A user account, identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub(crate) name: String,
    pub(crate) ssh_authorized_keys: Vec<String>,
}

impl User {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ssh_authorized_keys(&self) -> &[String] {
        &self.ssh_authorized_keys
    }
}

/// A systemd unit, either defined in full or as a set of dropins overriding an existing unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    pub(crate) name: String,
    pub(crate) contents: Option<String>,
    pub(crate) enabled: Option<bool>,
    pub(crate) dropins: Vec<UnitDropin>,
}

impl ServiceUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// `Some(true)` if the unit is enabled; units are never explicitly disabled.
    pub fn enabled(&self) -> Option<bool> {
        self.enabled
    }

    pub fn dropins(&self) -> &[UnitDropin] {
        &self.dropins
    }
}

/// A named override fragment of a [`ServiceUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDropin {
    pub(crate) name: String,
    pub(crate) contents: Option<String>,
}

impl UnitDropin {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

/// A certificate authority added to the trust store Ignition uses for its own fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    pub(crate) source: String,
}

impl TrustAnchor {
    pub(crate) fn new(source: String) -> Self {
        Self { source }
    }

    /// The `data:` URL holding the PEM-encoded certificate.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// How a fetched config is combined with the one referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Incorporate the fetched config into the local one.
    Merge,
    /// Use the fetched config instead of the local one.
    Replace,
}

/// An instruction to fetch and incorporate a remote config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDirective {
    pub(crate) source: String,
    pub(crate) http_headers: Vec<HttpHeader>,
    pub(crate) strategy: MergeStrategy,
}

impl FetchDirective {
    pub(crate) fn merge<S: Into<String>>(source: S) -> Self {
        Self {
            source: source.into(),
            http_headers: Vec::new(),
            strategy: MergeStrategy::Merge,
        }
    }

    pub(crate) fn with_header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.http_headers.push(HttpHeader {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn http_headers(&self) -> &[HttpHeader] {
        &self.http_headers
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }
}

/// An HTTP header sent with a remote config fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHeader {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

impl HttpHeader {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
