//! The schema module owns the wire formats of the supported Ignition spec generations.
//!
//! A [`Schema`] translates between the schema-independent [`Document`] and the serde types of
//! one generation. Both generations are always compiled; the build selects one of them as
//! [`Current`](crate::Current).

use crate::document::Document;
use ignition_generation::Generation;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod v2;
pub mod v3;

pub use v2::V2;
pub use v3::V3;

/// The wire adapter of one Ignition spec generation.
pub trait Schema: Sized {
    /// The generation this schema renders.
    const GENERATION: Generation;

    /// The newest config version of the generation; new documents are tagged with it.
    const MAX_VERSION: &'static str;

    /// The top-level wire type of a config.
    type Config: Serialize + DeserializeOwned;

    /// Renders the document in this generation's wire format.
    fn encode(document: &Document<Self>) -> Self::Config;

    /// Reads a document from this generation's wire format.
    fn decode(config: Self::Config) -> Document<Self>;
}
