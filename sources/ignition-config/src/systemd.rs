//! The systemd module builds service units and dropin sets.

use crate::model::{ServiceUnit, UnitDropin};

/// A named override fragment for an existing unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropin {
    pub name: String,
    pub contents: String,
}

impl Dropin {
    pub fn new<N, C>(name: N, contents: C) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

// Units are either enabled or left to their defaults, never explicitly disabled.
fn enabled_flag(enabled: bool) -> Option<bool> {
    enabled.then_some(true)
}

/// Returns a unit defined by `contents`.
pub fn unit<N, C>(name: N, contents: C, enabled: bool) -> ServiceUnit
where
    N: Into<String>,
    C: Into<String>,
{
    ServiceUnit {
        name: name.into(),
        contents: Some(contents.into()),
        enabled: enabled_flag(enabled),
        dropins: Vec::new(),
    }
}

/// Returns a unit carrying only `dropins`, in the order given.
pub fn unit_with_dropins<N>(name: N, dropins: &[Dropin], enabled: bool) -> ServiceUnit
where
    N: Into<String>,
{
    ServiceUnit {
        name: name.into(),
        contents: None,
        enabled: enabled_flag(enabled),
        dropins: dropins
            .iter()
            .map(|dropin| UnitDropin {
                name: dropin.name.clone(),
                contents: Some(dropin.contents.clone()),
            })
            .collect(),
    }
}
