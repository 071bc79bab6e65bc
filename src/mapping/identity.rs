use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a logical grouping under which descriptors are registered
/// (typically a library or crate identifier, e.g. `connectorx`).
///
/// Stored as the mapping key so consumers can resolve descriptor lists by the
/// subject the generator grouped them under.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(pub String);

/// Opaque payload describing one capability implementation.
///
/// In the generated data this is a markup fragment naming a type and the
/// capability it implements, but nothing in this crate inspects the contents:
/// descriptors pass through the bridge byte-for-byte.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(pub String);

impl Subject {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Descriptor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Subject(value.to_string())
    }
}

impl From<&str> for Descriptor {
    fn from(value: &str) -> Self {
        Descriptor(value.to_string())
    }
}
