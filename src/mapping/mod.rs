//! Implementor mapping wiring.
//!
//! This module holds the data model shared by the bridge and the snippet
//! parser: subjects, opaque descriptors, and the subject→descriptor-list
//! mapping carried through the hand-off. The bridge never interprets
//! descriptor contents; callers use `MappingDocument` when the normalized
//! on-disk form is required (tooling, fixtures).

pub mod identity;
pub mod model;

pub use identity::{Descriptor, Subject};
pub use model::{DescriptorList, ImplementorMapping, MappingDocument};

pub use model::load_mapping_from_path;
