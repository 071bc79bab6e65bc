//! Mapping types carried through the hand-off, plus the normalized on-disk
//! document form.
//!
//! The bridge treats `ImplementorMapping` as an opaque unit: whatever was
//! loaded is what the hook observes, with descriptor order preserved per
//! subject. `MappingDocument` exists for tooling and fixtures that want a
//! plain JSON file instead of the generated snippet; use
//! `schema_loader::validate_mapping_document` before trusting one from disk.

use crate::mapping::identity::{Descriptor, Subject};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Ordered descriptors for one subject. Order is meaningful for downstream
/// display and must survive the hand-off unchanged.
pub type DescriptorList = Vec<Descriptor>;

/// The full subject→descriptor-list mapping delivered to the registration
/// hook. One entry per subject; subjects are not ordered relative to each
/// other, but `BTreeMap` keeps iteration deterministic.
pub type ImplementorMapping = BTreeMap<Subject, DescriptorList>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Normalized mapping file as stored on disk.
pub struct MappingDocument {
    pub schema_version: String,
    pub subjects: ImplementorMapping,
}

impl MappingDocument {
    /// Give up ownership of the inner mapping for hand-off to a bridge.
    pub fn into_mapping(self) -> ImplementorMapping {
        self.subjects
    }
}

/// Read and parse a mapping document from disk without schema validation.
pub fn load_mapping_from_path(path: &Path) -> Result<MappingDocument> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading mapping document {}", path.display()))?;
    let document: MappingDocument = serde_json::from_str(&data)
        .with_context(|| format!("parsing mapping document {}", path.display()))?;
    Ok(document)
}
