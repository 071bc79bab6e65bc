//! JSON Schema validation for normalized mapping documents.
//!
//! Snippets are framed by their splice table, but the normalized document
//! form is plain JSON; validating it against the shipped schema keeps tooling
//! and fixtures honest about field names and the `schema_version` contract
//! before a document's subjects are handed to a bridge.

use anyhow::{Context, Result, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// The crate ships a single document schema; reject unexpected versions rather
// than guess at a newer contract.
const MAPPING_SCHEMA_VERSION: &str = "implementor_mapping_v1";

/// Compiled schema plus the version it enforces.
pub struct MappingSchema {
    pub schema_version: String,
    compiled: JSONSchema,
    // Keeps the schema payload alive for the 'static borrow handed to the
    // compiler; must outlive `compiled`.
    _raw: Arc<Value>,
}

/// Path of the schema file shipped with the crate.
pub fn canonical_mapping_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/implementor_mapping.schema.json")
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([MAPPING_SCHEMA_VERSION.to_string()])
}

/// Load and compile the mapping-document schema from `path`.
pub fn load_mapping_schema(path: &Path) -> Result<MappingSchema> {
    let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    let schema_value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))?;

    let schema_version = schema_value
        .pointer("/properties/schema_version/const")
        .and_then(Value::as_str)
        .map(str::to_string)
        .with_context(|| {
            format!(
                "schema {} is missing its schema_version const",
                path.display()
            )
        })?;

    let allowed = allowed_schema_versions();
    if !allowed.contains(&schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }

    let raw = Arc::new(schema_value);
    let raw_static: &'static Value = unsafe { &*(Arc::as_ptr(&raw)) };
    let compiled = JSONSchema::compile(raw_static)
        .with_context(|| format!("compiling schema {}", path.display()))?;

    Ok(MappingSchema {
        schema_version,
        compiled,
        _raw: raw,
    })
}

impl MappingSchema {
    /// Validate a parsed document value against this schema.
    pub fn validate(&self, document: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(document) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            bail!("mapping document failed schema validation:\n{details}");
        }
        Ok(())
    }
}

/// Validate a mapping-document file against the shipped schema.
///
/// Returns the raw document value so callers can deserialize it once the
/// structure is known to be sound. Descriptor contents are opaque strings and
/// are deliberately not constrained beyond their type.
pub fn validate_mapping_document(document_path: &Path) -> Result<Value> {
    let file = File::open(document_path)
        .with_context(|| format!("opening mapping document {}", document_path.display()))?;
    let document: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing mapping document {}", document_path.display()))?;

    let schema = load_mapping_schema(&canonical_mapping_schema_path())?;
    schema.validate(&document).with_context(|| {
        format!("validating mapping document {}", document_path.display())
    })?;
    Ok(document)
}
