//! Implementor registry bridge.
//!
//! Documentation generators emit per-library data files that register "which
//! types implement which capability" metadata with an interactive consumer.
//! Data files and the consumer load in arbitrary order, so the hand-off is a
//! register-or-queue contract: deliver the mapping to the registration hook
//! when it is reachable, park it in pending storage when it is not, and flush
//! the backlog once the hook arrives.
//!
//! The crate covers that contract end to end: the data model
//! ([`mapping`]), the hand-off itself ([`bridge`]), an explicit-lifecycle
//! consumer store ([`registry`]), parsing of the generated snippet format
//! ([`snippet`]), and schema validation for the normalized document form
//! ([`schema_loader`]). Mappings pass through untouched: the bridge never
//! inspects, filters, or validates descriptor contents.

pub mod bridge;
pub mod mapping;
pub mod registry;
pub mod schema_loader;
pub mod snippet;

pub use bridge::{Bridge, Delivery, PendingPolicy, RegistrationHook};
pub use mapping::{
    Descriptor, DescriptorList, ImplementorMapping, MappingDocument, Subject,
    load_mapping_from_path,
};
pub use registry::{SubjectRegistry, registry_hook};
pub use schema_loader::{canonical_mapping_schema_path, validate_mapping_document};
pub use snippet::{ParsedSnippet, SpliceInfo, parse_snippet};
