//! Explicit-lifecycle store for delivered descriptor lists.
//!
//! Where the bridge only moves mappings, the registry keeps them: consumers
//! create one, feed it delivered mappings, and drain it when rendering. The
//! duplicate-subject policy is part of the contract (`register` refuses,
//! `replace` overwrites and says so) instead of being an accident of load
//! order.

use crate::bridge::RegistrationHook;
use crate::mapping::{DescriptorList, ImplementorMapping, Subject};
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
/// In-memory store of descriptor lists keyed by `Subject`.
pub struct SubjectRegistry {
    subjects: BTreeMap<Subject, DescriptorList>,
}

impl SubjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register descriptors for a subject, refusing duplicates.
    ///
    /// Descriptor order is preserved as given. Use [`replace`](Self::replace)
    /// when overwriting is intended.
    pub fn register(&mut self, subject: Subject, descriptors: DescriptorList) -> Result<()> {
        if self.subjects.contains_key(&subject) {
            bail!("subject '{subject}' already registered");
        }
        self.subjects.insert(subject, descriptors);
        Ok(())
    }

    /// Overwrite a subject's descriptors, returning the previous list if one
    /// was registered.
    pub fn replace(
        &mut self,
        subject: Subject,
        descriptors: DescriptorList,
    ) -> Option<DescriptorList> {
        self.subjects.insert(subject, descriptors)
    }

    /// Ingest every entry of a delivered mapping.
    ///
    /// Stops at the first duplicate subject; entries before it stay
    /// registered, and the error names the offending subject so callers can
    /// surface which data file collided.
    pub fn absorb(&mut self, mapping: ImplementorMapping) -> Result<()> {
        for (subject, descriptors) in mapping {
            self.register(subject, descriptors)?;
        }
        Ok(())
    }

    /// Fetch the descriptors registered for a subject, if any.
    pub fn get(&self, subject: &Subject) -> Option<&DescriptorList> {
        self.subjects.get(subject)
    }

    /// Iterate subjects in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&Subject, &DescriptorList)> {
        self.subjects.iter()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Empty the registry, handing the accumulated mapping to the caller.
    pub fn drain(&mut self) -> ImplementorMapping {
        std::mem::take(&mut self.subjects)
    }
}

/// Adapter so a shared registry can serve as a bridge's registration hook.
///
/// Delivered mappings are absorbed with the overwrite (`replace`) policy:
/// the hook has no error channel, and a regenerated data file re-registering
/// a subject is routine, so the newest descriptors win.
pub fn registry_hook(registry: Arc<Mutex<SubjectRegistry>>) -> Arc<dyn RegistrationHook> {
    Arc::new(move |mapping: ImplementorMapping| {
        let mut registry = match registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (subject, descriptors) in mapping {
            registry.replace(subject, descriptors);
        }
    })
}
