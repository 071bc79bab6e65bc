//! Register-or-queue hand-off between generated mapping data and its consumer.
//!
//! Generated data files and the component that presents them load in an
//! arbitrary order. The bridge absorbs that: `load` hands a mapping straight
//! to the registration hook when one is installed, and parks it in pending
//! storage otherwise. `install_hook` flushes anything parked, exactly once.
//!
//! The original hand-off ran in a single-threaded host where the existence
//! check and the call-or-store action could not interleave. Here both live
//! behind one mutex so the check-then-act sequence stays atomic under
//! concurrent `load` calls.

use crate::mapping::ImplementorMapping;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Consumer-side callable invoked with a full mapping.
///
/// The hook returns nothing meaningful to the bridge; whatever it does with
/// the mapping (indexing, rendering, dropping it) is its own business.
pub trait RegistrationHook: Send + Sync {
    fn register(&self, mapping: ImplementorMapping);
}

impl<F> RegistrationHook for F
where
    F: Fn(ImplementorMapping) + Send + Sync,
{
    fn register(&self, mapping: ImplementorMapping) {
        self(mapping)
    }
}

/// What `load` did with a mapping.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delivery {
    /// The hook was reachable and observed the mapping before `load` returned.
    Registered,
    /// No hook was installed; the mapping sits in pending storage.
    Deferred,
}

/// How pending storage behaves when multiple mappings arrive before a hook.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PendingPolicy {
    /// One slot; a later deferred `load` silently replaces an earlier one.
    ///
    /// This matches the original hand-off, where the pending location held at
    /// most one mapping and each new data file overwrote it. The data loss is
    /// documented, accepted behavior under this policy.
    #[default]
    LatestOnly,
    /// Ordered queue; every deferred mapping survives and `install_hook`
    /// flushes them in arrival order.
    Queue,
}

struct BridgeState {
    hook: Option<Arc<dyn RegistrationHook>>,
    pending: VecDeque<ImplementorMapping>,
}

/// Delivers mappings to the registration hook regardless of which side
/// initialized first.
pub struct Bridge {
    policy: PendingPolicy,
    state: Mutex<BridgeState>,
}

impl Bridge {
    /// Bridge with no hook installed and the faithful one-slot pending policy.
    pub fn new() -> Self {
        Self::with_policy(PendingPolicy::default())
    }

    pub fn with_policy(policy: PendingPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(BridgeState {
                hook: None,
                pending: VecDeque::new(),
            }),
        }
    }

    /// Bridge whose hook is reachable from the start.
    pub fn with_hook(hook: Arc<dyn RegistrationHook>) -> Self {
        let bridge = Self::new();
        bridge.install_hook(hook);
        bridge
    }

    /// Hand a mapping to the hook, or park it when no hook is installed.
    ///
    /// Cannot fail: absence of the hook is a normal timing condition, not a
    /// fault, and the operation degrades to `Deferred`. Mapping contents are
    /// passed through untouched; no validation happens here.
    pub fn load(&self, mapping: ImplementorMapping) -> Delivery {
        let hook = {
            let mut state = self.lock_state();
            match state.hook.clone() {
                Some(hook) => hook,
                None => {
                    if self.policy == PendingPolicy::LatestOnly {
                        state.pending.clear();
                    }
                    state.pending.push_back(mapping);
                    return Delivery::Deferred;
                }
            }
        };
        // Invoke outside the lock so a hook that loads more data cannot
        // deadlock. The hook decision itself was made atomically above.
        hook.register(mapping);
        Delivery::Registered
    }

    /// Install the registration hook and flush pending mappings to it.
    ///
    /// Pending storage is consumed exactly once: mappings parked before this
    /// call are delivered here (in arrival order) and never redelivered.
    /// Returns how many parked mappings were flushed. A hook installed over an
    /// existing one replaces it for subsequent `load` calls.
    pub fn install_hook(&self, hook: Arc<dyn RegistrationHook>) -> usize {
        let parked = {
            let mut state = self.lock_state();
            state.hook = Some(Arc::clone(&hook));
            std::mem::take(&mut state.pending)
        };
        let flushed = parked.len();
        for mapping in parked {
            hook.register(mapping);
        }
        flushed
    }

    /// Whether a hook is currently reachable.
    pub fn has_hook(&self) -> bool {
        self.lock_state().hook.is_some()
    }

    /// Snapshot of pending storage, oldest first. Empty once a hook is
    /// installed and the backlog has been flushed.
    pub fn pending(&self) -> Vec<ImplementorMapping> {
        self.lock_state().pending.iter().cloned().collect()
    }

    pub fn policy(&self) -> PendingPolicy {
        self.policy
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, BridgeState> {
        // A poisoned mutex means a hook panicked mid-registration; pending
        // state is still coherent because mutation happens before invocation.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{Descriptor, Subject};
    use std::sync::Mutex as StdMutex;

    fn mapping_for(subject: &str, fragments: &[&str]) -> ImplementorMapping {
        let mut mapping = ImplementorMapping::new();
        mapping.insert(
            Subject::from(subject),
            fragments.iter().map(|f| Descriptor::from(*f)).collect(),
        );
        mapping
    }

    /// Hook that records every mapping it observes.
    struct RecordingHook {
        seen: StdMutex<Vec<ImplementorMapping>>,
    }

    impl RecordingHook {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: StdMutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<ImplementorMapping> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl RegistrationHook for RecordingHook {
        fn register(&self, mapping: ImplementorMapping) {
            self.seen.lock().unwrap().push(mapping);
        }
    }

    #[test]
    fn load_with_hook_invokes_once_and_leaves_pending_untouched() {
        let hook = RecordingHook::new();
        let bridge = Bridge::with_hook(hook.clone());
        let mapping = mapping_for("demo", &["typeA implements Copy", "typeB implements Copy"]);

        assert_eq!(bridge.load(mapping.clone()), Delivery::Registered);
        assert_eq!(hook.seen(), vec![mapping]);
        assert!(bridge.pending().is_empty());
    }

    #[test]
    fn load_without_hook_defers_exactly_the_mapping() {
        let bridge = Bridge::new();
        let mapping = mapping_for("demo", &["typeA implements Copy", "typeB implements Copy"]);

        assert_eq!(bridge.load(mapping.clone()), Delivery::Deferred);
        assert!(!bridge.has_hook());
        assert_eq!(bridge.pending(), vec![mapping]);
    }

    #[test]
    fn repeated_loads_are_not_deduplicated() {
        let hook = RecordingHook::new();
        let bridge = Bridge::with_hook(hook.clone());
        let mapping = mapping_for("demo", &["typeA implements Copy"]);

        assert_eq!(bridge.load(mapping.clone()), Delivery::Registered);
        assert_eq!(bridge.load(mapping.clone()), Delivery::Registered);
        assert_eq!(hook.seen(), vec![mapping.clone(), mapping]);
    }

    #[test]
    fn latest_only_overwrite_loses_the_earlier_mapping() {
        // Documented behavior of the one-slot policy, not a bug: the second
        // deferred load replaces the first and the first is unrecoverable.
        let bridge = Bridge::new();
        assert_eq!(bridge.policy(), PendingPolicy::LatestOnly);
        let first = mapping_for("first", &["typeA implements Copy"]);
        let second = mapping_for("second", &["typeB implements Copy"]);

        assert_eq!(bridge.load(first), Delivery::Deferred);
        assert_eq!(bridge.load(second.clone()), Delivery::Deferred);
        assert_eq!(bridge.pending(), vec![second.clone()]);

        let hook = RecordingHook::new();
        assert_eq!(bridge.install_hook(hook.clone()), 1);
        assert_eq!(hook.seen(), vec![second]);
    }

    #[test]
    fn queue_policy_flushes_all_deferred_mappings_in_order() {
        let bridge = Bridge::with_policy(PendingPolicy::Queue);
        assert_eq!(bridge.policy(), PendingPolicy::Queue);
        let first = mapping_for("first", &["typeA implements Copy"]);
        let second = mapping_for("second", &["typeB implements Copy"]);

        assert_eq!(bridge.load(first.clone()), Delivery::Deferred);
        assert_eq!(bridge.load(second.clone()), Delivery::Deferred);
        assert_eq!(bridge.pending(), vec![first.clone(), second.clone()]);

        let hook = RecordingHook::new();
        assert_eq!(bridge.install_hook(hook.clone()), 2);
        assert_eq!(hook.seen(), vec![first, second]);
        assert!(bridge.pending().is_empty());
    }

    #[test]
    fn pending_is_consumed_exactly_once() {
        let bridge = Bridge::new();
        bridge.load(mapping_for("demo", &["typeA implements Copy"]));

        let hook = RecordingHook::new();
        assert_eq!(bridge.install_hook(hook.clone()), 1);
        assert!(bridge.pending().is_empty());

        // A second hook install must not replay the flushed backlog.
        let late = RecordingHook::new();
        assert_eq!(bridge.install_hook(late.clone()), 0);
        assert!(late.seen().is_empty());
        assert_eq!(hook.seen().len(), 1);
    }

    #[test]
    fn closures_work_as_hooks() {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hook: Arc<dyn RegistrationHook> = Arc::new(move |mapping: ImplementorMapping| {
            sink.lock().unwrap().push(mapping);
        });
        let bridge = Bridge::with_hook(hook);

        let mapping = mapping_for("demo", &["typeA implements Copy"]);
        bridge.load(mapping.clone());
        assert_eq!(seen.lock().unwrap().clone(), vec![mapping]);
    }
}
