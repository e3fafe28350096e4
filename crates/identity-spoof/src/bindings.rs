use arc_swap::ArcSwap;
use identity_backup::IdentityType;
use std::collections::HashMap;
use std::sync::Arc;

/// The live spoofed-value table, published as a shared-immutable snapshot so
/// interposers can read it without taking a lock on the fast path. Every
/// mutation replaces the whole map rather than editing it in place.
#[derive(Default)]
pub struct SpoofedValueBindings {
    inner: ArcSwap<HashMap<IdentityType, String>>,
}

impl SpoofedValueBindings {
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// A cheap, shared-immutable snapshot for the interposer fast path.
    pub fn snapshot(&self) -> Arc<HashMap<IdentityType, String>> {
        self.inner.load_full()
    }

    pub fn get(&self, identity_type: IdentityType) -> Option<String> {
        self.inner.load().get(&identity_type).cloned()
    }

    pub fn install(&self, identity_type: IdentityType, value: String) {
        self.inner.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(identity_type, value.clone());
            next
        });
    }

    pub fn remove(&self, identity_type: IdentityType) {
        self.inner.rcu(|current| {
            let mut next = (**current).clone();
            next.remove(&identity_type);
            next
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_then_get_round_trips() {
        let bindings = SpoofedValueBindings::new();
        bindings.install(IdentityType::Hostname, "ghost".to_string());
        assert_eq!(bindings.get(IdentityType::Hostname), Some("ghost".to_string()));
    }

    #[test]
    fn remove_clears_the_binding() {
        let bindings = SpoofedValueBindings::new();
        bindings.install(IdentityType::Hostname, "ghost".to_string());
        bindings.remove(IdentityType::Hostname);
        assert_eq!(bindings.get(IdentityType::Hostname), None);
    }

    #[test]
    fn snapshot_is_independent_of_later_mutation() {
        let bindings = SpoofedValueBindings::new();
        bindings.install(IdentityType::Hostname, "ghost".to_string());
        let snapshot = bindings.snapshot();
        bindings.install(IdentityType::Hostname, "ghost2".to_string());
        assert_eq!(snapshot.get(&IdentityType::Hostname), Some(&"ghost".to_string()));
    }
}
