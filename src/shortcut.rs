//! Keyboard-submit subscription.
//!
//! The original embedding binds a host-global keydown listener whose closure
//! captures the rectangle set; forgetting to re-register it after an edit
//! silently submits stale data. Here the listener is an explicitly managed
//! resource: a binding carries the store version it captured, must be
//! re-synced after every mutation, and is released exactly once on teardown.
//! A stale binding at keypress is treated as a bug and refuses to emit.

use crate::annotation::RectStore;
use crate::completion::{build_payload, PayloadEntry};
use crate::labels::LabelRegistry;

#[derive(Debug, Clone)]
struct Binding {
    version: u64,
    payload: Vec<PayloadEntry>,
}

/// The space-key submit listener, modeled as a scoped resource.
#[derive(Debug, Clone)]
pub struct SubmitShortcut {
    enabled: bool,
    binding: Option<Binding>,
}

impl SubmitShortcut {
    /// Create the shortcut; disabled shortcuts never bind or emit.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            binding: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the current binding matches the store version.
    pub fn is_bound_to(&self, store: &RectStore) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|b| b.version == store.version())
    }

    /// Re-register the listener against the current rectangle set. Called
    /// after every store mutation; a no-op when the binding is already
    /// current or the shortcut is disabled.
    pub fn sync(&mut self, store: &RectStore, registry: &LabelRegistry) {
        if !self.enabled || self.is_bound_to(store) {
            return;
        }
        log::debug!(
            "submit shortcut re-bound at store version {}",
            store.version()
        );
        self.binding = Some(Binding {
            version: store.version(),
            payload: build_payload(store, registry),
        });
    }

    /// The payload captured by the live binding. Returns `None` when the
    /// shortcut is disabled, unbound, or bound to a stale snapshot (the
    /// stale case is a correctness bug upstream and is logged).
    pub fn trigger(&self, store: &RectStore) -> Option<Vec<PayloadEntry>> {
        if !self.enabled {
            return None;
        }
        match &self.binding {
            Some(b) if b.version == store.version() => Some(b.payload.clone()),
            Some(b) => {
                log::warn!(
                    "submit shortcut bound to stale store version {} (current {}); refusing to emit",
                    b.version,
                    store.version()
                );
                None
            }
            None => None,
        }
    }

    /// Deregister the listener. Idempotent.
    pub fn release(&mut self) {
        if self.binding.take().is_some() {
            log::debug!("submit shortcut listener released");
        }
    }
}

impl Drop for SubmitShortcut {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::BoundingBox;
    use std::collections::HashMap;

    fn registry() -> LabelRegistry {
        LabelRegistry::new(
            vec!["cat".to_string()],
            HashMap::from([("cat".to_string(), "#ff0000".to_string())]),
        )
    }

    #[test]
    fn test_disabled_shortcut_never_emits() {
        let reg = registry();
        let mut store = RectStore::new();
        store.add(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "cat");
        let mut shortcut = SubmitShortcut::new(false);
        shortcut.sync(&store, &reg);
        assert!(shortcut.trigger(&store).is_none());
    }

    #[test]
    fn test_synced_shortcut_captures_latest_state() {
        let reg = registry();
        let mut store = RectStore::new();
        let mut shortcut = SubmitShortcut::new(true);
        shortcut.sync(&store, &reg);

        store.add(BoundingBox::new(10.0, 20.0, 30.0, 40.0), "cat");
        shortcut.sync(&store, &reg);

        let payload = shortcut.trigger(&store).expect("bound and current");
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].bbox, [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_stale_binding_refuses_to_emit() {
        let reg = registry();
        let mut store = RectStore::new();
        let mut shortcut = SubmitShortcut::new(true);
        shortcut.sync(&store, &reg);

        // Mutate without re-syncing: the binding is now stale.
        store.add(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "cat");
        assert!(!shortcut.is_bound_to(&store));
        assert!(shortcut.trigger(&store).is_none());
    }

    #[test]
    fn test_release_is_idempotent() {
        let reg = registry();
        let store = RectStore::new();
        let mut shortcut = SubmitShortcut::new(true);
        shortcut.sync(&store, &reg);
        shortcut.release();
        shortcut.release();
        assert!(shortcut.trigger(&store).is_none());
    }
}
