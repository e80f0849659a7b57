//! Completion gate: submittability check and finalized payload builder.

use serde::{Deserialize, Serialize};

use crate::annotation::RectStore;
use crate::labels::LabelRegistry;

/// One finalized rectangle in the payload handed back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadEntry {
    /// `[x, y, width, height]` in image-native pixels.
    pub bbox: [f32; 4],
    /// Index of the label in the registry's ordered list, `-1` if absent.
    pub label_id: i32,
    /// The label string.
    pub label: String,
}

/// A rectangle set is submittable iff every registry label is represented.
pub fn is_submittable(store: &RectStore, registry: &LabelRegistry) -> bool {
    registry.missing_labels(store).is_empty()
}

/// Snapshot the current rectangle set as the host payload, in store order.
/// The result is detached from the store; later edits do not affect it.
pub fn build_payload(store: &RectStore, registry: &LabelRegistry) -> Vec<PayloadEntry> {
    store
        .iter()
        .map(|rect| PayloadEntry {
            bbox: rect.bbox.to_array(),
            label_id: registry.label_id(&rect.label),
            label: rect.label.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::BoundingBox;
    use std::collections::HashMap;

    fn registry() -> LabelRegistry {
        LabelRegistry::new(
            vec!["cat".to_string(), "dog".to_string()],
            HashMap::from([
                ("cat".to_string(), "#ff0000".to_string()),
                ("dog".to_string(), "#00ff00".to_string()),
            ]),
        )
    }

    #[test]
    fn test_seeded_payload_round_trip() {
        // Seed bbox_info=[{bbox:[10,20,30,40], label:"cat"}] before any edits.
        let reg = registry();
        let mut store = RectStore::new();
        store.add(BoundingBox::new(10.0, 20.0, 30.0, 40.0), "cat");

        let payload = build_payload(&store, &reg);
        assert_eq!(
            payload,
            vec![PayloadEntry {
                bbox: [10.0, 20.0, 30.0, 40.0],
                label_id: 0,
                label: "cat".to_string(),
            }]
        );
        assert_eq!(reg.missing_labels(&store), vec!["dog"]);
        assert!(!is_submittable(&store, &reg));
    }

    #[test]
    fn test_submittable_iff_no_missing_labels() {
        let reg = registry();
        let mut store = RectStore::new();
        store.add(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "cat");
        assert!(!is_submittable(&store, &reg));
        store.add(BoundingBox::new(20.0, 0.0, 10.0, 10.0), "dog");
        assert!(is_submittable(&store, &reg));
    }

    #[test]
    fn test_payload_is_a_snapshot() {
        let reg = registry();
        let mut store = RectStore::new();
        let id = store.add(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "cat");
        let payload = build_payload(&store, &reg);
        store.update(&id, crate::annotation::RectPatch::label("dog"));
        assert_eq!(payload[0].label, "cat");
    }

    #[test]
    fn test_payload_serializes_to_wire_shape() {
        let reg = registry();
        let mut store = RectStore::new();
        store.add(BoundingBox::new(10.0, 20.0, 30.0, 40.0), "cat");
        let json = serde_json::to_string(&build_payload(&store, &reg)).expect("serialize");
        assert_eq!(
            json,
            r#"[{"bbox":[10.0,20.0,30.0,40.0],"label_id":0,"label":"cat"}]"#
        );
    }
}
