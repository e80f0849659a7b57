//! Root widget: owns the engine state, dispatches events, syncs the host.
//!
//! The host mounts one widget per annotation session, feeds it
//! [`Event`]s in delivery order, and receives layout and completion signals
//! through its [`HostSink`]. Rendering reads [`BboxWidget::view`].

use crate::annotation::{BoundingBox, RectPatch, RectStore};
use crate::completion::{build_payload, is_submittable};
use crate::error::InitError;
use crate::geometry::Scale;
use crate::host::{resolve_image_url, HostSink, InitArgs};
use crate::interaction::{Gesture, InteractionController, ResizeHandle};
use crate::labels::LabelRegistry;
use crate::message::{Event, Key};
use crate::shortcut::SubmitShortcut;
use crate::view::{CanvasView, CompleteView, HandleView, PickerView, RectView};

/// The annotation widget core.
pub struct BboxWidget {
    store: RectStore,
    registry: LabelRegistry,
    controller: InteractionController,
    shortcut: SubmitShortcut,
    scale: Scale,
    picker_label: String,
    image_url: String,
    image_width: f32,
    image_height: f32,
    line_width: f32,
}

impl BboxWidget {
    /// Validate the host input and mount a fresh session. Reports the
    /// initial display height to the host as a side effect.
    pub fn mount(
        args: InitArgs,
        base_url: Option<&str>,
        viewport_width: f32,
        host: &mut dyn HostSink,
    ) -> Result<Self, InitError> {
        let [image_width, image_height] = args.image_size;
        if image_width <= 0.0 || image_height <= 0.0 {
            return Err(InitError::InvalidImageSize {
                width: image_width,
                height: image_height,
            });
        }
        let Some(first_label) = args.label_list.first().cloned() else {
            return Err(InitError::EmptyLabelList);
        };
        for (i, label) in args.label_list.iter().enumerate() {
            if args.label_list[..i].contains(label) {
                return Err(InitError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }

        let registry = LabelRegistry::new(args.label_list, args.color_map);
        let mut store = RectStore::new();
        for seed in &args.bbox_info {
            if !registry.contains(&seed.label) {
                return Err(InitError::UnknownSeedLabel {
                    label: seed.label.clone(),
                });
            }
            store.add(BoundingBox::from(seed.bbox), seed.label.clone());
        }

        let scale = Scale::fit(viewport_width, image_width);
        host.report_height(scale.display_height(image_height));

        let mut shortcut = SubmitShortcut::new(args.enable_keyboard_submit);
        shortcut.sync(&store, &registry);

        log::debug!(
            "widget mounted: {} labels, {} seed rectangles, scale {:.3}",
            registry.labels().len(),
            store.len(),
            scale.factor()
        );

        Ok(Self {
            store,
            registry,
            controller: InteractionController::new(),
            shortcut,
            scale,
            picker_label: first_label,
            image_url: resolve_image_url(base_url, &args.image_url),
            image_width,
            image_height,
            line_width: args.line_width,
        })
    }

    pub fn store(&self) -> &RectStore {
        &self.store
    }

    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// The current class-picker label.
    pub fn picker_label(&self) -> &str {
        &self.picker_label
    }

    pub fn is_submittable(&self) -> bool {
        is_submittable(&self.store, &self.registry)
    }

    /// Process one input event. All state transitions happen synchronously
    /// inside this call, in delivery order.
    pub fn handle_event(&mut self, event: Event, host: &mut dyn HostSink) {
        match event {
            Event::PointerDown(pos) => {
                self.controller.pointer_down(&mut self.store, self.scale, pos);
                // Selection is a side effect of the press; the picker
                // reflects the selected rectangle's label.
                if let Some(rect) = self.store.selected_rect() {
                    self.picker_label = rect.label.clone();
                }
                self.after_mutation();
            }
            Event::PointerMoved(pos) => {
                self.controller.pointer_moved(&mut self.store, self.scale, pos);
                self.after_mutation();
            }
            Event::PointerReleased(pos) => {
                // Newly drawn rectangles are not auto-selected.
                let _ = self.controller.pointer_released(
                    &mut self.store,
                    self.scale,
                    pos,
                    self.image_width,
                    self.image_height,
                    &self.picker_label,
                );
                self.after_mutation();
            }
            Event::KeyPressed(Key::Escape) => {
                self.controller.cancel(&mut self.store);
                self.after_mutation();
            }
            Event::KeyPressed(Key::Delete) => {
                if self.controller.is_active() {
                    return;
                }
                if let Some(id) = self.store.selected().map(str::to_string) {
                    self.store.remove(&id);
                    self.after_mutation();
                }
            }
            Event::KeyPressed(Key::Space) => {
                let Some(payload) = self.shortcut.trigger(&self.store) else {
                    return;
                };
                if is_submittable(&self.store, &self.registry) {
                    log::debug!("keyboard submit: {} rectangles", payload.len());
                    host.submit(&payload);
                } else {
                    log::debug!("keyboard submit refused: labels missing");
                }
            }
            Event::ViewportResized { width } => {
                self.scale = Scale::fit(width, self.image_width);
                host.report_height(self.scale.display_height(self.image_height));
            }
            Event::LabelPicked(label) => {
                if !self.registry.contains(&label) {
                    log::warn!("picker label {label:?} is not in the registry, ignoring");
                    return;
                }
                self.picker_label = label.clone();
                if let Some(id) = self.store.selected().map(str::to_string) {
                    self.store.update(&id, RectPatch::label(label));
                    self.after_mutation();
                }
            }
            Event::CompleteClicked => self.submit_if_complete(host),
        }
    }

    /// Re-sync everything that captures a rectangle snapshot. Called after
    /// every event that may have mutated the store.
    fn after_mutation(&mut self) {
        self.shortcut.sync(&self.store, &self.registry);
    }

    /// Emit the finalized payload iff every label is represented. Refuses
    /// (without emitting anything) otherwise, even if the caller bypassed
    /// the disabled completion button.
    fn submit_if_complete(&mut self, host: &mut dyn HostSink) {
        let missing = self.registry.missing_labels(&self.store);
        if !missing.is_empty() {
            log::debug!("completion refused, missing labels: {missing:?}");
            return;
        }
        let payload = build_payload(&self.store, &self.registry);
        log::debug!("completion: submitting {} rectangles", payload.len());
        host.submit(&payload);
    }

    /// Snapshot the widget for one render pass.
    pub fn view(&self) -> CanvasView {
        let rects = self
            .store
            .iter()
            .map(|rect| {
                let b = rect.bbox.normalized();
                RectView {
                    id: rect.id.clone(),
                    x: self.scale.to_display(b.x),
                    y: self.scale.to_display(b.y),
                    width: self.scale.to_display(b.width),
                    height: self.scale.to_display(b.height),
                    stroke: self.registry.color_of(&rect.label).to_string(),
                    stroke_width: self.line_width,
                    selected: self.store.selected() == Some(rect.id.as_str()),
                }
            })
            .collect();

        let handles = self
            .store
            .selected_rect()
            .map(|rect| {
                let b = rect.bbox.normalized();
                ResizeHandle::ALL
                    .iter()
                    .map(|(handle, _, _)| {
                        let p = self.scale.point_to_display(handle.position(b));
                        HandleView {
                            handle: *handle,
                            x: p.x,
                            y: p.y,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let preview = match self.controller.gesture() {
            Gesture::Drawing { origin, current } => {
                let b = BoundingBox::from_corners(*origin, *current);
                Some(RectView {
                    id: String::new(),
                    x: self.scale.to_display(b.x),
                    y: self.scale.to_display(b.y),
                    width: self.scale.to_display(b.width),
                    height: self.scale.to_display(b.height),
                    stroke: self.registry.color_of(&self.picker_label).to_string(),
                    stroke_width: self.line_width,
                    selected: false,
                })
            }
            _ => None,
        };

        let missing: Vec<String> = self
            .registry
            .missing_labels(&self.store)
            .into_iter()
            .map(str::to_string)
            .collect();

        CanvasView {
            image_url: self.image_url.clone(),
            width: self.scale.to_display(self.image_width),
            height: self.scale.to_display(self.image_height),
            rects,
            handles,
            preview,
            picker: PickerView {
                labels: self.registry.labels().to_vec(),
                current: self.picker_label.clone(),
            },
            complete: CompleteView {
                enabled: missing.is_empty(),
                missing,
            },
        }
    }
}

impl Drop for BboxWidget {
    fn drop(&mut self) {
        // Teardown mirrors the original unmount: the keyboard listener must
        // not leak across re-renders.
        self.shortcut.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::PayloadEntry;
    use crate::geometry::Point;
    use std::collections::HashMap;

    /// Test double recording everything sent to the host.
    #[derive(Default)]
    struct RecordingHost {
        heights: Vec<f32>,
        submissions: Vec<Vec<PayloadEntry>>,
    }

    impl HostSink for RecordingHost {
        fn report_height(&mut self, pixels: f32) {
            self.heights.push(pixels);
        }

        fn submit(&mut self, payload: &[PayloadEntry]) {
            self.submissions.push(payload.to_vec());
        }
    }

    fn init_args() -> InitArgs {
        InitArgs {
            image_url: "/media/deer.jpg".to_string(),
            image_size: [1000.0, 600.0],
            label_list: vec!["cat".to_string(), "dog".to_string()],
            bbox_info: vec![crate::host::BboxSeed {
                bbox: [10.0, 20.0, 30.0, 40.0],
                label: "cat".to_string(),
            }],
            color_map: HashMap::from([
                ("cat".to_string(), "#ff0000".to_string()),
                ("dog".to_string(), "#00ff00".to_string()),
            ]),
            line_width: 3.0,
            enable_keyboard_submit: true,
        }
    }

    fn mount(host: &mut RecordingHost) -> BboxWidget {
        BboxWidget::mount(init_args(), None, 2000.0, host).expect("mount")
    }

    #[test]
    fn test_mount_reports_initial_height() {
        let mut host = RecordingHost::default();
        let widget = mount(&mut host);
        // 2000 * 0.8 / 1000 = 1.6 clamped to 1.0, so full image height.
        assert_eq!(widget.scale().factor(), 1.0);
        assert_eq!(host.heights, vec![600.0]);
    }

    #[test]
    fn test_mount_rejects_bad_input() {
        let mut host = RecordingHost::default();

        let mut args = init_args();
        args.label_list.clear();
        assert!(matches!(
            BboxWidget::mount(args, None, 2000.0, &mut host),
            Err(InitError::EmptyLabelList)
        ));

        let mut args = init_args();
        args.label_list.push("cat".to_string());
        assert!(matches!(
            BboxWidget::mount(args, None, 2000.0, &mut host),
            Err(InitError::DuplicateLabel { .. })
        ));

        let mut args = init_args();
        args.image_size = [0.0, 600.0];
        assert!(matches!(
            BboxWidget::mount(args, None, 2000.0, &mut host),
            Err(InitError::InvalidImageSize { .. })
        ));

        let mut args = init_args();
        args.bbox_info[0].label = "bird".to_string();
        assert!(matches!(
            BboxWidget::mount(args, None, 2000.0, &mut host),
            Err(InitError::UnknownSeedLabel { .. })
        ));
    }

    #[test]
    fn test_viewport_resize_recomputes_scale_and_reports() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        widget.handle_event(Event::ViewportResized { width: 500.0 }, &mut host);
        // 500 * 0.8 / 1000 = 0.4
        assert!((widget.scale().factor() - 0.4).abs() < 1e-6);
        assert_eq!(host.heights.len(), 2);
        assert!((host.heights[1] - 600.0 * 0.4).abs() < 1e-3);
    }

    #[test]
    fn test_completion_refused_while_labels_missing() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        assert!(!widget.is_submittable());
        assert_eq!(widget.view().complete.missing, vec!["dog".to_string()]);
        assert!(!widget.view().complete.enabled);

        widget.handle_event(Event::CompleteClicked, &mut host);
        widget.handle_event(Event::KeyPressed(Key::Space), &mut host);
        assert!(host.submissions.is_empty());
    }

    #[test]
    fn test_draw_then_complete_submits_payload() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        // Pick "dog" and draw its box.
        widget.handle_event(Event::LabelPicked("dog".to_string()), &mut host);
        widget.handle_event(Event::PointerDown(Point::new(500.0, 100.0)), &mut host);
        widget.handle_event(Event::PointerMoved(Point::new(600.0, 200.0)), &mut host);
        widget.handle_event(Event::PointerReleased(Point::new(600.0, 200.0)), &mut host);

        assert!(widget.is_submittable());
        widget.handle_event(Event::CompleteClicked, &mut host);

        assert_eq!(host.submissions.len(), 1);
        let payload = &host.submissions[0];
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0].label, "cat");
        assert_eq!(payload[0].bbox, [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(payload[0].label_id, 0);
        assert_eq!(payload[1].label, "dog");
        assert_eq!(payload[1].label_id, 1);
        assert_eq!(payload[1].bbox, [500.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_keyboard_submit_captures_latest_rectangles() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        widget.handle_event(Event::LabelPicked("dog".to_string()), &mut host);
        widget.handle_event(Event::PointerDown(Point::new(500.0, 100.0)), &mut host);
        widget.handle_event(Event::PointerMoved(Point::new(600.0, 200.0)), &mut host);
        widget.handle_event(Event::PointerReleased(Point::new(600.0, 200.0)), &mut host);

        widget.handle_event(Event::KeyPressed(Key::Space), &mut host);
        assert_eq!(host.submissions.len(), 1);
        assert_eq!(host.submissions[0].len(), 2);
    }

    #[test]
    fn test_relabel_selected_updates_color_projection() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        // Select the seeded cat box: its center (25,40) is on-screen at the
        // same coordinates at scale 1.0.
        widget.handle_event(Event::PointerDown(Point::new(25.0, 40.0)), &mut host);
        widget.handle_event(Event::PointerReleased(Point::new(25.0, 40.0)), &mut host);
        assert_eq!(widget.store().selected(), Some("bbox-0"));
        // Picker now reflects the selected rectangle.
        assert_eq!(widget.picker_label(), "cat");

        widget.handle_event(Event::LabelPicked("dog".to_string()), &mut host);
        let view = widget.view();
        assert_eq!(view.rects[0].stroke, "#00ff00");
        assert_eq!(widget.store().get("bbox-0").expect("seeded").label, "dog");
    }

    #[test]
    fn test_relabel_without_selection_only_moves_picker() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        widget.handle_event(Event::LabelPicked("dog".to_string()), &mut host);
        assert_eq!(widget.picker_label(), "dog");
        assert_eq!(widget.store().get("bbox-0").expect("seeded").label, "cat");
    }

    #[test]
    fn test_delete_removes_selected_and_clears_selection() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        widget.handle_event(Event::PointerDown(Point::new(25.0, 40.0)), &mut host);
        widget.handle_event(Event::PointerReleased(Point::new(25.0, 40.0)), &mut host);
        widget.handle_event(Event::KeyPressed(Key::Delete), &mut host);

        assert!(widget.store().is_empty());
        assert_eq!(widget.store().selected(), None);
    }

    #[test]
    fn test_view_exposes_handles_for_selection_only() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        assert!(widget.view().handles.is_empty());
        widget.handle_event(Event::PointerDown(Point::new(25.0, 40.0)), &mut host);
        widget.handle_event(Event::PointerReleased(Point::new(25.0, 40.0)), &mut host);
        assert_eq!(widget.view().handles.len(), 8);
    }

    #[test]
    fn test_view_preview_follows_draw_gesture() {
        let mut host = RecordingHost::default();
        let mut widget = mount(&mut host);

        widget.handle_event(Event::PointerDown(Point::new(500.0, 100.0)), &mut host);
        widget.handle_event(Event::PointerMoved(Point::new(600.0, 200.0)), &mut host);
        let preview = widget.view().preview.expect("drawing preview");
        assert_eq!(preview.width, 100.0);
        assert_eq!(preview.height, 100.0);

        widget.handle_event(Event::PointerReleased(Point::new(600.0, 200.0)), &mut host);
        assert!(widget.view().preview.is_none());
    }

    #[test]
    fn test_base_url_resolution_applied_at_mount() {
        let mut host = RecordingHost::default();
        let widget = BboxWidget::mount(
            init_args(),
            Some("https://host.example/app/page"),
            2000.0,
            &mut host,
        )
        .expect("mount");
        assert_eq!(
            widget.view().image_url,
            "https://host.example/app/media/deer.jpg"
        );
    }
}
