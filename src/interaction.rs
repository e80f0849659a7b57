//! Pointer gesture state machine.
//!
//! One tagged state per gesture kind rules out the invalid flag
//! combinations ("dragging while drawing") that plague boolean-tracked
//! implementations. Pointer input arrives in display pixels and is
//! converted to image-native coordinates on entry; everything the
//! controller writes to the store is image-native.

use crate::annotation::{BoundingBox, RectId, RectPatch, RectStore};
use crate::constants::{HANDLE_HIT_RADIUS, MIN_DRAW_EXTENT};
use crate::geometry::{Point, Scale};

/// Which resize handle of the selected rectangle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    NW,
    N,
    NE,
    W,
    E,
    SW,
    S,
    SE,
}

impl ResizeHandle {
    /// All handles with their unit offsets from the box center
    /// (-1 = min edge, 0 = midpoint, 1 = max edge).
    pub const ALL: [(ResizeHandle, f32, f32); 8] = [
        (ResizeHandle::NW, -1.0, -1.0),
        (ResizeHandle::N, 0.0, -1.0),
        (ResizeHandle::NE, 1.0, -1.0),
        (ResizeHandle::W, -1.0, 0.0),
        (ResizeHandle::E, 1.0, 0.0),
        (ResizeHandle::SW, -1.0, 1.0),
        (ResizeHandle::S, 0.0, 1.0),
        (ResizeHandle::SE, 1.0, 1.0),
    ];

    /// Position of this handle on a normalized box, in image coordinates.
    pub fn position(self, bbox: BoundingBox) -> Point {
        let (_, sx, sy) = Self::ALL
            .iter()
            .copied()
            .find(|(h, _, _)| *h == self)
            .unwrap_or((self, 0.0, 0.0));
        let cx = bbox.x + bbox.width * 0.5;
        let cy = bbox.y + bbox.height * 0.5;
        Point::new(cx + sx * bbox.width * 0.5, cy + sy * bbox.height * 0.5)
    }
}

/// The current pointer gesture. All coordinates are image-native.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// No gesture in progress.
    Idle,
    /// A new rectangle is being sized from its origin corner.
    Drawing { origin: Point, current: Point },
    /// An existing rectangle is being translated.
    Dragging {
        id: RectId,
        start: BoundingBox,
        last: Point,
    },
    /// One handle of the selected rectangle is being dragged.
    Resizing {
        id: RectId,
        handle: ResizeHandle,
        start: BoundingBox,
        last: Point,
    },
}

/// Translates pointer events into store mutations.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::Idle
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Pointer pressed at `pos_display`. Hit order: resize handles of the
    /// selected rectangle, then rectangle bodies topmost-first, then empty
    /// canvas (which clears selection and starts a draw).
    pub fn pointer_down(&mut self, store: &mut RectStore, scale: Scale, pos_display: Point) {
        let pos = scale.point_to_image(pos_display);

        if let Some(sel) = store.selected_rect() {
            if let Some(handle) = hit_handle(sel.bbox, scale, pos_display) {
                log::debug!("resize started on {} via {handle:?}", sel.id);
                self.gesture = Gesture::Resizing {
                    id: sel.id.clone(),
                    handle,
                    start: sel.bbox,
                    last: pos,
                };
                return;
            }
        }

        let hit = store
            .iter()
            .rev()
            .find(|r| r.bbox.contains(pos))
            .map(|r| (r.id.clone(), r.bbox));
        if let Some((id, bbox)) = hit {
            store.select(Some(&id));
            log::debug!("drag started on {id}");
            self.gesture = Gesture::Dragging {
                id,
                start: bbox,
                last: pos,
            };
            return;
        }

        store.select(None);
        self.gesture = Gesture::Drawing {
            origin: pos,
            current: pos,
        };
    }

    /// Pointer moved while pressed. Deltas are measured in display pixels
    /// and divided by scale before being applied.
    pub fn pointer_moved(&mut self, store: &mut RectStore, scale: Scale, pos_display: Point) {
        let pos = scale.point_to_image(pos_display);
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing { current, .. } => {
                *current = pos;
            }
            Gesture::Dragging { id, last, .. } => {
                let (dx, dy) = (pos.x - last.x, pos.y - last.y);
                *last = pos;
                if let Some(rect) = store.get(id) {
                    let moved = BoundingBox::new(
                        rect.bbox.x + dx,
                        rect.bbox.y + dy,
                        rect.bbox.width,
                        rect.bbox.height,
                    );
                    let id = id.clone();
                    store.update(&id, RectPatch::bbox(moved));
                }
            }
            Gesture::Resizing {
                id, handle, last, ..
            } => {
                let (dx, dy) = (pos.x - last.x, pos.y - last.y);
                *last = pos;
                let handle = *handle;
                if let Some(rect) = store.get(id) {
                    // Width/height may cross zero here; normalization
                    // happens on release.
                    let resized = apply_resize(rect.bbox, handle, dx, dy);
                    let id = id.clone();
                    store.update(&id, RectPatch::bbox(resized));
                }
            }
        }
    }

    /// Pointer released: commit the gesture and return to idle. A gesture
    /// that ends off-canvas is clamped to canvas bounds before commit.
    /// Returns the id of a newly created rectangle, if the gesture was a
    /// draw that survived the minimum-size check.
    pub fn pointer_released(
        &mut self,
        store: &mut RectStore,
        scale: Scale,
        pos_display: Point,
        image_w: f32,
        image_h: f32,
        picker_label: &str,
    ) -> Option<RectId> {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => None,
            Gesture::Drawing { origin, .. } => {
                let end = scale
                    .point_to_image(pos_display)
                    .clamped(image_w, image_h);
                let bbox = BoundingBox::from_corners(origin, end);
                if scale.to_display(bbox.width) < MIN_DRAW_EXTENT
                    || scale.to_display(bbox.height) < MIN_DRAW_EXTENT
                {
                    // Accidental click, not an annotation.
                    return None;
                }
                let id = store.add(bbox.clamped(image_w, image_h), picker_label);
                log::debug!("draw committed as {id} ({picker_label})");
                Some(id)
            }
            Gesture::Dragging { id, .. } | Gesture::Resizing { id, .. } => {
                if let Some(rect) = store.get(&id) {
                    let committed = rect.bbox.clamped(image_w, image_h);
                    store.update(&id, RectPatch::bbox(committed));
                }
                None
            }
        }
    }

    /// Explicit cancel (escape key): discard an in-progress draw, restore
    /// the pre-gesture geometry of a drag or resize.
    pub fn cancel(&mut self, store: &mut RectStore) {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle | Gesture::Drawing { .. } => {}
            Gesture::Dragging { id, start, .. } | Gesture::Resizing { id, start, .. } => {
                log::debug!("gesture on {id} cancelled, geometry restored");
                store.update(&id, RectPatch::bbox(start));
            }
        }
    }
}

/// Move the edges addressed by `handle` by the given image-space delta.
fn apply_resize(bbox: BoundingBox, handle: ResizeHandle, dx: f32, dy: f32) -> BoundingBox {
    let mut b = bbox;
    match handle {
        ResizeHandle::NW | ResizeHandle::W | ResizeHandle::SW => {
            b.x += dx;
            b.width -= dx;
        }
        ResizeHandle::NE | ResizeHandle::E | ResizeHandle::SE => {
            b.width += dx;
        }
        ResizeHandle::N | ResizeHandle::S => {}
    }
    match handle {
        ResizeHandle::NW | ResizeHandle::N | ResizeHandle::NE => {
            b.y += dy;
            b.height -= dy;
        }
        ResizeHandle::SW | ResizeHandle::S | ResizeHandle::SE => {
            b.height += dy;
        }
        ResizeHandle::W | ResizeHandle::E => {}
    }
    b
}

/// Test the pointer against the 8 handles of a rectangle, in display space.
fn hit_handle(bbox: BoundingBox, scale: Scale, pos_display: Point) -> Option<ResizeHandle> {
    let bbox = bbox.normalized();
    for (handle, _, _) in ResizeHandle::ALL {
        let p = scale.point_to_display(handle.position(bbox));
        let (dx, dy) = (pos_display.x - p.x, pos_display.y - p.y);
        if (dx * dx + dy * dy).sqrt() <= HANDLE_HIT_RADIUS {
            return Some(handle);
        }
    }
    None
}
