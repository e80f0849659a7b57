//! Rectangle data model and store.
//!
//! A [`Rect`] is one bounding-box annotation: stable id, geometry in
//! image-native pixels, and a label drawn from the session vocabulary. The
//! stroke color is deliberately *not* stored here; it is the projection
//! `registry.color_of(label)` and is recomputed on read so it can never
//! drift from the label.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Opaque stable identifier for a rectangle, unique within a session.
pub type RectId = String;

/// An axis-aligned bounding box in image-native pixels.
///
/// Width and height may be negative transiently while a resize gesture
/// crosses itself; [`BoundingBox::normalized`] must be applied before the
/// box is considered valid or committed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the box
    pub width: f32,
    /// Height of the box
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a normalized bounding box from two corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Swap corners so that width and height are non-negative.
    pub fn normalized(self) -> Self {
        let x = if self.width < 0.0 { self.x + self.width } else { self.x };
        let y = if self.height < 0.0 { self.y + self.height } else { self.y };
        Self {
            x,
            y,
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }

    /// Normalize and clamp the box into the canvas `[0, image_w] x [0, image_h]`.
    pub fn clamped(self, image_w: f32, image_h: f32) -> Self {
        let b = self.normalized();
        let width = b.width.min(image_w);
        let height = b.height.min(image_h);
        Self {
            x: b.x.clamp(0.0, (image_w - width).max(0.0)),
            y: b.y.clamp(0.0, (image_h - height).max(0.0)),
            width,
            height,
        }
    }

    /// Check if a point is inside the box. Assumes a normalized box.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    /// The `[x, y, width, height]` wire form.
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// A single bounding-box annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    /// Stable identifier, assigned at creation and never reused.
    pub id: RectId,
    /// Geometry in image-native pixels.
    pub bbox: BoundingBox,
    /// Label, always a member of the session vocabulary.
    pub label: String,
}

/// Partial update applied to a stored rectangle via [`RectStore::update`].
#[derive(Debug, Clone, Default)]
pub struct RectPatch {
    pub bbox: Option<BoundingBox>,
    pub label: Option<String>,
}

impl RectPatch {
    pub fn bbox(bbox: BoundingBox) -> Self {
        Self {
            bbox: Some(bbox),
            label: None,
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            bbox: None,
            label: Some(label.into()),
        }
    }
}

/// Ordered collection of rectangles plus the current selection.
///
/// All mutation goes through the methods here; each effective mutation bumps
/// an internal version so observers (render, missing-label check, the
/// keyboard-submit binding) can detect change by version comparison instead
/// of deep inspection.
#[derive(Debug, Clone, Default)]
pub struct RectStore {
    rects: Vec<Rect>,
    selected: Option<RectId>,
    next_index: usize,
    version: u64,
}

impl RectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version counter, bumped on every effective mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Rectangles in creation/seed order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rect> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rect> {
        self.rects.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a new rectangle with a freshly generated id.
    pub fn add(&mut self, bbox: BoundingBox, label: impl Into<String>) -> RectId {
        let id = format!("bbox-{}", self.next_index);
        self.next_index += 1;
        self.rects.push(Rect {
            id: id.clone(),
            bbox,
            label: label.into(),
        });
        self.version += 1;
        id
    }

    /// Merge a patch into the rectangle with the given id.
    /// Unknown ids are ignored: stale references are reachable under normal
    /// UI event ordering and must not fault.
    pub fn update(&mut self, id: &str, patch: RectPatch) {
        let Some(rect) = self.rects.iter_mut().find(|r| r.id == id) else {
            log::debug!("update ignored for unknown rectangle id {id}");
            return;
        };
        if let Some(bbox) = patch.bbox {
            rect.bbox = bbox;
        }
        if let Some(label) = patch.label {
            rect.label = label;
        }
        self.version += 1;
    }

    /// Remove a rectangle, clearing the selection if it referenced it.
    pub fn remove(&mut self, id: &str) -> Option<Rect> {
        let pos = self.rects.iter().position(|r| r.id == id)?;
        let removed = self.rects.remove(pos);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.version += 1;
        Some(removed)
    }

    /// Set or clear the selection. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<&str>) {
        let next = match id {
            Some(id) if self.contains(id) => Some(id.to_string()),
            Some(id) => {
                log::debug!("selection ignored for unknown rectangle id {id}");
                return;
            }
            None => None,
        };
        if self.selected != next {
            self.selected = next;
            self.version += 1;
        }
    }

    /// Id of the selected rectangle, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected rectangle, if any.
    pub fn selected_rect(&self) -> Option<&Rect> {
        let id = self.selected.as_deref()?;
        self.get(id)
    }
}
