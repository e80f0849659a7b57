//! Read-only view-model for the presentation layer.
//!
//! The renderer, class picker and completion button live outside this crate;
//! they consume these snapshots and feed user input back as
//! [`crate::message::Event`]s. Everything here is display-space and carries
//! the projected stroke colors, so the renderer needs no access to the
//! engine internals.

use crate::annotation::RectId;
use crate::interaction::ResizeHandle;

/// One rectangle, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RectView {
    pub id: RectId,
    /// Display-space geometry
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Projected stroke color (`colorOf(label)`), hex
    pub stroke: String,
    pub stroke_width: f32,
    pub selected: bool,
}

/// A resize handle of the selected rectangle, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleView {
    pub handle: ResizeHandle,
    pub x: f32,
    pub y: f32,
}

/// The class picker: full vocabulary plus the current choice.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerView {
    pub labels: Vec<String>,
    pub current: String,
}

/// The completion control: enabled iff the rectangle set is submittable,
/// with the outstanding labels for the advisory box.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteView {
    pub enabled: bool,
    pub missing: Vec<String>,
}

/// Full widget snapshot for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasView {
    /// Resolved image URL; rendering degrades to an empty canvas if it
    /// fails to load, annotation state is unaffected
    pub image_url: String,
    /// Canvas size in display pixels
    pub width: f32,
    pub height: f32,
    pub rects: Vec<RectView>,
    /// Handles of the selected rectangle, if any
    pub handles: Vec<HandleView>,
    /// In-progress draw preview, if a draw gesture is active
    pub preview: Option<RectView>,
    pub picker: PickerView,
    pub complete: CompleteView,
}
