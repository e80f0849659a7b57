//! Input events delivered to the widget.
//!
//! The host environment (or the presentation layer it embeds) translates raw
//! UI input into these events and feeds them to [`crate::BboxWidget`] in
//! delivery order. All pointer positions are in display pixels; the widget
//! converts them at the geometry boundary.

use crate::geometry::Point;

/// Keys the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Keyboard submit shortcut (when enabled by the host)
    Space,
    /// Cancel the in-progress gesture
    Escape,
    /// Delete the selected rectangle
    Delete,
}

/// Events that can be sent to update widget state.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Primary pointer pressed on the canvas (display coordinates)
    PointerDown(Point),
    /// Pointer moved while pressed (display coordinates)
    PointerMoved(Point),
    /// Primary pointer released (display coordinates)
    PointerReleased(Point),
    /// A key the widget cares about was pressed
    KeyPressed(Key),
    /// The host viewport was resized to the given width
    ViewportResized { width: f32 },
    /// A label was chosen in the class picker
    LabelPicked(String),
    /// The completion button was activated
    CompleteClicked,
}
