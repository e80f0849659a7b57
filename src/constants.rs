//! Global constants for the annotation engine.

/// Fraction of the host viewport width the canvas may occupy.
/// The remaining 20% is left as margin by the embedding layout.
pub const VIEWPORT_WIDTH_FRACTION: f32 = 0.8;

/// Lower clamp for the display scale factor. Scale must stay in (0, 1].
pub const MIN_SCALE: f32 = 1e-4;

/// Minimum on-screen extent (display px) for a draw gesture to produce a
/// rectangle. Anything smaller is treated as an accidental click.
pub const MIN_DRAW_EXTENT: f32 = 1.0;

/// Hit radius around a resize handle, in display pixels.
pub const HANDLE_HIT_RADIUS: f32 = 6.0;

/// Stroke width used when the host does not supply one.
pub const DEFAULT_LINE_WIDTH: f32 = 5.0;

/// Stroke color returned for labels outside the registry vocabulary.
/// Registry labels always have a real color (supplied or generated).
pub const FALLBACK_COLOR: &str = "#808080";
