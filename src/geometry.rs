//! Geometry and display-scale conversions.
//!
//! All rectangle state is kept in image-native pixels. Pointer input arrives
//! in display pixels and crosses this boundary exactly once, at the edge of
//! the interaction controller; nothing downstream ever sees display
//! coordinates.

use crate::constants::{MIN_SCALE, VIEWPORT_WIDTH_FRACTION};

/// A 2D point. The coordinate space (image-native vs display) is determined
/// by context; conversions go through [`Scale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp the point into the rectangle `[0, width] x [0, height]`.
    pub fn clamped(self, width: f32, height: f32) -> Self {
        Self {
            x: self.x.clamp(0.0, width),
            y: self.y.clamp(0.0, height),
        }
    }
}

/// Display scale factor relating image-native pixels to on-screen pixels.
///
/// Always in `(0, 1]`: the canvas is shrunk to fit the viewport but never
/// upscaled past native resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(f32);

impl Scale {
    /// Fit an image of `image_width` native pixels into the host viewport,
    /// leaving the configured margin. Recomputed on every viewport resize.
    pub fn fit(viewport_width: f32, image_width: f32) -> Self {
        let ratio = viewport_width * VIEWPORT_WIDTH_FRACTION / image_width;
        Self(ratio.min(1.0).max(MIN_SCALE))
    }

    /// The raw scale factor.
    pub fn factor(self) -> f32 {
        self.0
    }

    /// Convert a length or coordinate from image-native to display pixels.
    pub fn to_display(self, v: f32) -> f32 {
        v * self.0
    }

    /// Convert a length or coordinate from display to image-native pixels.
    pub fn to_image(self, v: f32) -> f32 {
        v / self.0
    }

    pub fn point_to_display(self, p: Point) -> Point {
        Point::new(self.to_display(p.x), self.to_display(p.y))
    }

    pub fn point_to_image(self, p: Point) -> Point {
        Point::new(self.to_image(p.x), self.to_image(p.y))
    }

    /// Display height the host frame must provide for the full image.
    pub fn display_height(self, image_height: f32) -> f32 {
        image_height * self.0
    }
}
