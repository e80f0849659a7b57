//! Label registry: the fixed session vocabulary and its colors.
//!
//! The registry is built once at mount from the host-supplied label list and
//! color map and is immutable afterwards. Labels without a supplied color
//! get a generated fallback so every registry label always has a color.

use std::collections::HashMap;

use crate::annotation::RectStore;
use crate::constants::FALLBACK_COLOR;

/// Ordered label vocabulary with a color per label.
#[derive(Debug, Clone)]
pub struct LabelRegistry {
    labels: Vec<String>,
    colors: HashMap<String, String>,
}

impl LabelRegistry {
    /// Build the registry. `labels` is assumed distinct (validated by the
    /// widget at mount); labels missing from `colors` receive a generated
    /// color spread over the hue circle.
    pub fn new(labels: Vec<String>, mut colors: HashMap<String, String>) -> Self {
        let total = labels.len().max(1);
        for (index, label) in labels.iter().enumerate() {
            if !colors.contains_key(label) {
                let color = generated_color(index, total);
                log::warn!("no color supplied for label {label:?}, using generated {color}");
                colors.insert(label.clone(), color);
            }
        }
        Self { labels, colors }
    }

    /// Labels in registry order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The stroke color for a label, as a `#rrggbb` hex string.
    /// This is the single source of truth for rectangle colors.
    pub fn color_of(&self, label: &str) -> &str {
        self.colors
            .get(label)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Registry index of a label, or `-1` if absent.
    pub fn label_id(&self, label: &str) -> i32 {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    /// Labels, in registry order, not yet used by any rectangle in the store.
    /// Pure function of the current store contents; the completion gate's
    /// sole input.
    pub fn missing_labels<'a>(&'a self, store: &RectStore) -> Vec<&'a str> {
        self.labels
            .iter()
            .filter(|label| !store.iter().any(|r| &r.label == *label))
            .map(String::as_str)
            .collect()
    }
}

/// Generate a hex color for label `index` of `total`, spreading hues evenly
/// over the circle the way the original tooling derived its colormap.
fn generated_color(index: usize, total: usize) -> String {
    let hue = index as f32 / total as f32 * 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.9);
    format!(
        "#{:02x}{:02x}{:02x}",
        (r * 255.0) as u8,
        (g * 255.0) as u8,
        (b * 255.0) as u8
    )
}

/// Convert HSV (h in degrees, s and v in 0-1) to RGB in 0-1.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}
