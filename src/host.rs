//! Host-facing interfaces: initialization input and outbound sync.
//!
//! The embedding transport implements [`HostSink`]; everything else here is
//! the wire shape of the one-time initialization message, kept field-for-
//! field compatible with the original component so existing hosts keep
//! working unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::completion::PayloadEntry;
use crate::constants::DEFAULT_LINE_WIDTH;
use crate::error::InitError;

/// One seed rectangle supplied by the host at mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BboxSeed {
    /// `[x, y, width, height]` in image-native pixels
    pub bbox: [f32; 4],
    /// Label, expected to be a member of `label_list`
    pub label: String,
}

/// Initialization input, received from the host once per mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitArgs {
    /// Image reference, possibly relative to the host's base URL
    pub image_url: String,
    /// Native image dimensions `[width, height]` in pixels
    pub image_size: [f32; 2],
    /// Ordered, distinct label vocabulary
    pub label_list: Vec<String>,
    /// Rectangles to seed the session with
    #[serde(default)]
    pub bbox_info: Vec<BboxSeed>,
    /// Label to hex color mapping
    #[serde(default)]
    pub color_map: HashMap<String, String>,
    /// Stroke width for rendering
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    /// Whether the space-key submit shortcut is active
    /// (the original component called this `use_space`)
    #[serde(default, alias = "use_space")]
    pub enable_keyboard_submit: bool,
}

fn default_line_width() -> f32 {
    DEFAULT_LINE_WIDTH
}

impl InitArgs {
    /// Parse initialization input from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, InitError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outbound channel to the embedding host. The transport (message passing
/// to an outer frame, a test double, a stdout driver) lives behind this.
pub trait HostSink {
    /// Size the embedding frame to the given display height, in pixels.
    /// Called on every scale recomputation.
    fn report_height(&mut self, pixels: f32);

    /// Deliver the finalized annotation payload. The terminal output of one
    /// annotation session.
    fn submit(&mut self, payload: &[PayloadEntry]);
}

/// Resolve a possibly-relative image URL against the host's base URL.
///
/// The base URL's trailing path segment (a page name) is stripped unless the
/// path already ends in `/`; a base with no path at all is treated as the
/// root path `/`. Absolute image URLs and a missing base pass through.
pub fn resolve_image_url(base_url: Option<&str>, image_url: &str) -> String {
    let Some(base) = base_url else {
        return image_url.to_string();
    };
    if image_url.contains("://") {
        return image_url.to_string();
    }

    let (origin, path) = split_origin(base);
    let path = path.split(['?', '#']).next().unwrap_or("");
    let clean_path = if path.is_empty() {
        "/"
    } else if path.ends_with('/') {
        path
    } else {
        match path.rfind('/') {
            Some(cut) => &path[..cut + 1],
            None => "/",
        }
    };

    let rel = image_url
        .strip_prefix("./")
        .unwrap_or(image_url)
        .trim_start_matches('/');
    format!("{origin}{clean_path}{rel}")
}

/// Split a URL into origin (scheme + authority) and path.
fn split_origin(url: &str) -> (&str, &str) {
    let after_scheme = match url.find("://") {
        Some(i) => i + 3,
        None => 0,
    };
    match url[after_scheme..].find('/') {
        Some(j) => url.split_at(after_scheme + j),
        None => (url, ""),
    }
}
