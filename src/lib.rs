//! Core engine for an embeddable bounding-box annotation widget.
//!
//! The crate owns the annotation state and its transition rules; rendering
//! and input capture live in the embedding host. The host mounts a
//! [`widget::BboxWidget`] from [`host::InitArgs`], feeds it
//! [`message::Event`]s, renders [`view::CanvasView`] snapshots, and receives
//! frame-height and payload callbacks through [`host::HostSink`].
//!
//! All rectangle state is image-native; display coordinates exist only at
//! the event boundary and are converted through [`geometry::Scale`].

pub mod annotation;
pub mod completion;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod labels;
pub mod message;
pub mod shortcut;
pub mod view;
pub mod widget;

pub use annotation::{BoundingBox, Rect, RectId, RectPatch, RectStore};
pub use completion::{build_payload, is_submittable, PayloadEntry};
pub use error::InitError;
pub use geometry::{Point, Scale};
pub use host::{resolve_image_url, BboxSeed, HostSink, InitArgs};
pub use interaction::{Gesture, InteractionController, ResizeHandle};
pub use labels::LabelRegistry;
pub use message::{Event, Key};
pub use shortcut::SubmitShortcut;
pub use view::CanvasView;
pub use widget::BboxWidget;
