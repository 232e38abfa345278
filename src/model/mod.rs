//! Landmark data model: points, markers, groups and the model that owns them.

mod group;
mod interaction;
mod landmarks;
mod marker;
mod point;

pub use group::{LandmarkGroup, Outline};
pub use interaction::{DragState, HitTarget, InteractionController, PointerEvent};
pub use landmarks::LandmarkModel;
pub use marker::{GroupId, Marker, MarkerGlyph, MarkerHandle, MarkerState, MarkerStyle};
pub use point::{Point, Rect};
