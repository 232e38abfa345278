//! FLT - Face Label Tool
//!
//! Editing model for facial landmark annotation: draggable markers grouped
//! into named regions (e.g. `left_eye`), each group keeping its outline in
//! sync with its markers, persisted as a JSON model file that separates
//! topology (`index`, `keys`) from geometry (`pos`).

pub mod config;
pub mod constants;
pub mod format;
pub mod model;
pub mod scene;
pub mod undo;

pub use format::{FormatError, ModelSchema, read_model, write_model};
pub use model::{
    GroupId, InteractionController, LandmarkGroup, LandmarkModel, Marker, MarkerHandle, Point,
    PointerEvent,
};
pub use scene::{LabelerScene, Scene, SceneItem};
