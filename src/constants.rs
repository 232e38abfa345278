//! Global constants for the FLT library

/// Default scene width when no image is loaded
pub const DEFAULT_SCENE_WIDTH: f64 = 800.0;

/// Default scene height when no image is loaded
pub const DEFAULT_SCENE_HEIGHT: f64 = 800.0;

/// Stroke width used to build the hit region of markers and group outlines.
pub const HIT_MARGIN: f64 = 10.0;

/// Half the side length of a marker glyph (cross arms and hover square).
pub const MARKER_HALF_SIZE: f64 = 5.0;

/// Pointer travel (scene units) after a press before a drag starts.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 4.0;

/// Factor applied by a single "scale up" step.
pub const DEFAULT_SCALE_STEP: f64 = 1.25;

/// Stacking order of group outlines.
pub const GROUP_Z_VALUE: i32 = 10;

/// Stacking order of markers (always above their outline).
pub const MARKER_Z_VALUE: i32 = 20;

/// Tolerance used when comparing coordinates.
pub const COORD_EPSILON: f64 = 1e-9;

/// Pen colours used when drawing markers and outlines.
pub mod colors {
    /// RGBA colour.
    pub type Rgba = [u8; 4];

    /// Default pen for markers other than the first in a group, and outlines.
    pub const GREEN: Rgba = [0, 128, 0, 255];
    /// Default pen for the first marker of a group.
    pub const YELLOW: Rgba = [255, 255, 0, 255];
    /// Hover pen.
    pub const RED: Rgba = [255, 0, 0, 255];
    /// Hover fill for markers.
    pub const RED_TRANSLUCENT: Rgba = [255, 0, 0, 32];
}
