//! Draggable landmark markers.

use crate::constants::{MARKER_HALF_SIZE, MARKER_Z_VALUE, colors};
use crate::model::point::Point;

/// Identifier of a group within its model.
///
/// Groups are numbered by creation order, so a reload of the same topology
/// hands out the same identifiers again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// Non-owning reference from a marker back to its slot in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle {
    /// Owning group.
    pub group: GroupId,
    /// Position within the group's point list.
    pub index: usize,
}

impl MarkerHandle {
    pub fn new(group: GroupId, index: usize) -> Self {
        Self { group, index }
    }
}

/// Interaction state of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    /// Not under the pointer.
    #[default]
    Normal,
    /// Pointer is over the marker's hit region.
    Hovered,
    /// Marker is following the pointer.
    Dragging,
}

/// Shape drawn for a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerGlyph {
    /// Thin cross, drawn while idle.
    Cross,
    /// Square with a cross, drawn while hovered or dragged.
    Square,
}

impl MarkerGlyph {
    /// Whether `local` (relative to the marker centre) lies within the glyph
    /// stroked with a pen `margin` wide and square caps.
    pub fn hit(&self, local: Point, margin: f64) -> bool {
        let half_pen = margin / 2.0;
        let reach = MARKER_HALF_SIZE + half_pen;
        let (dx, dy) = (local.x.abs(), local.y.abs());
        match self {
            MarkerGlyph::Cross => {
                (dx <= reach && dy <= half_pen) || (dx <= half_pen && dy <= reach)
            }
            MarkerGlyph::Square => dx <= reach && dy <= reach,
        }
    }
}

/// Pen, fill and glyph used to render a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub glyph: MarkerGlyph,
    pub pen: colors::Rgba,
    pub fill: Option<colors::Rgba>,
}

/// Notification produced when a marker's position is set.
///
/// The owning group consumes it to keep its point list in sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PointMoved {
    pub index: usize,
    pub position: Point,
}

/// A single editable landmark point.
#[derive(Debug, Clone)]
pub struct Marker {
    handle: MarkerHandle,
    position: Point,
    state: MarkerState,
    selected: bool,
}

impl Marker {
    /// Create a marker at the origin in the normal state.
    pub fn new(group: GroupId, index: usize) -> Self {
        Self {
            handle: MarkerHandle::new(group, index),
            position: Point::ZERO,
            state: MarkerState::Normal,
            selected: false,
        }
    }

    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }

    pub fn index(&self) -> usize {
        self.handle.index
    }

    /// Position in scene coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn state(&self) -> MarkerState {
        self.state
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// The first marker of a group marks the group's origin.
    pub fn is_origin(&self) -> bool {
        self.handle.index == 0
    }

    pub fn z_value(&self) -> i32 {
        MARKER_Z_VALUE
    }

    /// Set the position. The returned notification must be forwarded to the
    /// owning group's `move_point`.
    pub(crate) fn set_position(&mut self, position: Point) -> PointMoved {
        self.position = position;
        PointMoved {
            index: self.handle.index,
            position,
        }
    }

    /// Reposition without notifying the group, used when the group itself
    /// moves and carries its markers along.
    pub(crate) fn place(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn reindex(&mut self, index: usize) {
        self.handle.index = index;
    }

    pub fn hover_enter(&mut self) {
        if self.state == MarkerState::Normal {
            self.state = MarkerState::Hovered;
        }
    }

    pub fn hover_leave(&mut self) {
        if self.state == MarkerState::Hovered {
            self.state = MarkerState::Normal;
        }
    }

    /// Pointer pressed on the marker.
    pub fn press(&mut self) {
        self.selected = true;
    }

    pub fn begin_drag(&mut self) {
        self.selected = true;
        self.state = MarkerState::Dragging;
    }

    /// Pointer released. Selection does not outlive the gesture; the pointer
    /// is still over the marker, so it stays highlighted.
    pub fn release(&mut self) {
        self.selected = false;
        if self.state == MarkerState::Dragging {
            self.state = MarkerState::Hovered;
        }
    }

    pub fn glyph(&self) -> MarkerGlyph {
        match self.state {
            MarkerState::Normal => MarkerGlyph::Cross,
            MarkerState::Hovered | MarkerState::Dragging => MarkerGlyph::Square,
        }
    }

    pub fn style(&self) -> MarkerStyle {
        match self.state {
            MarkerState::Normal => MarkerStyle {
                glyph: MarkerGlyph::Cross,
                pen: if self.is_origin() {
                    colors::YELLOW
                } else {
                    colors::GREEN
                },
                fill: None,
            },
            MarkerState::Hovered | MarkerState::Dragging => MarkerStyle {
                glyph: MarkerGlyph::Square,
                pen: colors::RED,
                fill: Some(colors::RED_TRANSLUCENT),
            },
        }
    }

    /// Hit test against a scene-space point.
    pub fn contains(&self, scene_point: Point, margin: f64) -> bool {
        self.glyph().hit(scene_point - self.position, margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HIT_MARGIN;

    #[test]
    fn test_new_marker_starts_at_origin() {
        let marker = Marker::new(GroupId(2), 3);
        assert_eq!(marker.position(), Point::ZERO);
        assert_eq!(marker.state(), MarkerState::Normal);
        assert_eq!(marker.handle(), MarkerHandle::new(GroupId(2), 3));
        assert!(!marker.is_selected());
    }

    #[test]
    fn test_set_position_reports_index() {
        let mut marker = Marker::new(GroupId(0), 4);
        let moved = marker.set_position(Point::new(1.0, 2.0));
        assert_eq!(moved.index, 4);
        assert_eq!(moved.position, Point::new(1.0, 2.0));
        assert_eq!(marker.position(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_hover_cycle() {
        let mut marker = Marker::new(GroupId(0), 1);
        marker.hover_enter();
        assert_eq!(marker.state(), MarkerState::Hovered);
        assert_eq!(marker.glyph(), MarkerGlyph::Square);
        marker.hover_leave();
        assert_eq!(marker.state(), MarkerState::Normal);
        assert_eq!(marker.glyph(), MarkerGlyph::Cross);
    }

    #[test]
    fn test_hover_does_not_interrupt_drag() {
        let mut marker = Marker::new(GroupId(0), 1);
        marker.begin_drag();
        marker.hover_leave();
        assert_eq!(marker.state(), MarkerState::Dragging);
        marker.release();
        assert_eq!(marker.state(), MarkerState::Hovered);
        assert!(!marker.is_selected());
    }

    #[test]
    fn test_origin_marker_uses_distinct_pen() {
        let first = Marker::new(GroupId(0), 0);
        let second = Marker::new(GroupId(0), 1);
        assert_eq!(first.style().pen, colors::YELLOW);
        assert_eq!(second.style().pen, colors::GREEN);

        let mut hovered = first.clone();
        hovered.hover_enter();
        assert_eq!(hovered.style().pen, colors::RED);
        assert_eq!(hovered.style().fill, Some(colors::RED_TRANSLUCENT));
    }

    #[test]
    fn test_cross_hit_region_includes_margin() {
        let mut marker = Marker::new(GroupId(0), 0);
        marker.place(Point::new(100.0, 100.0));

        // Along an arm, out to arm length plus half the pen.
        assert!(marker.contains(Point::new(110.0, 100.0), HIT_MARGIN));
        assert!(marker.contains(Point::new(100.0, 90.0), HIT_MARGIN));
        assert!(marker.contains(Point::new(104.0, 104.0), HIT_MARGIN));
        // Diagonal corner is outside a cross.
        assert!(!marker.contains(Point::new(108.0, 108.0), HIT_MARGIN));
        assert!(!marker.contains(Point::new(111.0, 100.0), HIT_MARGIN));
    }

    #[test]
    fn test_square_hit_region_when_hovered() {
        let mut marker = Marker::new(GroupId(0), 0);
        marker.hover_enter();
        assert!(marker.contains(Point::new(8.0, 8.0), HIT_MARGIN));
        assert!(!marker.contains(Point::new(10.5, 0.0), HIT_MARGIN));
    }
}
