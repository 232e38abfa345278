//! Pointer interaction: hover highlighting and dragging of markers and
//! groups.
//!
//! The windowing layer translates its input events into [`PointerEvent`]s in
//! scene coordinates and feeds them to [`InteractionController::handle`],
//! which drives the model through its public editing calls.

use crate::constants::{DEFAULT_DRAG_THRESHOLD, HIT_MARGIN};
use crate::model::landmarks::LandmarkModel;
use crate::model::marker::{GroupId, MarkerHandle};
use crate::model::point::Point;
use crate::scene::Scene;
use crate::undo::Command;

/// Item under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Marker(MarkerHandle),
    Group(GroupId),
}

/// Pointer input in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved (with or without a button held).
    Moved(Point),
    /// Primary button pressed.
    Pressed(Point),
    /// Primary button released.
    Released(Point),
    /// Pointer left the view.
    Left,
}

/// Current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No button held.
    #[default]
    Idle,
    /// Button pressed on a target but not yet moved past the threshold.
    PotentialDrag { target: HitTarget, start: Point },
    /// A marker follows the pointer.
    DraggingMarker {
        handle: MarkerHandle,
        /// Marker position when the drag started.
        origin: Point,
        /// Marker position minus pointer position at press time.
        grab_offset: Point,
    },
    /// A whole group follows the pointer.
    DraggingGroup {
        group: GroupId,
        start: Point,
        last: Point,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            DragState::DraggingMarker { .. } | DragState::DraggingGroup { .. }
        )
    }
}

/// Routes pointer events onto a [`LandmarkModel`].
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: DragState,
    hovered: Option<HitTarget>,
    drag_threshold: f64,
    hit_margin: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD, HIT_MARGIN)
    }
}

impl InteractionController {
    pub fn new(drag_threshold: f64, hit_margin: f64) -> Self {
        Self {
            state: DragState::Idle,
            hovered: None,
            drag_threshold,
            hit_margin,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn hovered(&self) -> Option<HitTarget> {
        self.hovered
    }

    /// Apply one pointer event. Returns true if anything visible changed.
    pub fn handle<S: Scene>(&mut self, model: &mut LandmarkModel<S>, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Moved(p) => self.on_move(model, p),
            PointerEvent::Pressed(p) => self.on_press(model, p),
            PointerEvent::Released(p) => self.on_release(model, p),
            PointerEvent::Left => {
                if self.state.is_dragging() {
                    return false;
                }
                self.set_hover(model, None)
            }
        }
    }

    /// Forget any gesture in progress, e.g. after the model was reloaded.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.hovered = None;
    }

    pub fn drag_threshold(&self) -> f64 {
        self.drag_threshold
    }

    pub fn hit_margin(&self) -> f64 {
        self.hit_margin
    }

    /// Point the hover highlight at `target`. An unchanged target is
    /// highlighted again, since a rebuild replaces the items under a resting
    /// pointer with fresh ones.
    fn set_hover<S: Scene>(&mut self, model: &mut LandmarkModel<S>, target: Option<HitTarget>) -> bool {
        if self.hovered == target {
            return target.is_some_and(|t| model.set_hovered(t, true));
        }
        if let Some(old) = self.hovered.take() {
            model.set_hovered(old, false);
        }
        if let Some(new) = target {
            model.set_hovered(new, true);
        }
        self.hovered = target;
        true
    }

    fn on_press<S: Scene>(&mut self, model: &mut LandmarkModel<S>, p: Point) -> bool {
        // A second press can only come from another button or touch point;
        // the gesture in progress ends where it is.
        let committed = if self.state == DragState::Idle {
            false
        } else {
            log::debug!("Press during {:?}, committing it", self.state);
            self.end_gesture(model, p)
        };

        let Some(target) = model.hit_test(p, self.hit_margin) else {
            return committed;
        };
        match target {
            HitTarget::Marker(handle) => {
                if let Some(marker) = model.marker_mut(handle) {
                    marker.press();
                }
            }
            HitTarget::Group(id) => {
                if let Some(group) = model.group_mut(id) {
                    group.set_selected(true);
                }
            }
        }
        self.state = DragState::PotentialDrag { target, start: p };
        true
    }

    fn on_move<S: Scene>(&mut self, model: &mut LandmarkModel<S>, p: Point) -> bool {
        match self.state {
            DragState::Idle => {
                let target = model.hit_test(p, self.hit_margin);
                self.set_hover(model, target)
            }
            DragState::PotentialDrag { target, start } => {
                if p.distance_to(&start) < self.drag_threshold {
                    return false;
                }
                self.begin_drag(model, target, start);
                self.on_move(model, p)
            }
            DragState::DraggingMarker {
                handle,
                grab_offset,
                ..
            } => {
                log::trace!("Dragging marker {:?} to {:?}", handle, p + grab_offset);
                model.set_marker_position(handle, p + grab_offset)
            }
            DragState::DraggingGroup { group, start, last } => {
                let delta = p - last;
                self.state = DragState::DraggingGroup {
                    group,
                    start,
                    last: p,
                };
                model.translate_group(group, delta.x, delta.y)
            }
        }
    }

    fn begin_drag<S: Scene>(&mut self, model: &mut LandmarkModel<S>, target: HitTarget, start: Point) {
        match target {
            HitTarget::Marker(handle) => {
                let Some(marker) = model.marker_mut(handle) else {
                    self.state = DragState::Idle;
                    return;
                };
                marker.begin_drag();
                let origin = marker.position();
                log::debug!("Starting drag of marker {:?}", handle);
                self.state = DragState::DraggingMarker {
                    handle,
                    origin,
                    grab_offset: origin - start,
                };
            }
            HitTarget::Group(group) => {
                log::debug!("Starting drag of group {:?}", group);
                self.state = DragState::DraggingGroup {
                    group,
                    start,
                    last: start,
                };
            }
        }
    }

    fn on_release<S: Scene>(&mut self, model: &mut LandmarkModel<S>, p: Point) -> bool {
        if self.state.is_dragging() {
            self.on_move(model, p);
        }
        self.end_gesture(model, p)
    }

    /// Finish the gesture and hand the highlight to whatever lies under `p`.
    fn end_gesture<S: Scene>(&mut self, model: &mut LandmarkModel<S>, p: Point) -> bool {
        let pressed = match self.state {
            DragState::Idle => None,
            DragState::PotentialDrag { target, .. } => Some(target),
            DragState::DraggingMarker { handle, .. } => Some(HitTarget::Marker(handle)),
            DragState::DraggingGroup { group, .. } => Some(HitTarget::Group(group)),
        };
        let committed = self.finish(model);

        // A marker pressed before any move is highlighted by its own release
        // without the controller tracking it.
        let target = model.hit_test(p, self.hit_margin);
        if let Some(item) = pressed.filter(|&item| Some(item) != target) {
            model.set_hovered(item, false);
        }
        let hover_changed = self.set_hover(model, target);
        committed || hover_changed
    }

    /// End the current gesture at the items' current positions: clear
    /// selection and record the move.
    fn finish<S: Scene>(&mut self, model: &mut LandmarkModel<S>) -> bool {
        match std::mem::take(&mut self.state) {
            DragState::Idle => false,
            DragState::PotentialDrag { target, .. } => {
                Self::release_target(model, target);
                true
            }
            DragState::DraggingMarker { handle, origin, .. } => {
                Self::release_target(model, HitTarget::Marker(handle));
                let Some(to) = model.marker_position(handle) else {
                    return true;
                };
                if to != origin {
                    model.record(Command::MoveMarker {
                        handle,
                        from: origin,
                        to,
                    });
                }
                log::debug!("Dropped marker {:?} at {:?}", handle, to);
                true
            }
            DragState::DraggingGroup { group, start, last } => {
                Self::release_target(model, HitTarget::Group(group));
                let total = last - start;
                if total != Point::ZERO {
                    model.record(Command::MoveGroup {
                        group,
                        dx: total.x,
                        dy: total.y,
                    });
                }
                log::debug!("Dropped group {:?} after moving {:?}", group, total);
                true
            }
        }
    }

    fn release_target<S: Scene>(model: &mut LandmarkModel<S>, target: HitTarget) {
        match target {
            HitTarget::Marker(handle) => {
                if let Some(marker) = model.marker_mut(handle) {
                    marker.release();
                }
            }
            HitTarget::Group(id) => {
                if let Some(group) = model.group_mut(id) {
                    group.set_selected(false);
                }
            }
        }
    }
}
