//! The landmark model: every group of a face, loaded from and saved to a
//! [`ModelSchema`].
//!
//! Markers are the source of truth for positions. The `pos` array a model
//! was loaded from goes stale as soon as a marker is dragged, so positions
//! are always read back from the live markers.

use std::collections::BTreeMap;

use crate::format::{FormatError, ModelSchema};
use crate::model::group::LandmarkGroup;
use crate::model::interaction::HitTarget;
use crate::model::marker::{GroupId, Marker, MarkerHandle};
use crate::model::point::Point;
use crate::scene::{LabelerScene, Scene, SceneItem};
use crate::undo::{Command, UndoStack};

/// All landmark groups of one face, together with the scene they live in.
#[derive(Debug)]
pub struct LandmarkModel<S: Scene = LabelerScene> {
    scene: S,
    groups: Vec<LandmarkGroup>,
    index: BTreeMap<String, Vec<usize>>,
    keys: Vec<String>,
    history: UndoStack,
}

impl Default for LandmarkModel<LabelerScene> {
    fn default() -> Self {
        Self::new(LabelerScene::new())
    }
}

impl<S: Scene> LandmarkModel<S> {
    /// Create an empty model attached to `scene`.
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            groups: Vec::new(),
            index: BTreeMap::new(),
            keys: Vec::new(),
            history: UndoStack::new(),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn groups(&self) -> &[LandmarkGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&LandmarkGroup> {
        self.groups.iter().find(|g| g.id() == id)
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> Option<&mut LandmarkGroup> {
        self.groups.iter_mut().find(|g| g.id() == id)
    }

    pub fn group_by_label(&self, label: &str) -> Option<&LandmarkGroup> {
        let position = self.keys.iter().position(|k| k == label)?;
        self.groups.get(position)
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.group(handle.group)?.marker(handle.index)
    }

    pub(crate) fn marker_mut(&mut self, handle: MarkerHandle) -> Option<&mut Marker> {
        self.group_mut(handle.group)?.marker_mut(handle.index)
    }

    /// Group labels in creation order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn point_count(&self) -> usize {
        self.groups.iter().map(LandmarkGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub(crate) fn record(&mut self, command: Command) {
        self.history.push(command);
    }

    // ------------------------------------------------------------------------
    // Load / save
    // ------------------------------------------------------------------------

    /// Replace the model with the one described by `schema`.
    ///
    /// The schema is validated before anything is torn down, so a malformed
    /// schema leaves the current model untouched. Loading starts a fresh
    /// edit history.
    pub fn load(&mut self, schema: ModelSchema) -> Result<(), FormatError> {
        if let Err(e) = schema.validate() {
            log::warn!("Rejected model: {}", e);
            return Err(e);
        }
        self.rebuild(schema);
        self.history.clear();
        log::info!(
            "Loaded model with {} groups and {} points",
            self.groups.len(),
            self.point_count()
        );
        Ok(())
    }

    /// Rebuild every group from an already validated schema.
    fn rebuild(&mut self, schema: ModelSchema) {
        self.teardown();
        for key in &schema.keys {
            self.add_group(schema.group_points(key), Some(key.clone()));
        }
        self.index = schema.index;
        self.keys = schema.keys;
    }

    fn add_group(&mut self, pts: Vec<Point>, label: Option<String>) -> GroupId {
        let id = GroupId(self.groups.len());
        let mut group = LandmarkGroup::new(id, label);
        self.scene.add_item(SceneItem::Group(id));
        group.add_points(&mut self.scene, pts);
        self.groups.push(group);
        id
    }

    /// Remove every group and its markers from the scene.
    pub fn delete_model(&mut self) {
        self.teardown();
        self.history.clear();
    }

    fn teardown(&mut self) {
        while !self.groups.is_empty() {
            let mut group = self.groups.remove(0);
            group.delete_markers(&mut self.scene);
            self.scene.remove_item(SceneItem::Group(group.id()));
        }
        self.index.clear();
        self.keys.clear();
    }

    /// Current marker positions, group by group, in point order.
    pub fn get_positions(&self) -> Vec<Point> {
        self.groups
            .iter()
            .flat_map(LandmarkGroup::marker_positions)
            .collect()
    }

    /// Log every position (the "Print Positions" action).
    pub fn print_positions(&self) {
        let positions: Vec<[f64; 2]> = self.get_positions().into_iter().map(Into::into).collect();
        log::info!("Positions: {:?}", positions);
    }

    /// Snapshot the model as a schema with the loaded topology and the live
    /// marker positions.
    ///
    /// Each marker is written to the slot its group's index names, so the
    /// result reloads to the same geometry even when the index is not laid
    /// out consecutively.
    pub fn to_dict(&self) -> ModelSchema {
        let mut pos = vec![Point::ZERO; self.point_count()];
        for (key, group) in self.keys.iter().zip(&self.groups) {
            let Some(offsets) = self.index.get(key) else {
                continue;
            };
            for (&slot, marker) in offsets.iter().zip(group.markers()) {
                if let Some(p) = pos.get_mut(slot) {
                    *p = marker.position();
                }
            }
        }
        ModelSchema {
            index: self.index.clone(),
            keys: self.keys.clone(),
            pos,
        }
    }

    // ------------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------------

    pub fn select_model(&mut self) {
        for group in &mut self.groups {
            group.set_selected(true);
        }
    }

    pub fn deselect_model(&mut self) {
        for group in &mut self.groups {
            group.set_selected(false);
        }
    }

    /// Multiply every coordinate by `factor` and reload with the same
    /// topology. Returns false, leaving the model as it was, if the factor
    /// or any scaled coordinate is not finite.
    pub fn scale_model(&mut self, factor: f64) -> bool {
        if !factor.is_finite() {
            log::warn!("Ignoring non-finite scale factor {}", factor);
            return false;
        }
        let before = self.to_dict();
        let after = before.scaled(factor);
        if !after.pos.iter().all(Point::is_finite) {
            log::warn!("Scale factor {} overflows the model coordinates", factor);
            return false;
        }
        self.rebuild(after.clone());
        log::info!("Scaled model by {}", factor);
        self.history.push(Command::Restore {
            description: format!("Scale by {}", factor),
            before,
            after,
        });
        true
    }

    // ------------------------------------------------------------------------
    // Point edits
    // ------------------------------------------------------------------------

    pub fn marker_position(&self, handle: MarkerHandle) -> Option<Point> {
        self.marker(handle).map(Marker::position)
    }

    /// Move a marker without recording history (live drag updates).
    pub fn set_marker_position(&mut self, handle: MarkerHandle, p: Point) -> bool {
        match self.group_mut(handle.group) {
            Some(group) => group.set_marker_position(handle.index, p),
            None => false,
        }
    }

    /// Move a marker as a single undoable edit.
    pub fn move_marker(&mut self, handle: MarkerHandle, p: Point) -> bool {
        let Some(from) = self.marker_position(handle) else {
            return false;
        };
        self.set_marker_position(handle, p);
        self.history.push(Command::MoveMarker { handle, from, to: p });
        true
    }

    /// Move a whole group without recording history (live drag updates).
    pub fn translate_group(&mut self, id: GroupId, dx: f64, dy: f64) -> bool {
        match self.group_mut(id) {
            Some(group) => {
                group.translate(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Move a whole group as a single undoable edit.
    pub fn move_group(&mut self, id: GroupId, dx: f64, dy: f64) -> bool {
        if !self.translate_group(id, dx, dy) {
            return false;
        }
        self.history.push(Command::MoveGroup { group: id, dx, dy });
        true
    }

    /// Append a point to the group labelled `label`. The new point takes the
    /// next free slot of the position array.
    pub fn append_point(&mut self, label: &str, p: Point) -> Option<MarkerHandle> {
        let position = self.keys.iter().position(|k| k == label)?;
        let before = self.to_dict();
        let slot = self.point_count();
        self.index.get_mut(label)?.push(slot);

        let group = self.groups.get_mut(position)?;
        group.add_point(&mut self.scene, p);
        let handle = MarkerHandle::new(group.id(), group.len() - 1);

        self.history.push(Command::Restore {
            description: format!("Add point to '{}'", label),
            before,
            after: self.to_dict(),
        });
        Some(handle)
    }

    /// Remove a marker and its point, closing the gap in the position array.
    pub fn remove_marker(&mut self, handle: MarkerHandle) -> Option<Point> {
        let position = self.groups.iter().position(|g| g.id() == handle.group)?;
        if handle.index >= self.groups[position].len() {
            return None;
        }
        let before = self.to_dict();
        let key = self.keys.get(position)?.clone();

        let slot = self.index.get_mut(&key)?.remove(handle.index);
        for offsets in self.index.values_mut() {
            for offset in offsets.iter_mut().filter(|o| **o > slot) {
                *offset -= 1;
            }
        }
        let removed = self.groups[position].remove_point(&mut self.scene, handle.index)?;

        self.history.push(Command::Restore {
            description: format!("Remove point from '{}'", key),
            before,
            after: self.to_dict(),
        });
        Some(removed)
    }

    // ------------------------------------------------------------------------
    // Hit testing and hover
    // ------------------------------------------------------------------------

    /// Topmost item under `p`: markers above outlines, later groups above
    /// earlier ones.
    pub fn hit_test(&self, p: Point, margin: f64) -> Option<HitTarget> {
        self.groups
            .iter()
            .rev()
            .find_map(|g| g.marker_at(p, margin))
            .map(HitTarget::Marker)
            .or_else(|| {
                self.groups
                    .iter()
                    .rev()
                    .find(|g| g.contains(p, margin))
                    .map(|g| HitTarget::Group(g.id()))
            })
    }

    /// Set the hover highlight of `target`. Returns true if it changed.
    pub(crate) fn set_hovered(&mut self, target: HitTarget, hovered: bool) -> bool {
        match target {
            HitTarget::Marker(handle) => {
                let Some(marker) = self.marker_mut(handle) else {
                    return false;
                };
                let before = marker.state();
                if hovered {
                    marker.hover_enter();
                } else {
                    marker.hover_leave();
                }
                marker.state() != before
            }
            HitTarget::Group(id) => {
                let Some(group) = self.group_mut(id) else {
                    return false;
                };
                let changed = group.is_hovered() != hovered;
                group.set_hovered(hovered);
                changed
            }
        }
    }

    // ------------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------------

    /// Undo the most recent edit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(cmd) = self.history.pop_undo() else {
            return false;
        };
        self.apply(&cmd.inverse());
        true
    }

    /// Redo the most recently undone edit.
    pub fn redo(&mut self) -> bool {
        let Some(cmd) = self.history.pop_redo() else {
            return false;
        };
        self.apply(&cmd);
        true
    }

    fn apply(&mut self, cmd: &Command) {
        match cmd {
            Command::MoveMarker { handle, to, .. } => {
                if !self.set_marker_position(*handle, *to) {
                    log::warn!("Marker {:?} no longer exists", handle);
                }
            }
            Command::MoveGroup { group, dx, dy } => {
                if !self.translate_group(*group, *dx, *dy) {
                    log::warn!("Group {:?} no longer exists", group);
                }
            }
            Command::Restore { after, .. } => self.rebuild(after.clone()),
        }
    }

    /// Check every structural invariant of the model.
    pub fn is_consistent(&self) -> bool {
        self.groups.len() == self.keys.len()
            && self.groups.iter().zip(&self.keys).all(|(group, key)| {
                group.is_consistent()
                    && group.label() == Some(key.as_str())
                    && self.index.get(key).map(Vec::len) == Some(group.len())
            })
            && self.index.values().map(Vec::len).sum::<usize>() == self.point_count()
    }
}
