//! Landmark groups: ordered points with their markers and outline.

use crate::constants::{GROUP_Z_VALUE, colors};
use crate::model::marker::{GroupId, Marker, MarkerHandle};
use crate::model::point::{Point, Rect};
use crate::scene::{Scene, SceneItem};

/// Open polyline through a group's points, in group-local coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    vertices: Vec<Point>,
}

impl Outline {
    pub fn from_points(points: &[Point]) -> Self {
        Self {
            vertices: points.to_vec(),
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Consecutive vertex pairs. The last vertex is not joined to the first.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::bounding(&self.vertices)
    }

    /// Whether `local` lies within the outline stroked `margin` wide.
    pub fn hit(&self, local: Point, margin: f64) -> bool {
        let half_pen = margin / 2.0;
        match self.vertices.as_slice() {
            [] => false,
            [only] => local.distance_to(only) <= half_pen,
            _ => self
                .segments()
                .any(|(a, b)| local.distance_to_segment(&a, &b) <= half_pen),
        }
    }
}

/// A named region of landmarks (e.g. `left_eye`).
///
/// `points` holds group-local coordinates, markers hold scene coordinates;
/// the two are related by the group's scene offset. `markers[i]` always
/// carries index `i`.
#[derive(Debug, Clone)]
pub struct LandmarkGroup {
    id: GroupId,
    label: Option<String>,
    pos: Point,
    points: Vec<Point>,
    markers: Vec<Marker>,
    outline: Outline,
    hovered: bool,
    selected: bool,
}

impl LandmarkGroup {
    pub fn new(id: GroupId, label: Option<String>) -> Self {
        Self {
            id,
            label,
            pos: Point::ZERO,
            points: Vec::new(),
            markers: Vec::new(),
            outline: Outline::default(),
            hovered: false,
            selected: false,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Label, shown as the group's tooltip.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Scene offset of the group.
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Points in group-local coordinates.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub(crate) fn marker_mut(&mut self, index: usize) -> Option<&mut Marker> {
        self.markers.get_mut(index)
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn map_to_scene(&self, local: Point) -> Point {
        local + self.pos
    }

    pub fn map_from_scene(&self, scene: Point) -> Point {
        scene - self.pos
    }

    /// Marker positions in scene coordinates, in point order.
    pub fn marker_positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.markers.iter().map(Marker::position)
    }

    fn set_path(&mut self) {
        self.outline = Outline::from_points(&self.points);
    }

    /// Append a point (scene coordinates) and attach a marker for it.
    pub fn add_point<S: Scene + ?Sized>(&mut self, scene: &mut S, p: Point) {
        self.points.push(self.map_from_scene(p));
        self.set_path();

        let index = self.points.len() - 1;
        let marker = Marker::new(self.id, index);
        scene.add_item(SceneItem::Marker(marker.handle()));
        self.markers.push(marker);
        self.set_marker_position(index, p);
    }

    pub fn add_points<S, I>(&mut self, scene: &mut S, pts: I)
    where
        S: Scene + ?Sized,
        I: IntoIterator<Item = Point>,
    {
        for p in pts {
            self.add_point(scene, p);
        }
    }

    /// Update point `index` from a marker's new scene position.
    ///
    /// Out-of-range indices are ignored; markers only ever report their own
    /// slot.
    pub fn move_point(&mut self, index: usize, p: Point) {
        if index >= self.points.len() {
            log::warn!(
                "Ignoring move of point {} in group {:?} with {} points",
                index,
                self.label,
                self.points.len()
            );
            return;
        }
        self.points[index] = self.map_from_scene(p);
        self.set_path();
    }

    /// Move marker `index` to `p` (scene coordinates), keeping the point
    /// list and outline in sync. Returns false if there is no such marker.
    pub fn set_marker_position(&mut self, index: usize, p: Point) -> bool {
        let Some(marker) = self.markers.get_mut(index) else {
            return false;
        };
        let moved = marker.set_position(p);
        self.move_point(moved.index, moved.position);
        true
    }

    /// Move the whole group. Markers are carried along; local points and the
    /// outline are unchanged.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.set_pos(self.pos.offset(dx, dy));
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
        for i in 0..self.points.len() {
            let scene_point = self.map_to_scene(self.points[i]);
            if let Some(marker) = self.markers.get_mut(i) {
                marker.place(scene_point);
            }
        }
    }

    /// Remove point `index` and its marker, renumbering the markers after it.
    pub fn remove_point<S: Scene + ?Sized>(&mut self, scene: &mut S, index: usize) -> Option<Point> {
        if index >= self.points.len() {
            return None;
        }
        for marker in &self.markers[index..] {
            scene.remove_item(SceneItem::Marker(marker.handle()));
        }

        let removed = self.markers.remove(index).position();
        self.points.remove(index);
        for (i, marker) in self.markers.iter_mut().enumerate().skip(index) {
            marker.reindex(i);
            scene.add_item(SceneItem::Marker(marker.handle()));
        }
        self.set_path();
        Some(removed)
    }

    /// Detach every marker from the scene, in order, and clear the points.
    pub fn delete_markers<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        for marker in self.markers.drain(..) {
            scene.remove_item(SceneItem::Marker(marker.handle()));
        }
        self.points.clear();
        self.set_path();
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Outline pen for the current hover state.
    pub fn pen(&self) -> colors::Rgba {
        if self.hovered {
            colors::RED
        } else {
            colors::GREEN
        }
    }

    pub fn z_value(&self) -> i32 {
        GROUP_Z_VALUE
    }

    /// Hit test of the outline against a scene-space point.
    pub fn contains(&self, scene_point: Point, margin: f64) -> bool {
        self.outline.hit(self.map_from_scene(scene_point), margin)
    }

    /// Hit test of the markers, topmost (last added) first.
    pub fn marker_at(&self, scene_point: Point, margin: f64) -> Option<MarkerHandle> {
        self.markers
            .iter()
            .rev()
            .find(|m| m.contains(scene_point, margin))
            .map(Marker::handle)
    }

    /// Check the point/marker pairing.
    pub fn is_consistent(&self) -> bool {
        self.points.len() == self.markers.len()
            && self.markers.iter().enumerate().all(|(i, m)| {
                m.index() == i
                    && m.handle().group == self.id
                    && self.map_to_scene(self.points[i]).approx_eq(&m.position(), 1e-9)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HIT_MARGIN;
    use crate::scene::LabelerScene;

    fn eye(scene: &mut LabelerScene) -> LandmarkGroup {
        let mut group = LandmarkGroup::new(GroupId(0), Some("eye".to_string()));
        group.add_points(
            scene,
            [
                Point::new(10.0, 20.0),
                Point::new(20.0, 30.0),
                Point::new(30.0, 40.0),
            ],
        );
        group
    }

    #[test]
    fn test_add_point_attaches_marker() {
        let mut scene = LabelerScene::new();
        let group = eye(&mut scene);

        assert_eq!(group.len(), 3);
        assert_eq!(group.markers().len(), 3);
        assert!(group.is_consistent());
        assert_eq!(group.outline().vertices(), group.points());
        assert_eq!(group.marker(1).unwrap().position(), Point::new(20.0, 30.0));
        assert!(scene.contains_item(&SceneItem::Marker(MarkerHandle::new(GroupId(0), 2))));
    }

    #[test]
    fn test_set_marker_position_updates_outline() {
        let mut scene = LabelerScene::new();
        let mut group = eye(&mut scene);

        assert!(group.set_marker_position(1, Point::new(25.0, 35.0)));
        assert_eq!(group.points()[1], Point::new(25.0, 35.0));
        assert_eq!(group.outline().vertices()[1], Point::new(25.0, 35.0));
        assert!(group.is_consistent());

        assert!(!group.set_marker_position(7, Point::ZERO));
    }

    #[test]
    fn test_outline_is_open() {
        let mut scene = LabelerScene::new();
        let mut group = LandmarkGroup::new(GroupId(0), None);
        group.add_points(
            &mut scene,
            [
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 20.0),
            ],
        );
        assert_eq!(group.outline().segments().count(), 2);
        // Midpoint of the would-be closing edge is not on the outline.
        assert!(!group.contains(Point::new(10.0, 10.0), HIT_MARGIN));
        assert!(group.contains(Point::new(10.0, 3.0), HIT_MARGIN));
    }

    #[test]
    fn test_translate_carries_markers() {
        let mut scene = LabelerScene::new();
        let mut group = eye(&mut scene);

        group.translate(5.0, -5.0);
        assert_eq!(group.points()[0], Point::new(10.0, 20.0));
        assert_eq!(group.marker(0).unwrap().position(), Point::new(15.0, 15.0));
        assert!(group.is_consistent());

        // Dragging a marker after a group move stores local coordinates.
        group.set_marker_position(2, Point::new(40.0, 40.0));
        assert_eq!(group.points()[2], Point::new(35.0, 45.0));
        assert!(group.is_consistent());
    }

    #[test]
    fn test_remove_point_reindexes() {
        let mut scene = LabelerScene::new();
        let mut group = eye(&mut scene);

        let removed = group.remove_point(&mut scene, 0);
        assert_eq!(removed, Some(Point::new(10.0, 20.0)));
        assert_eq!(group.len(), 2);
        assert!(group.is_consistent());
        assert_eq!(group.marker(0).unwrap().position(), Point::new(20.0, 30.0));
        assert!(group.marker(0).unwrap().is_origin());
        assert_eq!(scene.marker_count(), 2);
        assert!(!scene.contains_item(&SceneItem::Marker(MarkerHandle::new(GroupId(0), 2))));

        assert_eq!(group.remove_point(&mut scene, 5), None);
    }

    #[test]
    fn test_delete_markers_detaches_everything() {
        let mut scene = LabelerScene::new();
        let mut group = eye(&mut scene);

        group.delete_markers(&mut scene);
        assert!(group.is_empty());
        assert!(group.markers().is_empty());
        assert!(group.outline().is_empty());
        assert_eq!(scene.marker_count(), 0);
    }

    #[test]
    fn test_hover_pen() {
        let mut group = LandmarkGroup::new(GroupId(0), None);
        assert_eq!(group.pen(), colors::GREEN);
        group.set_hovered(true);
        assert_eq!(group.pen(), colors::RED);
    }

    #[test]
    fn test_marker_at_prefers_topmost() {
        let mut scene = LabelerScene::new();
        let mut group = LandmarkGroup::new(GroupId(3), None);
        group.add_points(&mut scene, [Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);

        assert_eq!(
            group.marker_at(Point::new(1.0, 0.0), HIT_MARGIN),
            Some(MarkerHandle::new(GroupId(3), 1))
        );
        assert_eq!(group.marker_at(Point::new(50.0, 50.0), HIT_MARGIN), None);
    }
}
