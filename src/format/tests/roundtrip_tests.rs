//! Round-trip tests through a live model.
//!
//! These tests verify that loading a schema and reading it back preserves
//! topology and (possibly edited) geometry.

use crate::format::{ModelSchema, read_model, write_model};
use crate::model::{GroupId, LandmarkModel, MarkerHandle, Point};

const EPS: f64 = 1e-9;

/// Create a face-like model with several groups.
fn create_face_schema() -> ModelSchema {
    ModelSchema::from_groups([
        (
            "left_eye",
            vec![
                Point::new(120.0, 200.0),
                Point::new(140.0, 190.0),
                Point::new(160.0, 200.0),
                Point::new(140.0, 210.0),
            ],
        ),
        (
            "right_eye",
            vec![
                Point::new(240.0, 200.0),
                Point::new(260.0, 190.0),
                Point::new(280.0, 200.0),
                Point::new(260.0, 210.0),
            ],
        ),
        (
            "nose",
            vec![
                Point::new(200.0, 220.0),
                Point::new(200.0, 260.0),
                Point::new(185.0, 280.0),
                Point::new(215.0, 280.0),
            ],
        ),
        (
            "mouth",
            vec![
                Point::new(160.0, 330.0),
                Point::new(200.0, 320.0),
                Point::new(240.0, 330.0),
            ],
        ),
    ])
}

fn load(schema: ModelSchema) -> LandmarkModel {
    let mut model: LandmarkModel = LandmarkModel::default();
    model.load(schema).expect("Failed to load schema");
    model
}

#[test]
fn test_load_then_to_dict() {
    let schema = create_face_schema();
    let model = load(schema.clone());
    assert!(model.to_dict().approx_eq(&schema, EPS));
    assert_eq!(model.keys(), schema.keys.as_slice());
}

#[test]
fn test_reload_keeps_positions() {
    let mut model = load(create_face_schema());
    model.move_marker(MarkerHandle::new(GroupId(2), 1), Point::new(201.5, 262.25));
    model.move_group(GroupId(3), 0.0, 5.0);
    let positions = model.get_positions();

    let dict = model.to_dict();
    model.load(dict).unwrap();

    let reloaded = model.get_positions();
    assert_eq!(positions.len(), reloaded.len());
    assert!(positions.iter().zip(&reloaded).all(|(a, b)| a.approx_eq(b, EPS)));
    assert!(model.is_consistent());
}

#[test]
fn test_scale_law() {
    let factor = 0.37;
    let schema = create_face_schema();
    let mut model = load(schema.clone());
    model.scale_model(factor);

    let scaled = model.get_positions();
    assert_eq!(scaled.len(), schema.pos.len());
    for (original, now) in schema.pos.iter().zip(&scaled) {
        assert!(original.scaled(factor).approx_eq(now, EPS));
    }
}

#[test]
fn test_scale_then_inverse() {
    let schema = create_face_schema();
    let mut model = load(schema.clone());
    model.scale_model(4.0);
    model.scale_model(0.25);
    assert!(model.to_dict().approx_eq(&schema, EPS));
}

#[test]
fn test_edit_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.json");

    let mut model = load(create_face_schema());
    let corner = MarkerHandle::new(GroupId(3), 2);
    model.move_marker(corner, Point::new(245.0, 335.0));
    write_model(&model.to_dict(), &path).unwrap();

    let mut reopened: LandmarkModel = LandmarkModel::default();
    reopened.load(read_model(&path).unwrap()).unwrap();
    assert_eq!(reopened.marker_position(corner), Some(Point::new(245.0, 335.0)));
    assert!(reopened.to_dict().approx_eq(&model.to_dict(), EPS));
}

#[test]
fn test_topology_reused_with_new_geometry() {
    let schema = create_face_schema();
    let detected: Vec<Point> = schema.pos.iter().map(|p| p.offset(3.0, -2.0)).collect();

    let model = load(schema.with_positions(detected.clone()));
    assert_eq!(model.get_positions(), detected);
    assert_eq!(model.group_by_label("mouth").unwrap().len(), 3);
}
