use std::sync::Arc;

use egui::Pos2;
use room_visualiser::persistence::{FileStore, MemoryStore, PersistenceError, ProjectRecord};
use room_visualiser::{PersistenceAdapter, Project, ProjectStore, Stroke, StrokeColor};
use serde_json::json;

fn project_with(count: usize) -> Project {
    let palette = ["#EE6C4D", "#2A7ABF", "#6BCB77", "#FFD93D"];
    let mut project = Project::new("Living room");
    project.image_source = Some("https://example.com/room.jpg".to_owned());
    project.image_width = Some(1600);
    project.image_height = Some(900);
    project.brush_size = 45.0;
    project.brush_color = "#2A7ABF".to_owned();
    project.strokes = (0..count)
        .map(|i| {
            let color = StrokeColor::new(palette[i % palette.len()]).unwrap();
            let pos = Pos2::new((i % 960) as f32, (i / 960) as f32 + 0.5);
            Stroke::new_ref(pos, 5.0 + (i % 16) as f32 * 5.0, color).unwrap()
        })
        .collect();
    project
}

fn assert_round_trip(adapter: &PersistenceAdapter, count: usize) {
    let project = project_with(count);
    let id = adapter.save(&project, None).unwrap();
    let loaded = adapter.load(&id).unwrap();

    assert_eq!(loaded.id.as_deref(), Some(id.as_str()));
    assert_eq!(loaded.title, project.title);
    assert_eq!(loaded.strokes, project.strokes);
    assert_eq!(loaded.brush_size, project.brush_size);
    assert_eq!(loaded.brush_color, project.brush_color);
    assert_eq!(loaded.image_source, project.image_source);
    assert_eq!(loaded.image_width, Some(1600));
    assert_eq!(loaded.image_height, Some(900));
}

#[test]
fn memory_store_round_trips() {
    let adapter = PersistenceAdapter::new(Arc::new(MemoryStore::new()));
    for count in [0, 1, 1000] {
        assert_round_trip(&adapter, count);
    }
}

#[test]
fn file_store_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = PersistenceAdapter::new(Arc::new(FileStore::new(dir.path())));
    for count in [0, 1, 1000] {
        assert_round_trip(&adapter, count);
    }
}

#[test]
fn resaving_with_an_id_overwrites() {
    let store = Arc::new(MemoryStore::new());
    let adapter = PersistenceAdapter::new(store.clone());
    let mut project = project_with(2);
    let id = adapter.save(&project, None).unwrap();

    project.id = Some(id.clone());
    project.strokes.truncate(1);
    assert_eq!(adapter.save(&project, None).unwrap(), id);
    assert_eq!(store.len(), 1);
    assert_eq!(adapter.load(&id).unwrap().strokes.len(), 1);
}

#[test]
fn malformed_strokes_are_dropped_in_order() {
    let store = Arc::new(MemoryStore::new());
    store.insert_raw(ProjectRecord {
        id: "legacy".to_owned(),
        title: "Old save".to_owned(),
        project_json: json!({
            "strokes": [
                {"x": 1, "y": 1, "size": 10, "color": "#111111"},
                {"x": 2, "y": 2, "size": 10},
                {"x": 3, "y": 3, "size": 10, "color": "#333333"},
                {"x": "4", "y": 4, "size": 10, "color": "#444444"},
            ],
            "imageSource": "https://example.com/room.jpg",
        }),
        thumbnail_url: None,
    });
    let adapter = PersistenceAdapter::new(store);
    let project = adapter.load("legacy").unwrap();

    let colors: Vec<&str> = project.strokes.iter().map(|s| s.color().as_str()).collect();
    assert_eq!(colors, ["#111111", "#333333"]);
    assert_eq!(project.brush_size, 30.0);
    assert_eq!(project.brush_color, "#EE6C4D");
    assert_eq!(project.image_width, None);
}

#[test]
fn saving_without_image_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let adapter = PersistenceAdapter::new(store.clone());
    let err = adapter.save(&Project::new("Empty"), None).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidProject(_)));
    assert!(store.is_empty());
}

#[test]
fn blank_title_uses_default() {
    let adapter = PersistenceAdapter::new(Arc::new(MemoryStore::new()));
    let mut project = project_with(0);
    project.title = "   ".to_owned();
    let id = adapter.save(&project, None).unwrap();
    assert_eq!(adapter.load(&id).unwrap().title, "My Room Refresh");
}

#[test]
fn unknown_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    assert!(matches!(store.fetch("missing"), Err(PersistenceError::NotFound(_))));
    assert!(matches!(store.fetch("../escape"), Err(PersistenceError::NotFound(_))));
}
