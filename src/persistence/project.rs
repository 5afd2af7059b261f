use egui::Pos2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::brush::{DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_SIZE};
use crate::stroke::{Stroke, StrokeColor, StrokeRef};

/// One dab as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: String,
}

impl From<&Stroke> for StrokeRecord {
    fn from(stroke: &Stroke) -> Self {
        let position = stroke.position();
        Self {
            x: position.x,
            y: position.y,
            size: stroke.radius(),
            color: stroke.color().as_str().to_owned(),
        }
    }
}

/// The editable payload of a saved project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectJson {
    pub strokes: Vec<StrokeRecord>,
    pub brush_size: f32,
    pub brush_color: String,
    pub image_source: String,
    pub image_width: u32,
    pub image_height: u32,
}

/// Body of a create-project request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub title: String,
    pub project_json: ProjectJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// What the collaborator returns for a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProject {
    pub id: String,
}

/// A stored project as fetched back. `project_json` is kept loosely typed
/// until [`normalise_project`] has filtered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub project_json: Value,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// The in-memory project: what the visualiser saves and hydrates from
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Option<String>,
    pub title: String,
    pub strokes: Vec<StrokeRef>,
    pub brush_size: f32,
    pub brush_color: String,
    pub image_source: Option<String>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub thumbnail_url: Option<String>,
}

impl Project {
    /// An unsaved project with default brush settings and no image
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            strokes: Vec::new(),
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_color: DEFAULT_BRUSH_COLOR.to_owned(),
            image_source: None,
            image_width: None,
            image_height: None,
            thumbnail_url: None,
        }
    }

    pub fn stroke_records(&self) -> Vec<StrokeRecord> {
        self.strokes.iter().map(|s| StrokeRecord::from(s.as_ref())).collect()
    }
}

/// Decode one stored stroke, rejecting anything without all four fields
fn stroke_from_value(value: &Value) -> Option<StrokeRef> {
    let fields = value.as_object()?;
    let x = fields.get("x")?.as_f64()?;
    let y = fields.get("y")?.as_f64()?;
    let size = fields.get("size")?.as_f64()?;
    let color = StrokeColor::new(fields.get("color")?.as_str()?).ok()?;
    Stroke::new_ref(Pos2::new(x as f32, y as f32), size as f32, color).ok()
}

/// Keep the well-formed strokes of a stored list, in their original order
pub fn normalise_strokes(value: Option<&Value>) -> Vec<StrokeRef> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let strokes: Vec<StrokeRef> = entries.iter().filter_map(stroke_from_value).collect();
    if strokes.len() != entries.len() {
        log::warn!(
            "dropped {} malformed stroke records out of {}",
            entries.len() - strokes.len(),
            entries.len()
        );
    }
    strokes
}

fn dimension(payload: &Map<String, Value>, key: &str) -> Option<u32> {
    payload
        .get(key)?
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 1.0)
        .map(|v| v.round().min(f64::from(u32::MAX)) as u32)
}

/// Turn an untrusted stored record into a [`Project`].
///
/// Missing or mistyped fields fall back to defaults; malformed strokes are
/// dropped. Nothing here fails.
pub fn normalise_project(record: ProjectRecord) -> Project {
    let empty = Map::new();
    let payload = record.project_json.as_object().unwrap_or(&empty);

    let brush_size = payload
        .get("brushSize")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map_or(DEFAULT_BRUSH_SIZE, |v| v as f32);
    let brush_color = payload
        .get("brushColor")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_BRUSH_COLOR)
        .to_owned();
    let image_source = payload
        .get("imageSource")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned);

    Project {
        id: Some(record.id),
        title: record.title,
        strokes: normalise_strokes(payload.get("strokes")),
        brush_size,
        brush_color,
        image_source,
        image_width: dimension(payload, "imageWidth"),
        image_height: dimension(payload, "imageHeight"),
        thumbnail_url: record.thumbnail_url,
    }
}
