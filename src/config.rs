use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::brush::DEFAULT_BRUSH_COLOR;
use crate::compositor::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};

pub const DEFAULT_TITLE: &str = "My Room Refresh";
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

pub const SAMPLE_ROOMS: [&str; 6] = [
    "https://images.unsplash.com/photo-1616486338812-3dadae4b4ace?w=960&h=540&fit=crop",
    "https://images.unsplash.com/photo-1616594039964-ae9021a400a0?w=960&h=540&fit=crop",
    "https://images.unsplash.com/photo-1556912173-46c336c7fd55?w=960&h=540&fit=crop",
    "https://images.unsplash.com/photo-1600210492486-724fe5c67fb0?w=960&h=540&fit=crop",
    "https://images.unsplash.com/photo-1598928506311-c55ded91a20c?w=960&h=540&fit=crop",
    "https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=960&h=540&fit=crop",
];

/// Where saved projects go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
    Http,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "file" => Some(Self::File),
            "http" => Some(Self::Http),
            _ => None,
        }
    }
}

/// Visualiser settings. Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualiserConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub default_colour: String,
    pub default_title: String,
    pub sample_rooms: Vec<String>,
    pub storage: StorageBackend,
    pub api_url: String,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub public_base_url: Option<String>,
    /// Project to open on start-up
    pub project: Option<String>,
}

impl Default for VisualiserConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            default_colour: DEFAULT_BRUSH_COLOR.to_owned(),
            default_title: DEFAULT_TITLE.to_owned(),
            sample_rooms: SAMPLE_ROOMS.iter().map(|s| (*s).to_owned()).collect(),
            storage: StorageBackend::default(),
            api_url: DEFAULT_API_URL.to_owned(),
            data_dir: PathBuf::from("visualiser-projects"),
            export_dir: PathBuf::from("."),
            public_base_url: None,
            project: None,
        }
    }
}

impl VisualiserConfig {
    /// Defaults overridden by `VISUALISER_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unknown or blank values are ignored
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get("VISUALISER_STORAGE") {
            match StorageBackend::parse(&value) {
                Some(storage) => self.storage = storage,
                None => log::warn!("Ignoring unknown VISUALISER_STORAGE value {:?}", value),
            }
        }
        if let Some(url) = get("VISUALISER_API_URL") {
            self.api_url = url;
        }
        if let Some(dir) = get("VISUALISER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("VISUALISER_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        if let Some(url) = get("VISUALISER_PUBLIC_URL") {
            self.public_base_url = Some(url);
        }
        if let Some(project) = get("VISUALISER_PROJECT") {
            self.project = Some(project);
        }
        self
    }

    /// The image a fresh session starts with
    pub fn default_room(&self) -> Option<&str> {
        self.sample_rooms.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_visualiser_canvas() {
        let config = VisualiserConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (960, 540));
        assert_eq!(config.default_title, "My Room Refresh");
        assert_eq!(config.sample_rooms.len(), 6);
        assert_eq!(config.default_room(), Some(SAMPLE_ROOMS[0]));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("VISUALISER_STORAGE", "HTTP"),
            ("VISUALISER_API_URL", "https://paint.example.com/api"),
            ("VISUALISER_PROJECT", "p-42"),
            ("VISUALISER_DATA_DIR", "  "),
        ]
        .into_iter()
        .collect();
        let config = VisualiserConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| (*v).to_owned()));

        assert_eq!(config.storage, StorageBackend::Http);
        assert_eq!(config.api_url, "https://paint.example.com/api");
        assert_eq!(config.project.as_deref(), Some("p-42"));
        assert_eq!(config.data_dir, PathBuf::from("visualiser-projects"));
    }

    #[test]
    fn unknown_storage_keeps_default() {
        let config = VisualiserConfig::default()
            .with_overrides(|key| (key == "VISUALISER_STORAGE").then(|| "s3".to_owned()));
        assert_eq!(config.storage, StorageBackend::File);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: VisualiserConfig =
            serde_json::from_str(r#"{ "storage": "memory", "canvas_width": 480 }"#).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.canvas_width, 480);
        assert_eq!(config.canvas_height, 540);
    }
}
