//! Saving and loading visualiser projects through an external store.

mod project;
mod store;
#[cfg(not(target_arch = "wasm32"))]
mod http;

use std::sync::Arc;

use thiserror::Error;

pub use project::{
    normalise_project, normalise_strokes, Project, ProjectJson, ProjectRecord, SaveRequest,
    SavedProject, StrokeRecord,
};
pub use store::{FileStore, MemoryStore};
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpStore;

use crate::config::{StorageBackend, VisualiserConfig};

/// Errors that can occur while talking to the project store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize project: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access project storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Project {0} not found")]
    NotFound(String),

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Storage backend {0} is not available on this platform")]
    Unsupported(&'static str),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// The "create project" / "get project" collaborator.
pub trait ProjectStore: Send + Sync {
    /// Persist a project. With an `id` the stored value under that id is
    /// overwritten wholesale if the store supports it; otherwise a new id is
    /// issued.
    fn save(&self, id: Option<&str>, request: &SaveRequest) -> PersistenceResult<SavedProject>;

    /// Fetch a previously saved project
    fn fetch(&self, id: &str) -> PersistenceResult<ProjectRecord>;
}

/// Share links are path-style, relative to the site root
pub fn share_path(id: &str) -> String {
    format!("/visualiser/{}", id)
}

pub(crate) fn validate_request(request: &SaveRequest) -> PersistenceResult<()> {
    if request.title.trim().is_empty() {
        return Err(PersistenceError::InvalidProject("title is required".to_owned()));
    }
    Ok(())
}

/// Translates between [`Project`] and whatever store is configured.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn ProjectStore>,
    default_title: String,
    fallback_size: (u32, u32),
    public_base_url: Option<String>,
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("default_title", &self.default_title)
            .field("fallback_size", &self.fallback_size)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        let defaults = VisualiserConfig::default();
        Self {
            store,
            default_title: defaults.default_title,
            fallback_size: (defaults.canvas_width, defaults.canvas_height),
            public_base_url: None,
        }
    }

    /// Build the adapter and its store from configuration
    pub fn from_config(config: &VisualiserConfig) -> PersistenceResult<Self> {
        let store: Arc<dyn ProjectStore> = match config.storage {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(FileStore::new(config.data_dir.clone())),
            #[cfg(not(target_arch = "wasm32"))]
            StorageBackend::Http => Arc::new(HttpStore::new(config.api_url.clone())?),
            #[cfg(target_arch = "wasm32")]
            StorageBackend::Http => return Err(PersistenceError::Unsupported("http")),
        };
        log::info!("Project storage: {:?}", config.storage);
        Ok(Self {
            store,
            default_title: config.default_title.clone(),
            fallback_size: (config.canvas_width, config.canvas_height),
            public_base_url: config.public_base_url.clone(),
        })
    }

    /// Build the wire request for a project.
    ///
    /// A blank title becomes the default title; unknown image dimensions fall
    /// back to the canvas size.
    pub fn request_for(
        &self,
        project: &Project,
        thumbnail_url: Option<String>,
    ) -> PersistenceResult<SaveRequest> {
        let image_source = project
            .image_source
            .clone()
            .ok_or_else(|| PersistenceError::InvalidProject("Load a room image first.".to_owned()))?;
        let title = match project.title.trim() {
            "" => self.default_title.clone(),
            trimmed => trimmed.to_owned(),
        };
        Ok(SaveRequest {
            title,
            project_json: ProjectJson {
                strokes: project.stroke_records(),
                brush_size: project.brush_size,
                brush_color: project.brush_color.clone(),
                image_source,
                image_width: project.image_width.unwrap_or(self.fallback_size.0),
                image_height: project.image_height.unwrap_or(self.fallback_size.1),
            },
            thumbnail_url,
        })
    }

    /// Save a project and return the id to share it under
    pub fn save(&self, project: &Project, thumbnail_url: Option<String>) -> PersistenceResult<String> {
        let request = self.request_for(project, thumbnail_url)?;
        let saved = self.store.save(project.id.as_deref(), &request)?;
        log::info!(
            "Saved project {:?} as {} ({} strokes)",
            request.title,
            saved.id,
            request.project_json.strokes.len()
        );
        Ok(saved.id)
    }

    /// Load a project, dropping malformed strokes and defaulting missing fields
    pub fn load(&self, id: &str) -> PersistenceResult<Project> {
        let record = self.store.fetch(id)?;
        let project = normalise_project(record);
        log::info!("Loaded project {} ({} strokes)", id, project.strokes.len());
        Ok(project)
    }

    /// Absolute share link when a public base URL is configured
    pub fn share_link(&self, id: &str) -> String {
        let path = share_path(id);
        match &self.public_base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => path,
        }
    }
}
