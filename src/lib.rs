#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod asset;
pub mod brush;
pub mod canvas_textures;
pub mod compositor;
pub mod components;
pub mod config;
pub mod history;
pub mod notice;
pub mod panels;
pub mod persistence;
pub mod session;
pub mod shortcuts;
pub mod stroke;
pub mod stroke_store;
pub mod task;
pub mod util;

pub use app::VisualiserApp;
pub use brush::Brush;
pub use compositor::Compositor;
pub use config::VisualiserConfig;
pub use history::History;
pub use persistence::{PersistenceAdapter, Project, ProjectStore};
pub use session::VisualiserSession;
pub use stroke::{Stroke, StrokeColor, StrokeRef};
pub use stroke_store::StrokeStore;
