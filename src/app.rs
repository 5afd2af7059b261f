use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::asset::{self, AssetResult, BaseImage};
use crate::brush::Brush;
use crate::canvas_textures::CanvasTextures;
use crate::compositor::Compositor;
use crate::config::VisualiserConfig;
use crate::notice::Notices;
use crate::panels;
use crate::persistence::{PersistenceAdapter, PersistenceResult, Project};
use crate::session::VisualiserSession;
use crate::shortcuts::Shortcut;
use crate::task::{spawn_task, PendingTask, SaveGate, TaskPoll};

/// What survives a restart: brush settings and recent colours.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub brush: Brush,
}

/// `title.png` with every whitespace run turned into a dash
pub fn export_file_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 4);
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('-');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    name.push_str(".png");
    name
}

pub struct VisualiserApp {
    pub(crate) config: VisualiserConfig,
    pub(crate) session: VisualiserSession,
    pub(crate) compositor: Compositor,
    pub(crate) textures: CanvasTextures,
    pub(crate) base_image: Option<BaseImage>,
    pub(crate) image_task: Option<PendingTask<AssetResult<BaseImage>>>,
    pub(crate) project_task: Option<PendingTask<PersistenceResult<Project>>>,
    /// Resolves to the session generation the save was taken from, and its id
    pub(crate) save_gate: SaveGate<(u64, PersistenceResult<String>)>,
    pub(crate) persistence: Option<PersistenceAdapter>,
    pub(crate) notices: Notices,
    /// Text typed into the "open project" field
    pub(crate) project_id_input: String,
    /// Text typed into the "image path or URL" field
    pub(crate) image_input: String,
}

impl VisualiserApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: VisualiserConfig) -> Self {
        let preferences: Option<Preferences> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY));
        Self::with_preferences(config, preferences)
    }

    /// Build the app without a UI context
    pub fn with_preferences(config: VisualiserConfig, preferences: Option<Preferences>) -> Self {
        let mut session = VisualiserSession::new(&config);
        if let Some(preferences) = preferences {
            session.brush = preferences.brush;
        }
        let compositor = Compositor::new(config.canvas_width, config.canvas_height);
        let mut notices = Notices::new();
        let persistence = match PersistenceAdapter::from_config(&config) {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                log::error!("Project storage unavailable: {}", e);
                notices.error(format!("Saving is unavailable: {}", e));
                None
            }
        };

        let mut app = Self {
            textures: CanvasTextures::new(&compositor),
            compositor,
            session,
            base_image: None,
            image_task: None,
            project_task: None,
            save_gate: SaveGate::new(),
            persistence,
            notices,
            project_id_input: config.project.clone().unwrap_or_default(),
            image_input: String::new(),
            config,
        };

        match app.config.project.clone() {
            Some(id) => app.open_project(id),
            None => {
                if let Some(source) = app.session.image_source().map(str::to_owned) {
                    app.start_image_load(source);
                }
            }
        }
        app
    }

    pub fn session(&self) -> &VisualiserSession {
        &self.session
    }

    pub fn is_saving(&self) -> bool {
        self.save_gate.is_saving()
    }

    pub fn is_loading_image(&self) -> bool {
        self.image_task.is_some()
    }

    pub(crate) fn start_image_load(&mut self, source: String) {
        // a newer request supersedes any load still in flight
        self.image_task = Some(spawn_task("load-room-image", move || {
            asset::load_base_image(&source)
        }));
    }

    /// Switch to a new room image with an empty overlay
    pub(crate) fn select_image(&mut self, source: String) {
        self.session.select_image(source.clone());
        self.base_image = None;
        self.start_image_load(source);
    }

    pub(crate) fn open_project(&mut self, id: String) {
        let id = id.trim().to_owned();
        if id.is_empty() {
            return;
        }
        let Some(persistence) = self.persistence.clone() else {
            self.notices.error("Saving is unavailable, cannot open projects.");
            return;
        };
        log::info!("Opening project {}", id);
        self.project_task = Some(spawn_task("load-project", move || persistence.load(&id)));
    }

    pub(crate) fn start_save(&mut self) {
        let Some(base) = self.base_image.clone() else {
            self.notices.error("Load a room image first.");
            return;
        };
        let Some(persistence) = self.persistence.clone() else {
            self.notices.error("Saving is unavailable.");
            return;
        };
        self.session.end_gesture();
        let project = self.session.to_project();
        let compositor = self.compositor;
        let generation = self.session.generation();
        let started = self.save_gate.begin(|| {
            spawn_task("save-project", move || {
                let frame = compositor.composite(Some(base.pixels()), &project.strokes);
                let thumbnail = match asset::png_data_uri(&frame) {
                    Ok(uri) => Some(uri),
                    Err(e) => {
                        log::warn!("Saving without thumbnail: {}", e);
                        None
                    }
                };
                (generation, persistence.save(&project, thumbnail))
            })
        });
        if let Err(rejected) = started {
            log::debug!("{}", rejected);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn export_png(&mut self) {
        let Some(base) = &self.base_image else {
            self.notices.error("Load a room image first.");
            return;
        };
        let frame = self.compositor.composite(Some(base.pixels()), self.session.strokes());
        let path = self.config.export_dir.join(export_file_name(&self.session.title));
        match frame.save(&path) {
            Ok(()) => {
                log::info!("Exported {}", path.display());
                self.notices.success(format!("Image exported to {}", path.display()));
            }
            Err(e) => self.notices.error(format!("Export failed: {}", e)),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn export_png(&mut self) {
        self.notices.error("Export is not available in the browser build.");
    }

    pub(crate) fn share_link(&self) -> Option<String> {
        match &self.persistence {
            Some(persistence) => self.session.project_id().map(|id| persistence.share_link(id)),
            None => self.session.project_link(),
        }
    }

    fn apply_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Undo => {
                self.session.undo();
            }
            Shortcut::Redo => {
                self.session.redo();
            }
            Shortcut::Clear => self.session.clear(),
            Shortcut::ShrinkBrush => self.session.brush.shrink(),
            Shortcut::GrowBrush => self.session.brush.grow(),
        }
    }

    /// Collect finished background work. Returns true while anything is still running.
    pub(crate) fn poll_tasks(&mut self, ctx: &egui::Context) -> bool {
        if let Some(task) = &mut self.project_task {
            match task.poll() {
                TaskPoll::Pending => {}
                TaskPoll::Ready(Ok(project)) => {
                    self.project_task = None;
                    let source = project.image_source.clone();
                    self.session.hydrate(project);
                    self.base_image = None;
                    if let Some(source) = source.or_else(|| self.session.image_source().map(str::to_owned)) {
                        self.start_image_load(source);
                    }
                }
                TaskPoll::Ready(Err(e)) => {
                    self.project_task = None;
                    self.notices.error(format!("Could not open project: {}", e));
                }
                TaskPoll::Lost => {
                    self.project_task = None;
                    self.notices.error("Could not open project.");
                }
            }
        }

        if let Some(task) = &mut self.image_task {
            match task.poll() {
                TaskPoll::Pending => {}
                TaskPoll::Ready(Ok(base)) => {
                    self.image_task = None;
                    self.session.set_image_size(Some((base.width(), base.height())));
                    self.textures.set_base(ctx, &self.compositor, Some(&base));
                    self.base_image = Some(base);
                }
                TaskPoll::Ready(Err(e)) => {
                    self.image_task = None;
                    log::error!("Room image failed to load: {}", e);
                    self.textures.set_base(ctx, &self.compositor, None);
                    self.notices
                        .error("Could not load that image. Pick a different room or upload your own.");
                }
                TaskPoll::Lost => {
                    self.image_task = None;
                    self.textures.set_base(ctx, &self.compositor, None);
                    self.notices.error("Could not load that image.");
                }
            }
        }

        match self.save_gate.poll() {
            Some(TaskPoll::Ready((generation, Ok(id)))) => {
                if generation == self.session.generation() {
                    self.session.set_project_id(Some(id));
                    self.notices.success("Visual saved. Share the link with your clients.");
                } else {
                    // the canvas moved on to another room while saving
                    log::info!("Saved project {} belongs to a previous canvas", id);
                    self.notices.success("Visual saved.");
                }
            }
            Some(TaskPoll::Ready((_, Err(e)))) => self.notices.error(e.to_string()),
            Some(TaskPoll::Lost) => self.notices.error("Saving failed unexpectedly."),
            Some(TaskPoll::Pending) | None => {}
        }

        self.project_task.is_some() || self.image_task.is_some() || self.save_gate.is_saving()
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.first() else {
            return;
        };
        let name = match &file.path {
            Some(path) => path.display().to_string(),
            None if !file.name.is_empty() => file.name.clone(),
            None => "unknown".to_owned(),
        };
        let bytes = match (&file.bytes, &file.path) {
            (Some(bytes), _) => Ok(bytes.to_vec()),
            #[cfg(not(target_arch = "wasm32"))]
            (None, Some(path)) => std::fs::read(path).map_err(asset::AssetError::from),
            _ => Err(asset::AssetError::NotAnImage(name.clone())),
        };
        let uri = bytes.and_then(|bytes| {
            asset::upload_to_data_uri(&name, &file.mime, file.path.as_deref(), &bytes)
        });
        match uri {
            Ok(uri) => {
                log::info!("Using uploaded image {}", name);
                self.select_image(uri);
            }
            Err(asset::AssetError::NotAnImage(_)) => self.notices.error("Please upload an image file"),
            Err(e) => self.notices.error(format!("Could not read {}: {}", name, e)),
        }
    }
}

impl eframe::App for VisualiserApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let preferences = Preferences {
            brush: self.session.brush.clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &preferences);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let busy = self.poll_tasks(ctx);
        self.handle_dropped_files(ctx);

        if !ctx.wants_keyboard_input() {
            for shortcut in Shortcut::pressed(ctx) {
                self.apply_shortcut(shortcut);
            }
        }

        panels::toolbar(self, ctx);
        panels::side_panel(self, ctx);
        panels::palette(self, ctx);
        panels::canvas_panel(self, ctx);
        panels::notices(self, ctx);

        if busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use egui::Pos2;
    use image::{Rgba, RgbaImage};

    use crate::config::StorageBackend;
    use crate::notice::NoticeKind;
    use crate::persistence::{
        PersistenceError, ProjectRecord, ProjectStore, SaveRequest, SavedProject,
    };

    struct RejectingStore;

    impl ProjectStore for RejectingStore {
        fn save(&self, _id: Option<&str>, _request: &SaveRequest) -> PersistenceResult<SavedProject> {
            Err(PersistenceError::Rejected {
                status: 500,
                message: "database unavailable".to_owned(),
            })
        }

        fn fetch(&self, id: &str) -> PersistenceResult<ProjectRecord> {
            Err(PersistenceError::NotFound(id.to_owned()))
        }
    }

    /// An offline app with a small room already loaded and one drag painted
    fn painted_app() -> VisualiserApp {
        let config = VisualiserConfig {
            storage: StorageBackend::Memory,
            sample_rooms: Vec::new(),
            canvas_width: 64,
            canvas_height: 36,
            ..Default::default()
        };
        let mut app = VisualiserApp::with_preferences(config, None);
        app.session.select_image("room-a.png");
        app.base_image = Some(BaseImage::new(
            "room-a.png",
            RgbaImage::from_pixel(32, 18, Rgba([180, 170, 160, 255])),
        ));
        app.session.begin_gesture(Pos2::new(10.0, 10.0));
        app.session.extend_gesture(Pos2::new(14.0, 10.0));
        app.session.end_gesture();
        app
    }

    fn finish_save(app: &mut VisualiserApp, ctx: &egui::Context) {
        while app.is_saving() {
            app.poll_tasks(ctx);
            std::thread::yield_now();
        }
    }

    #[test]
    fn finished_save_sets_share_link() {
        let ctx = egui::Context::default();
        let mut app = painted_app();
        app.start_save();
        finish_save(&mut app, &ctx);

        let id = app.session().project_id().map(str::to_owned);
        assert!(id.is_some());
        assert_eq!(app.share_link(), id.map(|id| format!("/visualiser/{}", id)));
        assert_eq!(app.notices.latest().map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[test]
    fn save_finishing_after_room_switch_keeps_new_canvas_unlinked() {
        let ctx = egui::Context::default();
        let mut app = painted_app();
        app.start_save();
        app.session.select_image("room-b.png");
        finish_save(&mut app, &ctx);

        assert_eq!(app.session().image_source(), Some("room-b.png"));
        assert_eq!(app.session().project_id(), None);
        assert_eq!(app.share_link(), None);
        assert_eq!(app.notices.latest().map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[test]
    fn share_link_without_storage_is_site_relative() {
        let mut app = painted_app();
        app.persistence = None;
        assert_eq!(app.share_link(), None);
        app.session.set_project_id(Some("abc".to_owned()));
        assert_eq!(app.share_link().as_deref(), Some("/visualiser/abc"));
    }

    #[test]
    fn failed_save_leaves_local_state_alone() {
        let ctx = egui::Context::default();
        let mut app = painted_app();
        app.persistence = Some(PersistenceAdapter::new(Arc::new(RejectingStore)));
        app.session.set_project_id(Some("existing".to_owned()));

        let strokes = app.session().strokes().to_vec();
        let index = app.session().history().index();
        let len = app.session().history().len();

        app.start_save();
        finish_save(&mut app, &ctx);

        assert_eq!(app.session().strokes(), strokes.as_slice());
        assert_eq!(app.session().history().index(), index);
        assert_eq!(app.session().history().len(), len);
        assert_eq!(app.session().project_id(), Some("existing"));
        let notice = app.notices.latest().map(|n| (n.kind, n.message.clone()));
        assert_eq!(
            notice,
            Some((
                NoticeKind::Error,
                "Server rejected the request (500): database unavailable".to_owned()
            ))
        );
    }

    #[test]
    fn export_name_collapses_whitespace() {
        assert_eq!(export_file_name("My Room Refresh"), "My-Room-Refresh.png");
        assert_eq!(export_file_name("Hall \t  way"), "Hall-way.png");
        assert_eq!(export_file_name(" Lounge"), "-Lounge.png");
    }
}
