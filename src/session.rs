use egui::Pos2;

use crate::brush::{Brush, DEFAULT_BRUSH_SIZE};
use crate::config::VisualiserConfig;
use crate::history::History;
use crate::persistence::{share_path, Project};
use crate::stroke::{Stroke, StrokeRef};
use crate::stroke_store::StrokeStore;

/// Whether a paint drag is in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Painting,
}

/// All editing state of one visualiser instance.
///
/// Constructed explicitly by whoever hosts the visualiser and passed where it
/// is needed; nothing here is global.
#[derive(Debug, Clone)]
pub struct VisualiserSession {
    store: StrokeStore,
    history: History,
    gesture: GestureState,
    pub brush: Brush,
    pub title: String,
    image_source: Option<String>,
    image_size: Option<(u32, u32)>,
    project_id: Option<String>,
    pub overlay_visible: bool,
    pub cursor: Option<Pos2>,
    /// Bumped whenever the canvas switches to another room or project
    generation: u64,
}

impl VisualiserSession {
    pub fn new(config: &VisualiserConfig) -> Self {
        Self {
            store: StrokeStore::new(),
            history: History::new(),
            gesture: GestureState::Idle,
            brush: Brush::new(config.default_colour.clone(), DEFAULT_BRUSH_SIZE),
            title: config.default_title.clone(),
            image_source: config.default_room().map(str::to_owned),
            image_size: None,
            project_id: None,
            overlay_visible: true,
            cursor: None,
            generation: 0,
        }
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        self.store.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn is_painting(&self) -> bool {
        self.gesture == GestureState::Painting
    }

    fn dab_at(&mut self, pos: Pos2) {
        let dab = self
            .brush
            .stroke_color()
            .and_then(|color| Stroke::new_ref(pos, self.brush.size(), color));
        match dab {
            Ok(stroke) => self.store.append(stroke),
            Err(e) => log::debug!("dropping dab at {:?}: {}", pos, e),
        }
    }

    /// Pointer down: start a gesture with a dab under the pointer
    pub fn begin_gesture(&mut self, pos: Pos2) {
        if self.is_painting() {
            // a lost pointer-up; close the previous gesture first
            self.end_gesture();
        }
        self.gesture = GestureState::Painting;
        self.dab_at(pos);
    }

    /// Pointer move: add a dab only while painting
    pub fn extend_gesture(&mut self, pos: Pos2) {
        if self.is_painting() {
            self.dab_at(pos);
        }
    }

    /// Pointer up, cancel or leave: commit the whole gesture as one step
    pub fn end_gesture(&mut self) -> bool {
        if !self.is_painting() {
            return false;
        }
        self.gesture = GestureState::Idle;
        self.history.commit(&self.store);
        true
    }

    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        self.history.redo(&mut self.store)
    }

    pub fn clear(&mut self) {
        self.gesture = GestureState::Idle;
        self.history.clear(&mut self.store);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn image_source(&self) -> Option<&str> {
        self.image_source.as_deref()
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    /// Record the natural size of the base image once it has loaded
    pub fn set_image_size(&mut self, size: Option<(u32, u32)>) {
        self.image_size = size;
    }

    /// Switch to a different room photo.
    ///
    /// The overlay starts empty with a fresh history, and the share link no
    /// longer applies.
    pub fn select_image(&mut self, source: impl Into<String>) {
        self.gesture = GestureState::Idle;
        self.image_source = Some(source.into());
        self.image_size = None;
        self.project_id = None;
        self.generation += 1;
        self.history.hydrate(&mut self.store, Vec::new());
    }

    /// Replace the whole session with a loaded project
    pub fn hydrate(&mut self, project: Project) {
        self.gesture = GestureState::Idle;
        self.title = project.title;
        self.brush.set_color(project.brush_color);
        self.brush.set_size(project.brush_size);
        if let Some(source) = project.image_source {
            self.image_source = Some(source);
        }
        self.image_size = project.image_width.zip(project.image_height);
        self.project_id = project.id;
        self.generation += 1;
        self.history.hydrate(&mut self.store, project.strokes);
    }

    /// Identifies which room or project the canvas currently holds
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn set_project_id(&mut self, id: Option<String>) {
        self.project_id = id;
    }

    /// Site-relative share link for the saved project
    pub fn project_link(&self) -> Option<String> {
        self.project_id.as_deref().map(share_path)
    }

    /// Snapshot for saving
    pub fn to_project(&self) -> Project {
        Project {
            id: self.project_id.clone(),
            title: self.title.clone(),
            strokes: self.store.current().to_vec(),
            brush_size: self.brush.size(),
            brush_color: self.brush.color().to_owned(),
            image_source: self.image_source.clone(),
            image_width: self.image_size.map(|(w, _)| w),
            image_height: self.image_size.map(|(_, h)| h),
            thumbnail_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> VisualiserSession {
        VisualiserSession::new(&VisualiserConfig::default())
    }

    #[test]
    fn drag_commits_once() {
        let mut session = session();
        session.begin_gesture(Pos2::new(10.0, 10.0));
        session.extend_gesture(Pos2::new(12.0, 10.0));
        session.extend_gesture(Pos2::new(14.0, 10.0));
        assert_eq!(session.strokes().len(), 3);
        assert_eq!(session.history().len(), 1);

        assert!(session.end_gesture());
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().index(), 1);
        assert!(!session.end_gesture());
    }

    #[test]
    fn moves_without_pointer_down_do_not_paint() {
        let mut session = session();
        session.extend_gesture(Pos2::new(5.0, 5.0));
        assert!(session.strokes().is_empty());
    }

    #[test]
    fn dabs_use_current_brush() {
        let mut session = session();
        session.brush.pick_color("#6BCB77");
        session.brush.set_size(45.0);
        session.begin_gesture(Pos2::new(1.0, 2.0));
        session.end_gesture();

        let stroke = &session.strokes()[0];
        assert_eq!(stroke.color().as_str(), "#6BCB77");
        assert_eq!(stroke.radius(), 45.0);
    }

    #[test]
    fn non_finite_pointer_is_dropped() {
        let mut session = session();
        session.begin_gesture(Pos2::new(f32::NAN, 3.0));
        session.extend_gesture(Pos2::new(3.0, 3.0));
        session.end_gesture();
        assert_eq!(session.strokes().len(), 1);
    }

    #[test]
    fn selecting_image_resets_overlay_and_link() {
        let mut session = session();
        session.set_project_id(Some("abc".to_owned()));
        session.begin_gesture(Pos2::new(1.0, 1.0));
        session.end_gesture();

        session.select_image("data:image/png;base64,AAAA");
        assert!(session.strokes().is_empty());
        assert_eq!(session.history().len(), 1);
        assert!(!session.can_undo());
        assert_eq!(session.project_link(), None);
        assert_ne!(session.generation(), 0);
        assert_eq!(session.image_source(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn to_project_carries_settings() {
        let mut session = session();
        session.title = "Nursery".to_owned();
        session.set_image_size(Some((1600, 900)));
        session.begin_gesture(Pos2::new(1.0, 1.0));
        session.end_gesture();

        let project = session.to_project();
        assert_eq!(project.title, "Nursery");
        assert_eq!(project.strokes.len(), 1);
        assert_eq!(project.image_width, Some(1600));
        assert_eq!(project.image_height, Some(900));
        assert_eq!(project.brush_color, "#EE6C4D");
    }
}
