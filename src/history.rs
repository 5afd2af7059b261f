use crate::stroke::StrokeRef;
use crate::stroke_store::StrokeStore;

/// Linear undo/redo over full snapshots of the stroke log.
///
/// Entry 0 is the state the session started from (empty or hydrated) and is
/// never dropped. The log rendered in the [`StrokeStore`] always equals the
/// entry under the cursor once a gesture has been committed.
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots, oldest first
    entries: Vec<Vec<StrokeRef>>,
    /// Index of the snapshot the store currently shows
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Creates a history whose only entry is the empty log
    pub fn new() -> Self {
        Self {
            entries: vec![Vec::new()],
            cursor: 0,
        }
    }

    /// Record the store's current log as a new step.
    ///
    /// Anything past the cursor is discarded first, so redo is no longer
    /// possible after acting on an undone state.
    pub fn commit(&mut self, store: &StrokeStore) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(store.current().to_vec());
        self.cursor = self.entries.len() - 1;
        log::debug!(
            "history commit: {} strokes at index {}",
            store.len(),
            self.cursor
        );
    }

    /// Step back one entry. Returns false when already at the oldest entry.
    pub fn undo(&mut self, store: &mut StrokeStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        store.replace(self.entries[self.cursor].clone());
        true
    }

    /// Step forward one entry. Returns false when already at the newest entry.
    pub fn redo(&mut self, store: &mut StrokeStore) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        store.replace(self.entries[self.cursor].clone());
        true
    }

    /// Empty the log as an undoable step
    pub fn clear(&mut self, store: &mut StrokeStore) {
        store.replace(Vec::new());
        self.commit(store);
    }

    /// Start over from a loaded log, dropping all previous history
    pub fn hydrate(&mut self, store: &mut StrokeStore, strokes: Vec<StrokeRef>) {
        store.replace(strokes.clone());
        self.entries = vec![strokes];
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Position of the cursor in the stack
    pub fn index(&self) -> usize {
        self.cursor
    }

    /// Number of entries, including the initial one
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, index: usize) -> Option<&[StrokeRef]> {
        self.entries.get(index).map(Vec::as_slice)
    }
}
