use crate::stroke::StrokeRef;

/// The live stroke log drawn on the wall overlay.
///
/// Strokes only ever leave the log through [`StrokeStore::replace`], which is
/// reserved for history navigation and hydration.
#[derive(Debug, Default, Clone)]
pub struct StrokeStore {
    strokes: Vec<StrokeRef>,
    revision: u64,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, stroke: StrokeRef) {
        self.strokes.push(stroke);
    }

    pub fn replace(&mut self, strokes: Vec<StrokeRef>) {
        self.strokes = strokes;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn current(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Bumped on every `replace`; appends leave it untouched.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
