use serde::{Deserialize, Serialize};

use crate::stroke::{StrokeColor, StrokeError};

pub const MIN_BRUSH_SIZE: f32 = 5.0;
pub const MAX_BRUSH_SIZE: f32 = 80.0;
pub const BRUSH_SIZE_STEP: f32 = 5.0;
pub const DEFAULT_BRUSH_SIZE: f32 = 30.0;
pub const DEFAULT_BRUSH_COLOR: &str = "#EE6C4D";
pub const MAX_RECENT_COLORS: usize = 5;

/// A named swatch in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourToken {
    pub hex: &'static str,
    pub name: &'static str,
}

pub const PALETTE: [ColourToken; 6] = [
    ColourToken { hex: "#F0D9B5", name: "Cream" },
    ColourToken { hex: "#2A7ABF", name: "Ocean Blue" },
    ColourToken { hex: "#EE6C4D", name: "Coral" },
    ColourToken { hex: "#6BCB77", name: "Mint Green" },
    ColourToken { hex: "#C77DFF", name: "Lavender" },
    ColourToken { hex: "#1F2937", name: "Charcoal" },
];

/// Current brush settings plus the recently used colours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brush {
    color: String,
    size: f32,
    recent_colors: Vec<String>,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: DEFAULT_BRUSH_COLOR.to_owned(),
            size: DEFAULT_BRUSH_SIZE,
            recent_colors: Vec::new(),
        }
    }
}

impl Brush {
    pub fn new(color: impl Into<String>, size: f32) -> Self {
        let mut brush = Self::default();
        brush.set_color(color);
        brush.set_size(size);
        brush
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// The colour as a stroke colour, failing only when it is blank
    pub fn stroke_color(&self) -> Result<StrokeColor, StrokeError> {
        StrokeColor::new(self.color.clone())
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn recent_colors(&self) -> &[String] {
        &self.recent_colors
    }

    /// Sets the colour without touching the recent list
    pub fn set_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        if !color.trim().is_empty() {
            self.color = color;
        }
    }

    /// Sets the colour and moves it to the front of the recent list
    pub fn pick_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        if color.trim().is_empty() {
            return;
        }
        self.recent_colors.retain(|c| *c != color);
        self.recent_colors.insert(0, color.clone());
        self.recent_colors.truncate(MAX_RECENT_COLORS);
        self.color = color;
    }

    pub fn set_size(&mut self, size: f32) {
        if size.is_finite() {
            self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        }
    }

    pub fn grow(&mut self) {
        self.set_size(self.size + BRUSH_SIZE_STEP);
    }

    pub fn shrink(&mut self) {
        self.set_size(self.size - BRUSH_SIZE_STEP);
    }
}
