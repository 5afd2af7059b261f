use egui::{Color32, Pos2};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Opacity applied to every dab, so overlapping dabs build up like paint.
pub const DAB_ALPHA: u8 = 0x80;

/// Errors raised when a dab cannot be recorded
#[derive(Debug, Error, PartialEq)]
pub enum StrokeError {
    #[error("stroke position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f32, y: f32 },

    #[error("stroke radius {0} must be a finite positive number")]
    InvalidRadius(f32),

    #[error("stroke colour is empty")]
    EmptyColor,
}

/// A colour exactly as the user picked it.
///
/// The original string is what gets persisted; rendering goes through
/// [`StrokeColor::to_color32`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StrokeColor(String);

impl StrokeColor {
    pub fn new(value: impl Into<String>) -> Result<Self, StrokeError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(StrokeError::EmptyColor);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `#RGB` or `#RRGGBB` into an opaque colour.
    pub fn to_color32(&self) -> Option<Color32> {
        let hex = self.0.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = hex.chars().map(|c| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 16 + v
                });
                Some(Color32::from_rgb(
                    channels.next()?,
                    channels.next()?,
                    channels.next()?,
                ))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// The colour a dab is actually drawn with (unmultiplied RGBA).
    pub fn dab_rgba(&self) -> Option<[u8; 4]> {
        self.to_color32().map(|c| [c.r(), c.g(), c.b(), DAB_ALPHA])
    }
}

impl fmt::Debug for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// A single dab. Never edited after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    position: Pos2,
    radius: f32,
    color: StrokeColor,
}

// Strokes are shared between the live log and every history snapshot
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(position: Pos2, radius: f32, color: StrokeColor) -> Result<Self, StrokeError> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(StrokeError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(StrokeError::InvalidRadius(radius));
        }
        Ok(Self {
            position,
            radius,
            color,
        })
    }

    pub fn new_ref(position: Pos2, radius: f32, color: StrokeColor) -> Result<StrokeRef, StrokeError> {
        Self::new(position, radius, color).map(Arc::new)
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> &StrokeColor {
        &self.color
    }
}
