mod colour_swatch;

pub use colour_swatch::ColourSwatch;
