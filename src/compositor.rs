use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

use crate::stroke::{Stroke, StrokeRef};
use crate::stroke_store::StrokeStore;

pub const DEFAULT_CANVAS_WIDTH: u32 = 960;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 540;

/// Where a base image lands on the canvas, in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Builds canvas frames from a base image and the stroke log.
///
/// Every method is a pure function of its inputs: the same base and strokes
/// always yield the same pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    width: u32,
    height: u32,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scale an image to fit the canvas without distortion and centre it.
    pub fn fit(&self, image_width: u32, image_height: u32) -> FitRect {
        if image_width == 0 || image_height == 0 {
            return FitRect {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            };
        }
        let ratio = f64::min(
            f64::from(self.width) / f64::from(image_width),
            f64::from(self.height) / f64::from(image_height),
        );
        let width = ((f64::from(image_width) * ratio).round() as u32).clamp(1, self.width);
        let height = ((f64::from(image_height) * ratio).round() as u32).clamp(1, self.height);
        FitRect {
            x: (self.width - width) / 2,
            y: (self.height - height) / 2,
            width,
            height,
        }
    }

    fn blank(&self) -> RgbaImage {
        RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 0]))
    }

    /// The letterboxed base layer. Without an image this is an empty frame.
    pub fn render_base(&self, base: Option<&RgbaImage>) -> RgbaImage {
        let mut frame = self.blank();
        let Some(base) = base else {
            return frame;
        };
        let rect = self.fit(base.width(), base.height());
        if rect.width == 0 || rect.height == 0 {
            return frame;
        }
        let scaled = if (rect.width, rect.height) == base.dimensions() {
            base.clone()
        } else {
            imageops::resize(base, rect.width, rect.height, FilterType::Triangle)
        };
        imageops::replace(&mut frame, &scaled, i64::from(rect.x), i64::from(rect.y));
        frame
    }

    /// A transparent layer with every dab drawn in log order.
    pub fn render_overlay(&self, strokes: &[StrokeRef]) -> RgbaImage {
        let mut overlay = self.blank();
        for stroke in strokes {
            paint_dab(&mut overlay, stroke);
        }
        overlay
    }

    /// Flatten the base and the dabs into a single frame for export.
    pub fn composite(&self, base: Option<&RgbaImage>, strokes: &[StrokeRef]) -> RgbaImage {
        let mut frame = self.render_base(base);
        let overlay = self.render_overlay(strokes);
        imageops::overlay(&mut frame, &overlay, 0, 0);
        frame
    }
}

/// Draw one translucent disc, source-over, clipped to the image.
///
/// A pixel is covered when its centre lies inside the circle.
pub fn paint_dab(target: &mut RgbaImage, stroke: &Stroke) {
    let Some(rgba) = stroke.color().dab_rgba() else {
        log::debug!("skipping dab with unparseable colour {}", stroke.color());
        return;
    };
    let source = Rgba(rgba);
    let center = stroke.position();
    let radius = stroke.radius();
    let radius_sq = radius * radius;

    let (width, height) = target.dimensions();
    let min_x = (center.x - radius).floor().max(0.0);
    let min_y = (center.y - radius).floor().max(0.0);
    let max_x = (center.x + radius).ceil().min(width as f32);
    let max_y = (center.y + radius).ceil().min(height as f32);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    for py in min_y as u32..max_y as u32 {
        let dy = py as f32 + 0.5 - center.y;
        for px in min_x as u32..max_x as u32 {
            let dx = px as f32 + 0.5 - center.x;
            if dx * dx + dy * dy <= radius_sq {
                target.get_pixel_mut(px, py).blend(&source);
            }
        }
    }
}

/// Incrementally maintained overlay for live preview.
///
/// Appended dabs are drawn on top of what is already there; a replaced log
/// (undo, redo, clear, hydrate) is redrawn from scratch. Either way the result
/// matches [`Compositor::render_overlay`] for the same log.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    image: RgbaImage,
    rendered: usize,
    revision: Option<u64>,
}

impl OverlayLayer {
    pub fn new(compositor: &Compositor) -> Self {
        Self {
            image: compositor.blank(),
            rendered: 0,
            revision: None,
        }
    }

    /// Bring the layer up to date with the store. Returns true if any pixel
    /// may have changed.
    pub fn sync(&mut self, compositor: &Compositor, store: &StrokeStore) -> bool {
        let strokes = store.current();
        if self.revision != Some(store.revision()) || strokes.len() < self.rendered {
            self.image = compositor.render_overlay(strokes);
            self.rendered = strokes.len();
            self.revision = Some(store.revision());
            return true;
        }
        if strokes.len() == self.rendered {
            return false;
        }
        for stroke in &strokes[self.rendered..] {
            paint_dab(&mut self.image, stroke);
        }
        self.rendered = strokes.len();
        true
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeColor;
    use egui::Pos2;

    fn dab(x: f32, y: f32, radius: f32, color: &str) -> StrokeRef {
        Stroke::new_ref(Pos2::new(x, y), radius, StrokeColor::new(color).unwrap()).unwrap()
    }

    #[test]
    fn fit_matching_aspect_fills_canvas() {
        let compositor = Compositor::default();
        let rect = compositor.fit(1600, 900);
        assert_eq!(
            rect,
            FitRect {
                x: 0,
                y: 0,
                width: 960,
                height: 540
            }
        );
    }

    #[test]
    fn fit_square_is_pillarboxed() {
        let compositor = Compositor::default();
        let rect = compositor.fit(1000, 1000);
        assert_eq!(rect.width, 540);
        assert_eq!(rect.height, 540);
        assert_eq!(rect.y, 0);
        let right_margin = compositor.width() - rect.x - rect.width;
        assert_eq!(rect.x, right_margin);
        assert_eq!(rect.x, 210);
    }

    #[test]
    fn fit_tall_image_never_overflows() {
        let compositor = Compositor::default();
        let rect = compositor.fit(300, 2000);
        assert!(rect.height <= compositor.height());
        assert!(rect.x + rect.width <= compositor.width());
    }

    #[test]
    fn dab_blends_at_half_opacity() {
        let mut overlay = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        paint_dab(&mut overlay, &dab(10.0, 10.0, 4.0, "#FF0000"));
        let [r, g, b, a] = overlay.get_pixel(10, 10).0;
        assert!(r >= 254 && g == 0 && b == 0);
        assert!((127..=128).contains(&a));
        assert_eq!(overlay.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn overlapping_dabs_intensify() {
        let mut overlay = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        let stroke = dab(10.0, 10.0, 4.0, "#FF0000");
        paint_dab(&mut overlay, &stroke);
        let once = overlay.get_pixel(10, 10).0[3];
        paint_dab(&mut overlay, &stroke);
        let twice = overlay.get_pixel(10, 10).0[3];
        assert!(twice > once);
    }

    #[test]
    fn dabs_outside_canvas_are_clipped() {
        let compositor = Compositor::new(32, 32);
        let overlay = compositor.render_overlay(&[dab(-100.0, -100.0, 10.0, "#000000")]);
        assert!(overlay.pixels().all(|p| p.0[3] == 0));

        let edge = compositor.render_overlay(&[dab(0.0, 0.0, 3.0, "#000000")]);
        assert_ne!(edge.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn missing_base_gives_empty_frame() {
        let compositor = Compositor::new(16, 9);
        let frame = compositor.render_base(None);
        assert_eq!(frame.dimensions(), (16, 9));
        assert!(frame.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn incremental_overlay_matches_full_render() {
        let compositor = Compositor::new(64, 64);
        let mut store = StrokeStore::new();
        let mut layer = OverlayLayer::new(&compositor);

        store.append(dab(10.0, 10.0, 8.0, "#2A7ABF"));
        assert!(layer.sync(&compositor, &store));
        store.append(dab(14.0, 12.0, 8.0, "#EE6C4D"));
        store.append(dab(30.0, 30.0, 5.0, "#6BCB77"));
        assert!(layer.sync(&compositor, &store));
        assert!(!layer.sync(&compositor, &store));

        assert_eq!(layer.image(), &compositor.render_overlay(store.current()));

        store.replace(store.current()[..1].to_vec());
        assert!(layer.sync(&compositor, &store));
        assert_eq!(layer.image(), &compositor.render_overlay(store.current()));
    }
}
