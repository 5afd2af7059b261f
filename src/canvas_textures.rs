use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;

use crate::asset::BaseImage;
use crate::compositor::{Compositor, OverlayLayer};
use crate::stroke_store::StrokeStore;

pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// GPU copies of the two canvas layers: the letterboxed room and the paint
/// overlay. They are uploaded only when their pixels change.
pub struct CanvasTextures {
    base: Option<TextureHandle>,
    overlay_layer: OverlayLayer,
    overlay: Option<TextureHandle>,
    uploads: u64,
}

impl std::fmt::Debug for CanvasTextures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasTextures")
            .field("has_base", &self.base.is_some())
            .field("has_overlay", &self.overlay.is_some())
            .field("uploads", &self.uploads)
            .finish()
    }
}

impl CanvasTextures {
    pub fn new(compositor: &Compositor) -> Self {
        Self {
            base: None,
            overlay_layer: OverlayLayer::new(compositor),
            overlay: None,
            uploads: 0,
        }
    }

    fn upload(ctx: &Context, slot: &mut Option<TextureHandle>, name: &str, image: ColorImage) {
        match slot {
            Some(handle) => handle.set(image, TextureOptions::LINEAR),
            None => *slot = Some(ctx.load_texture(name, image, TextureOptions::LINEAR)),
        }
    }

    /// Re-render the base layer for a newly loaded image, or drop it
    pub fn set_base(&mut self, ctx: &Context, compositor: &Compositor, base: Option<&BaseImage>) {
        match base {
            Some(base) => {
                let frame = compositor.render_base(Some(base.pixels()));
                Self::upload(ctx, &mut self.base, "visualiser_base", to_color_image(&frame));
                self.uploads += 1;
            }
            None => self.base = None,
        }
    }

    /// Bring the overlay texture in line with the stroke log
    pub fn sync_overlay(&mut self, ctx: &Context, compositor: &Compositor, store: &StrokeStore) {
        let changed = self.overlay_layer.sync(compositor, store);
        if changed || self.overlay.is_none() {
            let image = to_color_image(self.overlay_layer.image());
            Self::upload(ctx, &mut self.overlay, "visualiser_overlay", image);
            self.uploads += 1;
        }
    }

    pub fn base(&self) -> Option<&TextureHandle> {
        self.base.as_ref()
    }

    pub fn overlay(&self) -> Option<&TextureHandle> {
        self.overlay.as_ref()
    }

    /// Number of texture uploads so far
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}
