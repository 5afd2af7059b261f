use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

use crate::app::VisualiserApp;
use crate::compositor::Compositor;
use crate::stroke::StrokeColor;

const BACKDROP: Color32 = Color32::from_rgb(15, 23, 42);

/// The largest rect with the canvas aspect ratio that fits `available`, centred
pub fn display_rect(available: Rect, compositor: &Compositor) -> Rect {
    let canvas = Vec2::new(compositor.width() as f32, compositor.height() as f32);
    let scale = (available.width() / canvas.x).min(available.height() / canvas.y).max(0.0);
    Rect::from_center_size(available.center(), canvas * scale)
}

/// Map a screen position inside `rect` to canvas pixels
pub fn to_canvas(pos: Pos2, rect: Rect, compositor: &Compositor) -> Pos2 {
    let x = (pos.x - rect.min.x) / rect.width() * compositor.width() as f32;
    let y = (pos.y - rect.min.y) / rect.height() * compositor.height() as f32;
    Pos2::new(x, y)
}

fn to_screen(pos: Pos2, rect: Rect, compositor: &Compositor) -> Pos2 {
    Pos2::new(
        rect.min.x + pos.x / compositor.width() as f32 * rect.width(),
        rect.min.y + pos.y / compositor.height() as f32 * rect.height(),
    )
}

pub fn canvas_panel(app: &mut VisualiserApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_rect_before_wrap();
        let rect = display_rect(available, &app.compositor);
        let response = ui.allocate_rect(rect, Sense::drag());
        let painter = ui.painter_at(rect);
        let compositor = app.compositor;

        // Pointer handling: one gesture per drag, leaving the canvas ends it
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                app.session.begin_gesture(to_canvas(pos, rect, &compositor));
            }
        } else if response.dragged() {
            match response.interact_pointer_pos() {
                Some(pos) if rect.contains(pos) => {
                    app.session.extend_gesture(to_canvas(pos, rect, &compositor));
                }
                _ => {
                    app.session.end_gesture();
                }
            }
        }
        if response.drag_stopped() {
            app.session.end_gesture();
        }
        app.session.cursor = response
            .hover_pos()
            .filter(|pos| rect.contains(*pos))
            .map(|pos| to_canvas(pos, rect, &compositor));

        app.textures.sync_overlay(ctx, &compositor, app.session.store());

        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.rect_filled(rect, 12.0, BACKDROP);
        if let Some(base) = app.textures.base() {
            painter.image(base.id(), rect, uv, Color32::WHITE);
        }
        if app.session.overlay_visible {
            if let Some(overlay) = app.textures.overlay() {
                painter.image(overlay.id(), rect, uv, Color32::WHITE);
            }

            // Brush preview
            if let Some(cursor) = app.session.cursor {
                let brush = &app.session.brush;
                let radius = brush.size() * rect.width() / compositor.width() as f32;
                let fill = StrokeColor::new(brush.color())
                    .ok()
                    .and_then(|c| c.to_color32())
                    .map(|c| Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), 0x40))
                    .unwrap_or(Color32::TRANSPARENT);
                painter.circle(
                    to_screen(cursor, rect, &compositor),
                    radius,
                    fill,
                    Stroke::new(2.0, Color32::WHITE),
                );
            }
        }

        if app.base_image.is_none() {
            let text = if app.is_loading_image() {
                "Loading room…"
            } else {
                "Select a room or upload your own to start painting"
            };
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(18.0),
                Color32::WHITE,
            );
        }

        if app.session.cursor.is_some() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }
    });
}
