use crate::app::VisualiserApp;
use crate::brush::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};

pub fn toolbar(app: &mut VisualiserApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("visualiser_toolbar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            ui.label("Project Name");
            ui.add(
                egui::TextEdit::singleline(&mut app.session.title)
                    .hint_text(app.config.default_title.as_str())
                    .desired_width(220.0),
            );
            ui.separator();

            let can_undo = app.session.can_undo();
            let can_redo = app.session.can_redo();
            if ui
                .add_enabled(can_undo, egui::Button::new("⟲ Undo"))
                .on_hover_text("Undo (Ctrl+Z)")
                .clicked()
            {
                app.session.undo();
            }
            if ui
                .add_enabled(can_redo, egui::Button::new("⟳ Redo"))
                .on_hover_text("Redo (Ctrl+Y)")
                .clicked()
            {
                app.session.redo();
            }
            if ui.button("🗑 Clear").on_hover_text("Clear All (Ctrl+K)").clicked() {
                app.session.clear();
            }
            ui.separator();

            ui.label("Size");
            let mut size = app.session.brush.size();
            let slider = egui::Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).step_by(1.0);
            if ui.add(slider).on_hover_text("[ and ] change size").changed() {
                app.session.brush.set_size(size);
            }
            ui.separator();

            let visible = app.session.overlay_visible;
            if ui
                .selectable_label(visible, if visible { "Hide" } else { "Show" })
                .clicked()
            {
                app.session.overlay_visible = !visible;
            }
        });
        ui.add_space(4.0);
    });
}
