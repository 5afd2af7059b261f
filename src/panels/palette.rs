use crate::app::VisualiserApp;
use crate::brush::PALETTE;
use crate::components::ColourSwatch;
use crate::stroke::StrokeColor;

fn swatch_color(hex: &str) -> egui::Color32 {
    StrokeColor::new(hex)
        .ok()
        .and_then(|c| c.to_color32())
        .unwrap_or(egui::Color32::GRAY)
}

fn to_hex(color: egui::Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

pub fn palette(app: &mut VisualiserApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("visualiser_palette").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.strong("PAINT COLORS");
        ui.horizontal_wrapped(|ui| {
            let current = app.session.brush.color().to_owned();
            for token in PALETTE {
                let swatch = ColourSwatch::new(swatch_color(token.hex), token.name, current == token.hex);
                if swatch.show(ui).clicked() {
                    app.session.brush.pick_color(token.hex);
                }
            }
            ui.separator();

            let mut custom = swatch_color(&current);
            if egui::color_picker::color_edit_button_srgba(ui, &mut custom, egui::color_picker::Alpha::Opaque)
                .on_hover_text("Custom Color")
                .changed()
            {
                app.session.brush.pick_color(to_hex(custom));
            }

            let recent = app.session.brush.recent_colors().to_vec();
            if !recent.is_empty() {
                ui.separator();
                for color in &recent {
                    let swatch = ColourSwatch::new(swatch_color(color), "Recent color", current == *color).size(28.0);
                    if swatch.show(ui).clicked() {
                        app.session.brush.set_color(color.clone());
                    }
                }
            }
        });
        ui.add_space(6.0);
    });
}
