use eframe::egui;

/// A clickable square of paint colour
pub struct ColourSwatch<'a> {
    pub color: egui::Color32,
    pub label: &'a str,
    pub selected: bool,
    pub size: f32,
}

impl<'a> ColourSwatch<'a> {
    pub fn new(color: egui::Color32, label: &'a str, selected: bool) -> Self {
        Self {
            color,
            label,
            selected,
            size: 36.0,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(egui::vec2(self.size, self.size), egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let rect = if response.hovered() || self.selected {
                rect.expand(2.0)
            } else {
                rect
            };
            ui.painter().rect_filled(rect, 6.0, self.color);

            // Selected swatches get the brand ring, others a white border
            let border = if self.selected {
                egui::Stroke::new(3.0, egui::Color32::from_rgb(238, 108, 77))
            } else {
                egui::Stroke::new(2.0, egui::Color32::WHITE)
            };
            ui.painter().rect_stroke(rect, 6.0, border);
        }

        response.on_hover_text(self.label)
    }
}
