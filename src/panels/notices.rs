use crate::app::VisualiserApp;
use crate::notice::NoticeKind;

pub fn notices(app: &mut VisualiserApp, ctx: &egui::Context) {
    let visible = app.notices.visible();
    if visible.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("visualiser_notices"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -96.0))
        .show(ctx, |ui| {
            for notice in visible {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let color = match notice.kind {
                        NoticeKind::Success => egui::Color32::from_rgb(107, 203, 119),
                        NoticeKind::Error => egui::Color32::from_rgb(239, 68, 68),
                    };
                    ui.colored_label(color, &notice.message);
                });
            }
        });
    // keep repainting so expired notices disappear
    ctx.request_repaint_after(std::time::Duration::from_millis(250));
}
