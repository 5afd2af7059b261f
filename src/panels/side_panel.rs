use crate::app::VisualiserApp;

pub fn side_panel(app: &mut VisualiserApp, ctx: &egui::Context) {
    egui::SidePanel::right("visualiser_side_panel")
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                upload_card(app, ui);
                ui.separator();
                sample_rooms(app, ui);
                ui.separator();
                project_card(app, ui);
            });
        });
}

fn upload_card(app: &mut VisualiserApp, ui: &mut egui::Ui) {
    ui.heading("Room image");
    ui.label("Drop a photo of your room onto the window, or open one:");
    ui.horizontal(|ui| {
        let field = ui.add(
            egui::TextEdit::singleline(&mut app.image_input)
                .hint_text("Path or URL")
                .desired_width(150.0),
        );
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Open").clicked() || submitted) && !app.image_input.trim().is_empty() {
            let source = app.image_input.trim().to_owned();
            app.select_image(source);
        }
    });
    if app.is_loading_image() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading image...");
        });
    }
}

fn sample_rooms(app: &mut VisualiserApp, ui: &mut egui::Ui) {
    ui.heading("Sample rooms");
    let mut chosen = None;
    ui.horizontal_wrapped(|ui| {
        for (index, room) in app.config.sample_rooms.iter().enumerate() {
            let selected = app.session.image_source() == Some(room.as_str());
            if ui
                .selectable_label(selected, format!("Room {}", index + 1))
                .on_hover_text(room.as_str())
                .clicked()
            {
                chosen = Some(room.clone());
            }
        }
    });
    if let Some(room) = chosen {
        app.select_image(room);
    }
}

fn project_card(app: &mut VisualiserApp, ui: &mut egui::Ui) {
    ui.heading("Project");

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut app.project_id_input)
                .hint_text("Project id")
                .desired_width(150.0),
        );
        if ui.button("Load").clicked() {
            let id = app.project_id_input.clone();
            app.open_project(id);
        }
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let saving = app.is_saving();
        if ui
            .add_enabled(!saving && app.base_image.is_some(), egui::Button::new("Save"))
            .clicked()
        {
            app.start_save();
        }
        if saving {
            ui.spinner();
            ui.label("Saving...");
        }
    });
    if ui
        .add_enabled(app.base_image.is_some(), egui::Button::new("Export PNG"))
        .clicked()
    {
        app.export_png();
    }

    if let Some(link) = app.share_link() {
        ui.add_space(8.0);
        ui.label("Share link");
        ui.horizontal(|ui| {
            ui.monospace(&link);
            if ui.button("Copy link").clicked() {
                ui.ctx().copy_text(link.clone());
                app.notices.success("Link copied to clipboard!");
            }
        });
    }
}
