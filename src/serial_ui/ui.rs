use crate::view::MainView;
use bevy_egui::egui;
use log::debug;

/// Label text shown before anything was received.
const EMPTY_HINT: &str = "Nothing received yet";

/// font size shared by the label, the input and the button
const FONT_SIZE: f32 = 20.0;

/// draw received line
pub fn draw_received_ui(ui: &mut egui::Ui, view: &MainView) {
    if view.last_received().is_empty() {
        ui.label(
            egui::RichText::new(EMPTY_HINT)
                .size(FONT_SIZE)
                .color(egui::Color32::GRAY),
        );
    } else {
        ui.label(
            egui::RichText::new(view.last_received())
                .size(FONT_SIZE)
                .monospace(),
        );
    }
}

/// draw input field and push button
pub fn draw_send_ui(ui: &mut egui::Ui, view: &mut MainView) {
    ui.horizontal(|ui| {
        let mut draft = view.draft_text().to_owned();
        let input = ui.add(
            egui::TextEdit::singleline(&mut draft)
                .font(egui::FontId::proportional(FONT_SIZE))
                .desired_width(320.0),
        );
        if input.changed() {
            view.on_draft_change(draft);
        }

        ui.add_space(20.0);
        let push = ui.button(egui::RichText::new("Push It!!").size(FONT_SIZE));
        // The view logs the failure and keeps it in `last_error`.
        if push.clicked()
            && let Err(e) = view.on_submit()
        {
            debug!("push failed: {e}");
        }
    });
}

/// draw last error, if any
pub fn draw_error_ui(ui: &mut egui::Ui, view: &MainView) {
    if let Some(error) = view.last_error() {
        ui.colored_label(egui::Color32::RED, error);
    }
}
