//! Submit button, error box and result card.

use super::models::model_summary;
use super::{ACCENT_BLUE, UiApp, card};
use eframe::egui;

const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(0xe5, 0x3e, 0x3e);

impl UiApp {
    pub(super) fn render_predict(&mut self, ui: &mut egui::Ui) {
        egui::Frame::new()
            .fill(ui.visuals().faint_bg_color)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                model_summary(ui, self.session.model());
            });
        ui.add_space(12.0);

        let loading = self.session.is_loading();
        let size = egui::vec2(ui.available_width(), 40.0);
        if loading {
            ui.add_enabled_ui(false, |ui| {
                ui.allocate_ui_with_layout(
                    size,
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        ui.spinner();
                        ui.label("Predicting...");
                    },
                );
            });
            return;
        }

        let button = egui::Button::new(egui::RichText::new("Run Prediction").strong())
            .fill(ACCENT_BLUE)
            .min_size(size);
        if ui.add_enabled(self.session.can_submit(), button).clicked() {
            self.start_prediction(ui.ctx());
        }
    }

    /// Either the error box or the result card, never both.
    pub(super) fn render_outcome(&self, ui: &mut egui::Ui) {
        if let Some(message) = self.session.error() {
            ui.add_space(16.0);
            egui::Frame::new()
                .fill(ERROR_RED.gamma_multiply(0.12))
                .stroke(egui::Stroke::new(1.0, ERROR_RED))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::same(16))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new(format!("⚠ {message}")).color(ERROR_RED));
                });
        }

        if let Some(prediction) = self.session.prediction() {
            ui.add_space(16.0);
            card(ui, "Prediction Results", |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(&prediction.label).size(24.0).strong());
                });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("Confidence:");
                    ui.label(
                        egui::RichText::new(prediction.confidence_percent())
                            .strong()
                            .color(ACCENT_BLUE),
                    );
                });
                ui.add(egui::ProgressBar::new(prediction.confidence as f32).fill(ACCENT_BLUE));
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(
                        "ℹ Try switching to a different model to see how predictions vary!",
                    )
                    .small(),
                );
            });
        }
    }
}
