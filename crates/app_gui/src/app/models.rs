//! Model catalog grid.

use super::{ACCENT_BLUE, BORDER_GRAY, UiApp};
use eframe::egui;
use predictor_core::{MODELS, ModelDescriptor};

impl UiApp {
    pub(super) fn render_models(&mut self, ui: &mut egui::Ui) {
        let column_width = (ui.available_width() - 12.0) / 2.0;
        let mut clicked: Option<&'static str> = None;
        egui::Grid::new("model-grid")
            .num_columns(2)
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (idx, model) in MODELS.iter().enumerate() {
                    let selected = self.session.is_selected(model);
                    if model_card(ui, model, selected, column_width).clicked() {
                        clicked = Some(model.id);
                    }
                    if idx % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
        if let Some(id) = clicked {
            self.session.select_model(id);
        }
    }
}

fn accent(model: &ModelDescriptor) -> egui::Color32 {
    let [r, g, b] = model.accent;
    egui::Color32::from_rgb(r, g, b)
}

/// Accent swatch, name and description.
pub(super) fn model_summary(ui: &mut egui::Ui, model: &ModelDescriptor) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(32.0, 32.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 8.0, accent(model));
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(model.name).strong());
            ui.label(egui::RichText::new(model.description).small());
        });
    });
}

fn model_card(
    ui: &mut egui::Ui,
    model: &ModelDescriptor,
    selected: bool,
    width: f32,
) -> egui::Response {
    let (stroke, fill) = if selected {
        (ACCENT_BLUE, ACCENT_BLUE.gamma_multiply(0.15))
    } else {
        (BORDER_GRAY, egui::Color32::TRANSPARENT)
    };
    egui::Frame::new()
        .stroke(egui::Stroke::new(2.0, stroke))
        .fill(fill)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(width - 28.0);
            model_summary(ui, model);
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}
