//! Application shell: owns the session and lays out the panels.

mod models;
mod prediction;
mod upload;

use eframe::{App, Frame, egui};
use predictor_core::{
    IntakeError, PredictionBackend, PredictionWorker, PredictorConfig, Session, UploadedImage,
    model_or_default,
};
use std::sync::Arc;

const ACCENT_BLUE: egui::Color32 = egui::Color32::from_rgb(0x31, 0x82, 0xce);
const BORDER_GRAY: egui::Color32 = egui::Color32::from_rgb(0xcb, 0xd5, 0xe0);

pub struct UiApp {
    session: Session,
    worker: PredictionWorker,
    endpoint: String,
    app_version: &'static str,
    preview: Option<egui::TextureHandle>,
    drag_active: bool,
}

impl UiApp {
    pub fn new(config: &PredictorConfig, backend: Arc<dyn PredictionBackend>) -> Self {
        Self {
            session: Session::new(model_or_default(&config.default_model)),
            worker: PredictionWorker::new(backend),
            endpoint: config.endpoint.clone(),
            app_version: env!("VISION_PREDICTOR_VERSION"),
            preview: None,
            drag_active: false,
        }
    }

    /// Route a picked or dropped file into the session. The preview texture
    /// is only replaced when the file was accepted.
    fn handle_intake(&mut self, ctx: &egui::Context, result: Result<UploadedImage, IntakeError>) {
        if let Ok(image) = &result {
            self.preview = image.preview().map(|p| {
                let size = [p.width as usize, p.height as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, &p.rgba);
                ctx.load_texture(
                    format!("preview:{}", image.name()),
                    color,
                    egui::TextureOptions::LINEAR,
                )
            });
        }
        self.session.intake(result);
    }

    fn clear_image(&mut self) {
        self.preview = None;
        self.session.clear_image();
    }

    fn start_prediction(&mut self, ctx: &egui::Context) {
        let Some(submission) = self.session.begin_submission() else {
            return;
        };
        let ticket = submission.ticket;
        let repaint = ctx.clone();
        if let Err(e) = self
            .worker
            .spawn(submission, move || repaint.request_repaint())
        {
            self.session.complete(ticket, Err(e));
        }
    }

    fn poll_worker(&mut self) {
        while let Some(done) = self.worker.try_recv() {
            self.session.complete(done.ticket, done.outcome);
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_worker();
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("v{}", self.app_version));
                ui.separator();
                ui.label(format!("Endpoint: {}", self.endpoint));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(
                            egui::RichText::new("AI Vision Predictor")
                                .size(28.0)
                                .strong(),
                        );
                        ui.label(
                            "Upload an image and select a model to get AI-powered predictions",
                        );
                    });
                    ui.add_space(16.0);

                    ui.columns(2, |columns| {
                        card(&mut columns[0], "Upload Image", |ui| self.render_upload(ui));
                        columns[0].add_space(16.0);
                        card(&mut columns[0], "Select Model", |ui| self.render_models(ui));

                        card(&mut columns[1], "Make Prediction", |ui| {
                            self.render_predict(ui)
                        });
                        self.render_outcome(&mut columns[1]);
                    });
                });
        });
    }
}

/// White rounded box with a title, the building block of every panel.
fn card<R>(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .corner_radius(12.0)
        .inner_margin(egui::Margin::same(20))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(title).size(20.0).strong());
            ui.add_space(12.0);
            add_contents(ui)
        })
        .inner
}
