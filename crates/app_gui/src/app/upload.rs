//! Drop zone, file picker and image preview.

use super::{ACCENT_BLUE, BORDER_GRAY, UiApp};
use eframe::egui;
use predictor_core::upload::mime_from_path;
use predictor_core::{IntakeError, UploadedImage};
use rfd::FileDialog;
use std::io;
use std::path::{Path, PathBuf};

const PREVIEW_HEIGHT: f32 = 256.0;

impl UiApp {
    /// Tracks hover state and takes the first file of a drop.
    pub(super) fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.first().cloned(),
            )
        });
        self.drag_active = hovering;
        if let Some(file) = dropped {
            self.drag_active = false;
            let result = intake_dropped(&file);
            self.handle_intake(ctx, result);
        }
    }

    pub(super) fn render_upload(&mut self, ui: &mut egui::Ui) {
        if self.session.image().is_some() {
            self.render_preview(ui);
        } else {
            self.render_drop_zone(ui);
        }
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let (stroke_color, fill) = if self.drag_active {
            (ACCENT_BLUE, egui::Color32::from_rgb(0xeb, 0xf8, 0xff))
        } else {
            (BORDER_GRAY, egui::Color32::TRANSPARENT)
        };
        let mut choose_clicked = false;
        egui::Frame::new()
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .fill(fill)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(32, 48))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("⬆").size(40.0).color(BORDER_GRAY));
                    ui.label("Drag and drop an image here, or");
                    ui.add_space(6.0);
                    choose_clicked = ui.button("Choose File").clicked();
                    ui.add_space(6.0);
                    ui.small("JPG, JPEG, PNG up to 10MB");
                });
            });

        if choose_clicked
            && let Some(path) = FileDialog::new()
                .add_filter("Images", &["jpg", "jpeg", "png"])
                .add_filter("All files", &["*"])
                .pick_file()
        {
            let result = UploadedImage::from_path(&path, None);
            self.handle_intake(ui.ctx(), result);
        }
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        let mut clear_clicked = false;
        ui.horizontal(|ui| {
            if let Some(image) = self.session.image() {
                ui.label(egui::RichText::new(image.name()).strong());
                ui.weak(format!("{:.1} KiB", image.size() as f64 / 1024.0));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                clear_clicked = ui
                    .add(egui::Button::new("✖").fill(egui::Color32::from_rgb(0xe5, 0x3e, 0x3e)))
                    .on_hover_text("Remove image")
                    .clicked();
            });
        });
        ui.add_space(8.0);

        match &self.preview {
            Some(texture) => {
                ui.vertical_centered(|ui| {
                    ui.add(
                        egui::Image::new(texture)
                            .max_height(PREVIEW_HEIGHT)
                            .max_width(ui.available_width())
                            .corner_radius(8.0),
                    );
                });
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(PREVIEW_HEIGHT / 2.0 - 10.0);
                    ui.weak("Preview unavailable");
                    ui.add_space(PREVIEW_HEIGHT / 2.0 - 10.0);
                });
            }
        }

        if clear_clicked {
            self.clear_image();
        }
    }
}

/// Turn a drop event into an upload. Payload bytes are used when the
/// platform provides them, otherwise the file is read from its path.
fn intake_dropped(file: &egui::DroppedFile) -> Result<UploadedImage, IntakeError> {
    let mime_hint = Some(file.mime.as_str()).filter(|m| !m.trim().is_empty());
    if let Some(bytes) = &file.bytes {
        let mime = match mime_hint {
            Some(mime) => mime,
            None => mime_from_path(Path::new(&file.name)),
        };
        return Ok(UploadedImage::from_bytes(
            file.name.clone(),
            mime,
            bytes.clone(),
        )?);
    }
    match &file.path {
        Some(path) => UploadedImage::from_path(path, mime_hint),
        None => Err(IntakeError::Read {
            path: PathBuf::from(&file.name),
            source: io::Error::new(io::ErrorKind::NotFound, "drop carried no data"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predictor_core::{
        Prediction, PredictionBackend, PredictorConfig, RequestError, ValidationError,
    };
    use rstest::rstest;
    use std::sync::Arc;

    struct Unreachable;

    impl PredictionBackend for Unreachable {
        fn predict(
            &self,
            _image: &UploadedImage,
            _model_id: &str,
        ) -> Result<Prediction, RequestError> {
            panic!("drop handling never submits");
        }
    }

    fn app() -> UiApp {
        UiApp::new(&PredictorConfig::default(), Arc::new(Unreachable))
    }

    fn run_frame(app: &mut UiApp, ctx: &egui::Context, input: egui::RawInput) {
        let _ = ctx.run(input, |ctx| app.handle_dropped_files(ctx));
    }

    fn hovering() -> Vec<egui::HoveredFile> {
        vec![egui::HoveredFile {
            mime: "image/png".into(),
            ..Default::default()
        }]
    }

    fn dropped(name: &str, mime: &str, bytes: Option<&[u8]>) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes: bytes.map(Arc::from),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("photo.png", "")]
    #[case("photo.bin", "image/jpeg")]
    #[case("PHOTO.JPG", "")]
    fn accepts_dropped_bytes(#[case] name: &str, #[case] mime: &str) {
        let image = intake_dropped(&dropped(name, mime, Some(b"abc"))).expect("accepted");
        assert_eq!(image.name(), name);
        assert_eq!(image.size(), 3);
    }

    #[test]
    fn rejects_dropped_gif() {
        let err = intake_dropped(&dropped("anim.gif", "", Some(b"GIF89a"))).unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Invalid(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn hover_highlights_drop_zone_until_files_leave() {
        let ctx = egui::Context::default();
        let mut app = app();
        assert!(!app.drag_active);

        let input = egui::RawInput {
            hovered_files: hovering(),
            ..Default::default()
        };
        run_frame(&mut app, &ctx, input);
        assert!(app.drag_active);

        run_frame(&mut app, &ctx, egui::RawInput::default());
        assert!(!app.drag_active);
        assert!(app.session.image().is_none());
    }

    #[test]
    fn drop_takes_first_file_and_clears_highlight() {
        let ctx = egui::Context::default();
        let mut app = app();
        let input = egui::RawInput {
            hovered_files: hovering(),
            ..Default::default()
        };
        run_frame(&mut app, &ctx, input);
        assert!(app.drag_active);

        let input = egui::RawInput {
            hovered_files: hovering(),
            dropped_files: vec![
                dropped("a.png", "image/png", Some(b"first")),
                dropped("b.png", "image/png", Some(b"second")),
            ],
            ..Default::default()
        };
        run_frame(&mut app, &ctx, input);
        assert!(!app.drag_active);
        let image = app.session.image().expect("first file accepted");
        assert_eq!(image.name(), "a.png");
        assert_eq!(image.bytes(), b"first");
        assert!(app.session.error().is_none());
    }

    #[test]
    fn rejected_drop_keeps_current_image() {
        let ctx = egui::Context::default();
        let mut app = app();
        let input = egui::RawInput {
            dropped_files: vec![dropped("a.png", "image/png", Some(b"first"))],
            ..Default::default()
        };
        run_frame(&mut app, &ctx, input);

        let input = egui::RawInput {
            dropped_files: vec![dropped("anim.gif", "", Some(b"GIF89a"))],
            ..Default::default()
        };
        run_frame(&mut app, &ctx, input);
        assert_eq!(app.session.image().map(UploadedImage::name), Some("a.png"));
        assert_eq!(
            app.session.error(),
            Some("Please upload a valid image file (JPG, JPEG, or PNG)")
        );
    }

    #[test]
    fn drop_without_bytes_or_path_is_read_error() {
        let err = intake_dropped(&dropped("ghost.png", "image/png", None)).unwrap_err();
        assert_eq!(err.user_message(), "Could not read the selected file");
    }
}
