mod app;

use anyhow::{Result, anyhow};
use app::UiApp;
use directories_next::ProjectDirs;
use eframe::{NativeOptions, egui};
use predictor_core::config::{CONFIG_FILE_NAME, ENDPOINT_ENV};
use predictor_core::{HttpPredictionClient, PredictorConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Err(e) = run() {
        tracing::error!("{e:#}");
        eprintln!("Application stopped with error: {e:#}");
    }
}

fn run() -> Result<()> {
    let config_path = config_path();
    let config =
        PredictorConfig::resolve(config_path.as_deref(), std::env::var(ENDPOINT_ENV).ok());
    let client = HttpPredictionClient::new(&config)?;
    tracing::info!("Prediction endpoint: {}", client.endpoint());

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "AI Vision Predictor",
        options,
        Box::new(move |_cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(
                &config,
                Arc::new(client),
            )))
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}

fn config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("org", "vision-predictor", "VisionPredictor")?;
    Some(dirs.config_dir().join(CONFIG_FILE_NAME))
}
