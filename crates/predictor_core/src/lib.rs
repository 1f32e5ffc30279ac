//! Core of the vision predictor: model catalog, file intake, the session
//! state machine and the client for the remote prediction service.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod upload;
pub mod worker;

pub use catalog::{MODELS, ModelDescriptor, default_model, find_model, model_or_default};
pub use client::{HttpPredictionClient, Prediction, PredictionBackend};
pub use config::PredictorConfig;
pub use error::{ConfigError, IntakeError, RequestError, ValidationError};
pub use session::{Phase, Session, Submission};
pub use upload::{Preview, UploadedImage};
pub use worker::{Completed, PredictionWorker};
