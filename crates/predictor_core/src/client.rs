//! HTTP client for the remote prediction service.

use crate::config::PredictorConfig;
use crate::error::{ConfigError, RequestError};
use crate::upload::UploadedImage;
use reqwest::Url;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;

/// Label and confidence returned by the prediction service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    #[serde(rename = "prediction")]
    pub label: String,
    /// Confidence in [0,1].
    pub confidence: f64,
}

impl Prediction {
    /// Parse a response body of the form
    /// `{ "prediction": "cat", "confidence": 0.87 }`.
    pub fn from_json(body: &[u8]) -> Result<Self, RequestError> {
        let prediction: Prediction = serde_json::from_slice(body)?;
        if !(0.0..=1.0).contains(&prediction.confidence) {
            return Err(RequestError::ConfidenceOutOfRange(prediction.confidence));
        }
        Ok(prediction)
    }

    /// Confidence formatted with one decimal, e.g. `87.0%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

/// Anything that can turn an image and a model id into a prediction.
pub trait PredictionBackend: Send + Sync {
    fn predict(&self, image: &UploadedImage, model_id: &str) -> Result<Prediction, RequestError>;
}

/// Multipart POST client for `POST <endpoint>` with fields `file` and
/// `model_name`.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint_url()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl PredictionBackend for HttpPredictionClient {
    fn predict(&self, image: &UploadedImage, model_id: &str) -> Result<Prediction, RequestError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.mime())?;
        let form = Form::new()
            .part("file", part)
            .text("model_name", model_id.to_string());

        tracing::debug!(
            "POST {} model={model_id} bytes={}",
            self.endpoint,
            image.size()
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status(status));
        }
        let body = response.bytes()?;
        Prediction::from_json(&body)
    }
}
