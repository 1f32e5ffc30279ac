//! State of one prediction session: the current image, the selected model
//! and the outcome of the latest action.

use crate::catalog::{self, ModelDescriptor};
use crate::client::{Prediction, PredictionBackend};
use crate::error::{IntakeError, RequestError};
use crate::upload::UploadedImage;

/// Where the submission lifecycle currently stands. Result and error are
/// variants of the same enum, so at most one of them is ever shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// A request is in flight. `notice` holds a file rejection that arrived
    /// meanwhile; it does not cancel the request.
    Submitting {
        ticket: u64,
        notice: Option<String>,
    },
    Succeeded(Prediction),
    Failed(String),
}

/// Everything a worker needs to run one request.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: u64,
    pub image: UploadedImage,
    pub model_id: &'static str,
}

#[derive(Debug)]
pub struct Session {
    image: Option<UploadedImage>,
    model: &'static ModelDescriptor,
    phase: Phase,
    last_ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(catalog::default_model())
    }
}

impl Session {
    pub fn new(model: &'static ModelDescriptor) -> Self {
        Self {
            image: None,
            model,
            phase: Phase::Idle,
            last_ticket: 0,
        }
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn model(&self) -> &'static ModelDescriptor {
        self.model
    }

    pub fn is_selected(&self, model: &ModelDescriptor) -> bool {
        self.model.id == model.id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.phase {
            Phase::Succeeded(p) => Some(p),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(msg) => Some(msg),
            Phase::Submitting {
                notice: Some(msg), ..
            } => Some(msg),
            _ => None,
        }
    }

    /// Apply the outcome of a file intake. A rejected file only sets the
    /// error; the current image and any request in flight stay.
    pub fn intake(&mut self, result: Result<UploadedImage, IntakeError>) {
        match result {
            Ok(image) => {
                tracing::info!(
                    "Accepted {} ({} bytes, {})",
                    image.name(),
                    image.size(),
                    image.mime()
                );
                self.leave_submitting("new image selected");
                self.image = Some(image);
                self.phase = Phase::Idle;
            }
            Err(e) => {
                tracing::info!("Rejected file: {e}");
                match &mut self.phase {
                    Phase::Submitting { notice, .. } => *notice = Some(e.user_message()),
                    phase => *phase = Phase::Failed(e.user_message()),
                }
            }
        }
    }

    pub fn clear_image(&mut self) {
        self.leave_submitting("image cleared");
        self.image = None;
        self.phase = Phase::Idle;
    }

    /// Select a catalog entry by id. Unknown ids and the current selection
    /// are ignored. Returns whether the selection changed.
    pub fn select_model(&mut self, id: &str) -> bool {
        if self.model.id == id {
            return false;
        }
        let Some(model) = catalog::find_model(id) else {
            tracing::warn!("Ignoring unknown model id {id:?}");
            return false;
        };
        self.leave_submitting("model changed");
        self.model = model;
        self.phase = Phase::Idle;
        true
    }

    pub fn can_submit(&self) -> bool {
        self.image.is_some() && !self.is_loading()
    }

    /// Enter `Submitting` and hand out the work for one request. Returns
    /// `None` without touching state when there is no image or a request is
    /// already in flight.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        let image = self.image.clone()?;
        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.phase = Phase::Submitting {
            ticket,
            notice: None,
        };
        tracing::info!(
            "Submitting {} to model {} (ticket {ticket})",
            image.name(),
            self.model.id
        );
        Some(Submission {
            ticket,
            image,
            model_id: self.model.id,
        })
    }

    /// Record the outcome for `ticket`. Outcomes for superseded tickets are
    /// dropped. Returns whether the outcome was applied.
    pub fn complete(&mut self, ticket: u64, outcome: Result<Prediction, RequestError>) -> bool {
        if !matches!(self.phase, Phase::Submitting { ticket: live, .. } if live == ticket) {
            tracing::debug!("Discarding stale response for ticket {ticket}");
            return false;
        }
        self.phase = match outcome {
            Ok(prediction) => {
                tracing::info!(
                    "Prediction {} ({})",
                    prediction.label,
                    prediction.confidence_percent()
                );
                Phase::Succeeded(prediction)
            }
            Err(e) => {
                tracing::warn!("Prediction request failed: {e}");
                Phase::Failed(e.user_message().to_string())
            }
        };
        true
    }

    /// Run one submission to completion on the calling thread.
    pub fn submit_with(&mut self, backend: &dyn PredictionBackend) -> bool {
        let Some(submission) = self.begin_submission() else {
            return false;
        };
        let outcome = backend.predict(&submission.image, submission.model_id);
        self.complete(submission.ticket, outcome)
    }

    fn leave_submitting(&self, reason: &str) {
        if let Phase::Submitting { ticket, .. } = self.phase {
            tracing::debug!("Ticket {ticket} superseded: {reason}");
        }
    }
}
