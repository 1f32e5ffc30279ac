//! Runs prediction requests off the UI thread.

use crate::client::{Prediction, PredictionBackend};
use crate::error::RequestError;
use crate::session::Submission;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Outcome of one submission, tagged with its ticket.
#[derive(Debug)]
pub struct Completed {
    pub ticket: u64,
    pub outcome: Result<Prediction, RequestError>,
}

pub struct PredictionWorker {
    backend: Arc<dyn PredictionBackend>,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
}

impl PredictionWorker {
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { backend, tx, rx }
    }

    /// Start `submission` on its own thread. `on_done` runs on that thread
    /// after the outcome has been queued, e.g. to request a repaint.
    pub fn spawn<F>(&self, submission: Submission, on_done: F) -> Result<(), RequestError>
    where
        F: FnOnce() + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::Builder::new()
            .name(format!("prediction-{}", submission.ticket))
            .spawn(move || {
                let outcome = backend.predict(&submission.image, submission.model_id);
                let completed = Completed {
                    ticket: submission.ticket,
                    outcome,
                };
                if tx.send(completed).is_err() {
                    tracing::debug!("Worker result dropped, receiver gone");
                }
                on_done();
            })
            .map(|_| ())
            .map_err(RequestError::Worker)
    }

    /// Next finished submission, if any.
    pub fn try_recv(&self) -> Option<Completed> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::upload::UploadedImage;
    use std::sync::mpsc::RecvTimeoutError;
    use std::time::Duration;

    struct Echo;

    impl PredictionBackend for Echo {
        fn predict(
            &self,
            image: &UploadedImage,
            model_id: &str,
        ) -> Result<Prediction, RequestError> {
            Ok(Prediction {
                label: format!("{model_id}:{}", image.name()),
                confidence: 0.5,
            })
        }
    }

    #[test]
    fn delivers_outcome_and_notifies() -> anyhow::Result<()> {
        let worker = PredictionWorker::new(Arc::new(Echo));
        let mut session = Session::default();
        session.intake(Ok(UploadedImage::from_bytes("dog.png", "image/png", vec![0u8; 4])?));
        let submission = session.begin_submission().expect("image present");

        let (done_tx, done_rx) = mpsc::channel();
        worker.spawn(submission, move || {
            let _ = done_tx.send(());
        })?;
        match done_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(()) => {}
            Err(RecvTimeoutError::Timeout) => panic!("worker did not finish"),
            Err(RecvTimeoutError::Disconnected) => panic!("worker dropped notifier"),
        }

        let completed = worker.try_recv().expect("outcome queued before notify");
        assert!(session.complete(completed.ticket, completed.outcome));
        assert_eq!(session.prediction().map(|p| p.label.as_str()), Some("resnet:dog.png"));
        assert!(worker.try_recv().is_none());
        Ok(())
    }
}
