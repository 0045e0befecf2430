/// Submission lifecycle
///
/// Idle --submit--> InFlight --settle--> Succeeded | Failed --submit--> InFlight ...
///
/// At most one submission is InFlight at a time. `submit` hands back a
/// `Dispatch` future that performs the single network call; its outcome comes
/// back through `settle`, tagged with the generation it was started for so a
/// late answer for an aborted submission can never overwrite newer state.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::request::ExtractionRequest;
use super::result::ExtractionResult;
use crate::error::ExtractError;
use crate::service::ExtractionService;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(ExtractionResult),
    Failed(ExtractError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitRejected {
    #[error("An extraction is already running")]
    AlreadyInFlight,
    #[error("{0}")]
    Invalid(ExtractError),
}

/// Outcome of one dispatched request
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub generation: u64,
    pub outcome: Result<ExtractionResult, ExtractError>,
}

/// The one network call of a submission, bounded by a timeout and an abort signal
pub struct Dispatch {
    generation: u64,
    request: ExtractionRequest,
    service: Arc<dyn ExtractionService>,
    timeout: Duration,
    abort: oneshot::Receiver<()>,
}

impl Dispatch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn run(self) -> Settlement {
        let Dispatch {
            generation,
            request,
            service,
            timeout,
            abort,
        } = self;

        debug!(generation, ?timeout, "Dispatching extraction request");

        // A dropped sender means the controller settled without aborting,
        // so only an explicit send cancels.
        let outcome = tokio::select! {
            Ok(()) = abort => Err(ExtractError::Cancelled),
            result = tokio::time::timeout(timeout, service.extract(&request)) => match result {
                Ok(outcome) => outcome,
                Err(_) => Err(ExtractError::Timeout(timeout)),
            },
        };

        Settlement {
            generation,
            outcome,
        }
    }
}

/// Owns the state of the single extraction pipeline
pub struct SubmissionController {
    state: SubmissionState,
    service: Arc<dyn ExtractionService>,
    timeout: Duration,
    generation: u64,
    abort: Option<oneshot::Sender<()>>,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn ExtractionService>, timeout: Duration) -> Self {
        Self {
            state: SubmissionState::Idle,
            service,
            timeout,
            generation: 0,
            abort: None,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, SubmissionState::InFlight)
    }

    /// Start a submission.
    ///
    /// Refused without any state change if one is already in flight or the
    /// request could not be built.
    pub fn submit(
        &mut self,
        request: Result<ExtractionRequest, ExtractError>,
    ) -> Result<Dispatch, SubmitRejected> {
        if self.is_in_flight() {
            warn!(generation = self.generation, "Submit ignored, extraction already in flight");
            return Err(SubmitRejected::AlreadyInFlight);
        }

        let request = request.map_err(|e| {
            debug!(reason = %e, "Submit refused");
            SubmitRejected::Invalid(e)
        })?;

        self.generation += 1;
        let (abort_tx, abort_rx) = oneshot::channel();
        self.abort = Some(abort_tx);
        self.state = SubmissionState::InFlight;

        info!(
            generation = self.generation,
            file = %request.image.file_name,
            n_colors = request.params.color_count,
            "Extraction started"
        );

        Ok(Dispatch {
            generation: self.generation,
            request,
            service: Arc::clone(&self.service),
            timeout: self.timeout,
            abort: abort_rx,
        })
    }

    /// Apply a dispatch outcome.
    ///
    /// Returns the result when the current submission succeeded. Outcomes of
    /// superseded or aborted generations are dropped.
    pub fn settle(&mut self, settlement: Settlement) -> Option<&ExtractionResult> {
        if !self.is_in_flight() || settlement.generation != self.generation {
            debug!(
                generation = settlement.generation,
                current = self.generation,
                "Dropping stale settlement"
            );
            return None;
        }

        self.abort = None;

        match settlement.outcome {
            Ok(result) => {
                info!(generation = self.generation, colors = result.len(), "Extraction succeeded");
                self.state = SubmissionState::Succeeded(result);
            }
            Err(e) => {
                error!(generation = self.generation, error = %e, "Extraction failed");
                self.state = SubmissionState::Failed(e);
            }
        }

        match &self.state {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Cancel the in-flight submission, if any.
    ///
    /// Settles immediately to `Failed(Cancelled)` so the input lock is lifted
    /// without waiting for the network.
    pub fn abort(&mut self) -> bool {
        if !self.is_in_flight() {
            return false;
        }

        if let Some(abort) = self.abort.take() {
            // The dispatch may already have finished; nothing to cancel then.
            let _ = abort.send(());
        }

        warn!(generation = self.generation, "Extraction aborted");
        self.state = SubmissionState::Failed(ExtractError::Cancelled);
        true
    }
}
