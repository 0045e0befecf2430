/// Hand-off of a settled result from the entry view to the results view
///
/// The payload lives only in memory and is taken exactly once. Nothing here
/// touches disk, so a restart always lands on the entry view.

use tracing::{info, warn};

use super::preview::PreviewHandle;
use super::result::ExtractionResult;
use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Entry,
    Results,
}

/// What the results view needs: the colors and the image they came from
#[derive(Debug)]
pub struct TransferPayload {
    pub result: ExtractionResult,
    pub preview: PreviewHandle,
}

#[derive(Debug, Default)]
pub struct ResultCarrier {
    pending: Option<TransferPayload>,
}

impl ResultCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park the payload for the results view and return where to navigate
    pub fn handoff(&mut self, result: ExtractionResult, preview: PreviewHandle) -> Route {
        info!(colors = result.len(), preview = preview.id(), "Handing result to results view");
        if self
            .pending
            .replace(TransferPayload { result, preview })
            .is_some()
        {
            warn!("Replacing a transfer payload that was never received");
        }
        Route::Results
    }

    /// Take the payload. A second call, or a call without a prior hand-off, fails.
    pub fn receive(&mut self) -> Result<TransferPayload, ExtractError> {
        self.pending
            .take()
            .ok_or(ExtractError::MissingTransferPayload)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
