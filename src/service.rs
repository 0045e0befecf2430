/// Extraction service client
///
/// The color-extraction algorithm runs in a separate service. The client
/// only knows its request/response contract:
/// - POST multipart form to a fixed endpoint (`image`, `n_colors`,
///   `brightness`, `contrast`, `grayscale`)
/// - JSON answer with either `palette` or `clusters`

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::state::request::ExtractionRequest;
use crate::state::result::{self, ExtractionResult};

#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult, ExtractError>;
}

/// HTTP implementation backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpExtractionService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExtractionService {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("palette-extractor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExtractError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult, ExtractError> {
        debug!(
            endpoint = %self.endpoint,
            file = %request.image.file_name,
            n_colors = request.params.color_count,
            "Posting extraction request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(request.to_form()?)
            .send()
            .await
            .map_err(|e| ExtractError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Extraction service returned an error status");
            return Err(ExtractError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ExtractError::Transport(e.to_string()))?;

        result::decode(&body)
    }
}
