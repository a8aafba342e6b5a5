//! The analysis proxy: image in, decoded verdict out.

use crate::models::request::IMAGE_REQUIRED;
use crate::models::{AnalysisDocument, AnalysisRequest};
use crate::services::decode::{decode_analysis, DecodeError};
use crate::services::prompt::build_analysis_prompt;
use crate::services::providers::{GenerationParams, ImageInput, ProviderError, VisionProvider};
use axum::http::StatusCode;
use metrics::{counter, histogram};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

pub const MISSING_CREDENTIAL: &str = "GEMINI_API_KEY not set on server";
pub const EMPTY_RESPONSE: &str = "Empty response from Gemini";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{}", MISSING_CREDENTIAL)]
    MissingCredential,

    #[error("{}", IMAGE_REQUIRED)]
    MissingImage,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("{}", EMPTY_RESPONSE)]
    EmptyResponse,

    #[error("{0}")]
    Malformed(#[from] DecodeError),
}

impl AnalysisError {
    /// Short label for the `outcome` metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            AnalysisError::MissingCredential => "missing_credential",
            AnalysisError::MissingImage => "missing_image",
            AnalysisError::Upstream { .. } => "upstream_error",
            AnalysisError::Transport(_) => "transport_error",
            AnalysisError::EmptyResponse => "empty_response",
            AnalysisError::Malformed(_) => "malformed_response",
        }
    }
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { status, message } => {
                AnalysisError::Upstream { status, message }
            }
            ProviderError::Network(msg) | ProviderError::InvalidResponse(msg) => {
                AnalysisError::Transport(msg)
            }
            err @ ProviderError::NotConfigured(_) => AnalysisError::Transport(err.to_string()),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::MissingImage => AppError::BadRequest(anyhow::anyhow!(err)),
            AnalysisError::MissingCredential => AppError::ConfigError(anyhow::anyhow!(err)),
            AnalysisError::Upstream { status, message } => AppError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            AnalysisError::Transport(_)
            | AnalysisError::EmptyResponse
            | AnalysisError::Malformed(_) => AppError::InternalError(anyhow::anyhow!(err)),
        }
    }
}

/// Stateless analysis service. `provider` is `None` when no credential was
/// configured at startup.
pub struct Analyzer {
    provider: Option<Arc<dyn VisionProvider>>,
    params: GenerationParams,
}

impl Analyzer {
    pub fn new(provider: Option<Arc<dyn VisionProvider>>) -> Self {
        Self {
            provider,
            params: GenerationParams::analysis(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&Arc<dyn VisionProvider>, AnalysisError> {
        self.provider.as_ref().ok_or(AnalysisError::MissingCredential)
    }

    /// Fail fast when no credential is configured.
    pub fn ensure_configured(&self) -> Result<(), AnalysisError> {
        self.provider().map(|_| ())
    }

    pub async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisDocument, AnalysisError> {
        let result = self.run(request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        counter!("ayurscan_analyses_total", "outcome" => outcome).increment(1);

        result
    }

    async fn run(&self, request: AnalysisRequest) -> Result<AnalysisDocument, AnalysisError> {
        let provider = self.provider()?;

        if request.image_data.is_empty() {
            return Err(AnalysisError::MissingImage);
        }

        let image = ImageInput {
            mime_type: request.media_type,
            data: request.image_data,
        };

        let start = Instant::now();
        let response = provider
            .generate(build_analysis_prompt(), &image, &self.params)
            .await;
        histogram!("ayurscan_upstream_duration_seconds", "model" => provider.model().to_string())
            .record(start.elapsed().as_secs_f64());

        let response = response?;

        tracing::info!(
            model = %provider.model(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = response.finish_reason.as_str(),
            "Gemini analysis received"
        );

        let text = response
            .text
            .filter(|t| !t.is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        let document = decode_analysis(&text)?;

        match document.typed() {
            Ok(result) => tracing::info!(
                compatibility = result.compatibility.as_str(),
                score = result.compatibility_score,
                foods = result.identified_foods.len(),
                "Analysis decoded"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "Analysis does not match the requested shape; relaying as is"
            ),
        }

        Ok(document)
    }
}
