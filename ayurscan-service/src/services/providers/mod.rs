//! Vision provider abstraction.
//!
//! The analyzer talks to a [`VisionProvider`]; Gemini is the production
//! backend and the mock backs unit tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The upstream answered with a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The request never produced a response (DNS, connect, reset, timeout).
    #[error("{0}")]
    Network(String),

    /// A success status whose body is not the expected envelope.
    #[error("{0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::ContentFilter => "content_filter",
            FinishReason::Other => "other",
        }
    }
}

/// Result of a provider call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Text of the first part of the first candidate, if any.
    pub text: Option<String>,

    pub finish_reason: FinishReason,

    pub input_tokens: i32,

    pub output_tokens: i32,
}

/// Generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: i32,
}

impl GenerationParams {
    /// Fixed settings for food analysis: low randomness, room for the full
    /// JSON object.
    pub fn analysis() -> Self {
        Self {
            temperature: 0.4,
            max_output_tokens: 1024,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::analysis()
    }
}

/// Image sent inline with the prompt.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Trait for image + text generation providers (e.g., Gemini).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Send one image and one prompt, wait for the single reply.
    async fn generate(
        &self,
        prompt: &str,
        image: &ImageInput,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Model identifier, for logs and metrics.
    fn model(&self) -> &str;
}
