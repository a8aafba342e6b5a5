//! Mock provider implementation for testing.

use super::{
    FinishReason, GenerationParams, ImageInput, ProviderError, ProviderResponse, VisionProvider,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// One recorded `generate` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub mime_type: String,
    pub data: String,
    pub params: GenerationParams,
}

/// Mock vision provider that replays a canned outcome and records calls.
pub struct MockVisionProvider {
    outcome: Result<Option<String>, ProviderError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockVisionProvider {
    /// Reply with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(Some(text.into())))
    }

    /// Reply with a candidate that has no text part.
    pub fn without_text() -> Self {
        Self::with_outcome(Ok(None))
    }

    /// Fail every call with the given error.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<Option<String>, ProviderError>) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn generate(
        &self,
        prompt: &str,
        image: &ImageInput,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
                params: params.clone(),
            });
        }

        let text = self.outcome.clone()?;

        Ok(ProviderResponse {
            output_tokens: text.as_ref().map(|t| t.len() as i32 / 4).unwrap_or(0),
            text,
            finish_reason: FinishReason::Complete,
            input_tokens: prompt.len() as i32 / 4,
        })
    }

    fn model(&self) -> &str {
        "mock-vision"
    }
}
