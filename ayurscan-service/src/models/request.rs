use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

/// Media type assumed when the client does not send one.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

pub const IMAGE_REQUIRED: &str = "imageBase64 is required";

/// Body of `POST /api/analyze`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    #[validate(
        required(message = "imageBase64 is required"),
        length(min = 1, message = "imageBase64 is required")
    )]
    pub image_base64: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub media_type: Option<String>,
}

/// Any non-string value (`null`, `false`, `0`, objects...) reads as absent,
/// so a bad field fails validation instead of deserialization.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Validated input to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Base64 image bytes, forwarded verbatim.
    pub image_data: String,
    pub media_type: String,
}

impl AnalysisRequest {
    /// An empty or missing media type falls back to [`DEFAULT_MEDIA_TYPE`].
    pub fn new(image_data: impl Into<String>, media_type: Option<String>) -> Self {
        Self {
            image_data: image_data.into(),
            media_type: media_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
        }
    }
}

impl TryFrom<AnalyzeRequest> for AnalysisRequest {
    type Error = validator::ValidationErrors;

    fn try_from(req: AnalyzeRequest) -> Result<Self, Self::Error> {
        req.validate()?;
        let image = req.image_base64.unwrap_or_default();
        Ok(AnalysisRequest::new(image, req.media_type))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub has_key: bool,
}
