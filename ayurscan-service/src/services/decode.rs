//! Second-layer decode: the model's text reply into an [`AnalysisDocument`].

use crate::models::AnalysisDocument;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Markdown fences the model wraps around JSON despite being told not to.
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json|```").expect("code fence pattern is valid"));

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Remove every "```json" and "```" marker, wherever it appears, then trim.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Strip fences and parse. Any JSON value is accepted; no schema check.
pub fn decode_analysis(text: &str) -> Result<AnalysisDocument, DecodeError> {
    let clean = strip_code_fences(text);
    let value = serde_json::from_str(&clean)?;
    Ok(AnalysisDocument::new(value))
}
