//! Analysis payloads returned to the browser client.
//!
//! The model's reply is relayed as an [`AnalysisDocument`]: whatever JSON it
//! produced, unchanged. [`AnalysisResult`] is the shape the prompt asks for
//! and is only used to read the document, never to reject it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Food-combination verdict per Viruddha Ahara (incompatible foods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    Compatible,
    Incompatible,
    Moderate,
}

impl Compatibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compatibility::Compatible => "compatible",
            Compatibility::Incompatible => "incompatible",
            Compatibility::Moderate => "moderate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoshaEffect {
    Increases,
    Decreases,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoshaEffects {
    pub vata: DoshaEffect,
    pub pitta: DoshaEffect,
    pub kapha: DoshaEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub identified_foods: Vec<String>,
    pub compatibility: Compatibility,
    /// 0-100, higher is more compatible.
    pub compatibility_score: f64,
    pub verdict_title: String,
    pub verdict_subtitle: String,
    pub dosha_effects: DoshaEffects,
    pub dosha_notes: String,
    pub ayurveda_analysis: String,
    pub cautions: Vec<String>,
    pub suggestions: Vec<String>,
}

/// The decoded reply, relayed to the client unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisDocument(Value);

impl AnalysisDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Read the document as an [`AnalysisResult`].
    ///
    /// Fails when the model drifted from the requested shape (wrong enum
    /// value, score as a string...). The document itself stays valid.
    pub fn typed(&self) -> Result<AnalysisResult, serde_json::Error> {
        AnalysisResult::deserialize(&self.0)
    }
}
