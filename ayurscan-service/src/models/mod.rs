pub mod analysis;
pub mod request;

pub use analysis::{AnalysisDocument, AnalysisResult, Compatibility, DoshaEffect, DoshaEffects};
pub use request::{AnalysisRequest, AnalyzeRequest, HealthResponse, DEFAULT_MEDIA_TYPE};
