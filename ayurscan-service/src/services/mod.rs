pub mod analyzer;
pub mod decode;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use analyzer::{AnalysisError, Analyzer};
pub use decode::{decode_analysis, strip_code_fences, DecodeError};
pub use metrics::{get_metrics, init_metrics};
