pub mod analyze;
pub mod health;

pub use analyze::analyze_food;
pub use health::{health_check, metrics};
