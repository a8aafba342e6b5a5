//! AyurScan: judges the Ayurvedic compatibility of the foods in a photo by
//! proxying it to the Gemini vision API.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::Application;
