use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Gemini API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for image analysis.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Directory holding the browser client, anchored to this crate so the
/// server finds it whatever the working directory.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

/// Largest accepted request body (20 MiB), enough for a base64-encoded photo.
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AyurscanConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// `None` when `GEMINI_API_KEY` is unset or empty. The service still
    /// starts, but every analysis is refused.
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub api_base: String,
    /// Upstream request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl GeminiSettings {
    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl AyurscanConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(AyurscanConfig {
            common,
            gemini: GeminiSettings {
                api_key: env::var("GEMINI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .map(Secret::new),
                model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
                timeout: parse_env::<u64>("GEMINI_TIMEOUT_SECS")?.map(Duration::from_secs),
            },
            http: HttpSettings {
                static_dir: PathBuf::from(env_or("STATIC_DIR", DEFAULT_STATIC_DIR)),
                max_body_bytes: parse_env("MAX_BODY_BYTES")?.unwrap_or(DEFAULT_MAX_BODY_BYTES),
            },
        })
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: None,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(key, &raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
    })
}
