#![allow(dead_code)]

use ayurscan_service::config::{AyurscanConfig, GeminiSettings, HttpSettings};
use ayurscan_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config;
use std::time::Duration;

pub const TEST_API_KEY: &str = "test-gemini-key";
pub const TEST_MODEL: &str = "gemini-test";

/// Path the Gemini client posts to for [`TEST_MODEL`].
pub const GENERATE_PATH: &str = "/models/gemini-test:generateContent";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service on a random port, talking to `api_base` as Gemini.
    pub async fn spawn(api_base: &str, api_key: Option<&str>) -> Self {
        let config = AyurscanConfig {
            common: Config { port: 0 },
            gemini: GeminiSettings {
                api_key: api_key.map(|key| Secret::new(key.to_string())),
                model: TEST_MODEL.to_string(),
                api_base: api_base.to_string(),
                timeout: Some(Duration::from_secs(10)),
            },
            http: HttpSettings::default(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_analyze(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/analyze", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A verdict in the shape the prompt asks for.
pub fn sample_analysis() -> serde_json::Value {
    serde_json::json!({
        "identified_foods": ["rice", "moong dal", "ghee"],
        "compatibility": "compatible",
        "compatibility_score": 92,
        "verdict_title": "A classic balanced meal",
        "verdict_subtitle": "Kitchari-style pairing that supports digestion.",
        "dosha_effects": { "vata": "decreases", "pitta": "neutral", "kapha": "neutral" },
        "dosha_notes": "Grounding for Vata without burdening Kapha.",
        "ayurveda_analysis": "Rice with moong dal and ghee is tridoshic and easy to digest.",
        "cautions": [],
        "suggestions": ["Add a pinch of cumin", "Eat it warm"]
    })
}

/// A Gemini success envelope carrying `text` as the reply.
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 512, "candidatesTokenCount": 180 }
    })
}
