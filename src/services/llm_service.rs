use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::LlmError;

/// Configuration for the generation service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    /// Process-wide default key; request overrides take precedence
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        config
    }
}

/// Trait for text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from a prompt. Single attempt, no retries;
    /// the caller decides what a failure degrades to.
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError>;
}

/// Gemini generateContent request/response structures
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Gemini provider implementation
pub struct GeminiProvider {
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(model: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        info!("Generating completion (model: {})", self.model);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        for candidate in body.candidates {
            for part in candidate.content.parts {
                let text = part.text.trim();
                if !text.is_empty() {
                    return Ok(text.to_string());
                }
            }
        }

        Err(LlmError::EmptyResponse)
    }
}

/// Generation service holding the provider and the process-wide default key
pub struct LlmService {
    provider: Arc<dyn LlmProvider>,
    default_api_key: Option<String>,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        if config.api_key.is_none() {
            warn!("⚠️ GEMINI_API_KEY not set; requests must supply custom_api_key");
        }

        let provider = GeminiProvider::new(config.model.clone(), config.base_url.clone());

        Self {
            provider: Arc::new(provider),
            default_api_key: config.api_key,
        }
    }

    pub fn with_provider(provider: Arc<dyn LlmProvider>, default_api_key: Option<String>) -> Self {
        Self {
            provider,
            default_api_key,
        }
    }

    /// A non-empty request-scoped override wins over the process default.
    /// Resolved once per request, before any generation call.
    pub fn resolve_credential(&self, override_key: Option<&str>) -> Result<String, LlmError> {
        if let Some(key) = override_key {
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        self.default_api_key
            .clone()
            .ok_or(LlmError::MissingApiKey)
    }

    pub async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        self.provider.generate(prompt, api_key).await
    }
}
