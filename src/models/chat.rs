use serde::{Deserialize, Serialize};

use crate::models::ChartPayload;

/// Narrative register the composer targets
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudienceMode {
    Novice,
    #[default]
    Experienced,
}

impl std::fmt::Display for AudienceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudienceMode::Novice => write!(f, "novice"),
            AudienceMode::Experienced => write!(f, "experienced"),
        }
    }
}

/// User's question about an economic indicator
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// A missing message reads as empty and short-circuits the pipeline
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub mode: AudienceMode,
    /// Request-scoped Gemini key; takes precedence over the process default
    #[serde(default)]
    pub custom_api_key: Option<String>,
}

/// Narrative plus, for resolved queries, a chart-ready payload
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartPayload>,
}

impl ChatResponse {
    pub fn text_only(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            chart_data: None,
        }
    }
}
