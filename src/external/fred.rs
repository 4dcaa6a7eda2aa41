use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::external::series_provider::{SeriesProvider, SeriesProviderError};
use crate::models::{SeriesInfo, SeriesObservation};

pub struct FredProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl FredProvider {
    /// Missing FRED_API_KEY is a startup warning, not a failure; the
    /// service runs but every fetch errors with MissingApiKey.
    pub fn from_env() -> Self {
        let api_key = std::env::var("FRED_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        if api_key.is_none() {
            warn!("⚠️ FRED_API_KEY not set; series fetches will fail");
        }

        Self::new(api_key, "https://api.stlouisfed.org")
    }

    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn key(&self) -> Result<&str, SeriesProviderError> {
        self.api_key
            .as_deref()
            .ok_or(SeriesProviderError::MissingApiKey)
    }
}

#[derive(Debug, Deserialize)]
struct FredObservationsResponse {
    observations: Option<Vec<FredObservation>>,

    // On failure FRED returns e.g.
    // { "error_code": 400, "error_message": "Bad Request. The series does not exist." }
    error_code: Option<u16>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct FredSeriesResponse {
    seriess: Option<Vec<FredSeriesEntry>>,
    error_code: Option<u16>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FredSeriesEntry {
    title: Option<String>,
    units: Option<String>,
}

/// FRED reports gaps in a series as the literal value "."
fn parse_observation_value(raw: &str) -> Result<Option<f64>, SeriesProviderError> {
    if raw == "." {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| SeriesProviderError::Parse(e.to_string()))
}

fn classify_fred_error(code: Option<u16>, message: String) -> SeriesProviderError {
    match code {
        Some(429) => SeriesProviderError::RateLimited,
        Some(400) if message.contains("does not exist") => SeriesProviderError::UnknownSeries,
        _ => SeriesProviderError::BadResponse(message),
    }
}

#[async_trait]
impl SeriesProvider for FredProvider {
    async fn fetch_observations(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<SeriesObservation>, SeriesProviderError> {
        let api_key = self.key()?;
        let url = format!("{}/fred/series/observations", self.base_url);
        let start_str = start.format("%Y-%m-%d").to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key),
                ("file_type", "json"),
                ("observation_start", start_str.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SeriesProviderError::Network(e.to_string()))?;

        let body: FredObservationsResponse = resp
            .json()
            .await
            .map_err(|e| SeriesProviderError::Parse(e.to_string()))?;

        if let Some(message) = body.error_message {
            return Err(classify_fred_error(body.error_code, message));
        }

        let observations = body
            .observations
            .ok_or_else(|| SeriesProviderError::BadResponse("missing observations".into()))?;

        observations
            .into_iter()
            .map(|obs| {
                let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                    .map_err(|e| SeriesProviderError::Parse(e.to_string()))?;
                let value = parse_observation_value(&obs.value)?;
                Ok(SeriesObservation { date, value })
            })
            .collect()
    }

    async fn fetch_series_info(
        &self,
        series_id: &str,
    ) -> Result<SeriesInfo, SeriesProviderError> {
        let api_key = self.key()?;
        let url = format!("{}/fred/series", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key),
                ("file_type", "json"),
            ])
            .send()
            .await
            .map_err(|e| SeriesProviderError::Network(e.to_string()))?;

        let body: FredSeriesResponse = resp
            .json()
            .await
            .map_err(|e| SeriesProviderError::Parse(e.to_string()))?;

        if let Some(message) = body.error_message {
            return Err(classify_fred_error(body.error_code, message));
        }

        let entry = body
            .seriess
            .and_then(|mut entries| {
                if entries.is_empty() {
                    None
                } else {
                    Some(entries.remove(0))
                }
            })
            .ok_or(SeriesProviderError::UnknownSeries)?;

        Ok(SeriesInfo {
            title: entry.title,
            units: entry.units,
        })
    }
}
