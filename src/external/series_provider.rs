use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{SeriesInfo, SeriesObservation};

#[derive(Debug, Error)]
pub enum SeriesProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("unknown or unavailable series")]
    UnknownSeries,

    #[error("FRED_API_KEY not configured")]
    MissingApiKey,
}

#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Observations from `start` through the present, ascending by date,
    /// gaps preserved as missing values
    async fn fetch_observations(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<SeriesObservation>, SeriesProviderError>;

    async fn fetch_series_info(
        &self,
        series_id: &str,
    ) -> Result<SeriesInfo, SeriesProviderError>;
}
