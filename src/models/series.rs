use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

/// FRED series ids are short uppercase alphanumeric tokens (CPIAUCSL, UNRATE, GDP)
fn series_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[A-Z0-9]{1,30}$").expect("invalid series id pattern"))
}

/// Validated identifier of one economic time series
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeriesId(String);

impl SeriesId {
    /// Accepts only a bare uppercase alphanumeric token; anything else is not an id
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if series_id_pattern().is_match(token) {
            Some(Self(token.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of classifying a user query against the series catalog.
///
/// A failed classification call and a genuine no-match are the same
/// variant; both route to the refusal path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesResolution {
    Resolved(SeriesId),
    Rejected,
}

/// One raw observation; `value` is `None` where the provider reports a gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesObservation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Series metadata as returned by the provider; fallbacks applied downstream
#[derive(Debug, Clone, Default)]
pub struct SeriesInfo {
    pub title: Option<String>,
    pub units: Option<String>,
}

/// Year-over-year movement of a series window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    /// Signed change of the latest observation vs roughly one year earlier
    Annual { delta: f64 },
    Insufficient,
}

impl Trend {
    pub fn describe(&self) -> String {
        match self {
            Trend::Annual { delta } => {
                let direction = if *delta > 0.0 { "up" } else { "down" };
                format!(
                    "The value is {} by {:.2} compared to one year ago.",
                    direction,
                    delta.abs()
                )
            }
            Trend::Insufficient => "Insufficient data to calculate annual trend.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_series_ids() {
        for raw in ["CPIAUCSL", "UNRATE", "GDP", "DGS10", "T10Y2Y"] {
            let id = SeriesId::parse(raw).expect("valid id");
            assert_eq!(id.as_str(), raw);
        }
    }

    #[test]
    fn parse_rejects_non_token_output() {
        assert!(SeriesId::parse("").is_none());
        assert!(SeriesId::parse("cpiaucsl").is_none());
        assert!(SeriesId::parse("CPI AUCSL").is_none());
        assert!(SeriesId::parse("The series is CPIAUCSL").is_none());
        assert!(SeriesId::parse("CPI-AUCSL").is_none());
        assert!(SeriesId::parse(&"A".repeat(31)).is_none());
    }

    #[test]
    fn trend_describe_formats_direction_and_magnitude() {
        assert_eq!(
            Trend::Annual { delta: 0.4 }.describe(),
            "The value is up by 0.40 compared to one year ago."
        );
        assert_eq!(
            Trend::Annual { delta: -1.235 }.describe(),
            "The value is down by 1.23 compared to one year ago."
        );
        assert_eq!(
            Trend::Insufficient.describe(),
            "Insufficient data to calculate annual trend."
        );
    }
}
