use chrono::{Months, NaiveDate, Utc};
use tracing::info;

use crate::external::series_provider::{SeriesProvider, SeriesProviderError};
use crate::models::{
    ChartData, ChartDataset, ChartMeta, ChartPayload, SeriesId, SeriesObservation, Trend,
};

const WINDOW_YEARS: u32 = 10;

/// A fetched observation window plus resolved display metadata.
///
/// `observations` is the raw window, gaps included; trend math reads it
/// directly. The chart projection is a separately derived, pairwise-filtered
/// copy; nothing filters the raw window in place.
pub struct FetchedSeries {
    pub id: SeriesId,
    pub title: String,
    pub units: String,
    pub observations: Vec<SeriesObservation>,
}

/// Retrieve the trailing ten-year window and metadata for a series
pub async fn fetch_series(
    provider: &dyn SeriesProvider,
    id: &SeriesId,
) -> Result<FetchedSeries, SeriesProviderError> {
    let start = window_start(Utc::now().date_naive());

    let observations = provider.fetch_observations(id.as_str(), start).await?;
    let info = provider.fetch_series_info(id.as_str()).await?;

    info!("Fetched {} observations for {}", observations.len(), id);

    Ok(FetchedSeries {
        title: info.title.unwrap_or_else(|| id.as_str().to_string()),
        units: info.units.unwrap_or_else(|| "Value".to_string()),
        id: id.clone(),
        observations,
    })
}

fn window_start(today: NaiveDate) -> NaiveDate {
    today - Months::new(12 * WINDOW_YEARS)
}

impl FetchedSeries {
    /// Latest observation vs the one roughly a year earlier.
    ///
    /// The comparison point is chosen by elapsed calendar time: the latest
    /// observation dated at or before one year before the last, whatever the
    /// series cadence. A gap at either endpoint reads as insufficient data.
    pub fn annual_trend(&self) -> Trend {
        annual_trend(&self.observations)
    }

    /// Chart projection: (label, value) pairs with gaps dropped pairwise
    pub fn chart_points(&self) -> (Vec<String>, Vec<f64>) {
        self.observations
            .iter()
            .filter_map(|obs| {
                obs.value
                    .map(|v| (obs.date.format("%Y-%m-%d").to_string(), v))
            })
            .unzip()
    }

    /// Last plottable (date, value) pair, skipping trailing gaps
    pub fn latest_point(&self) -> Option<(NaiveDate, f64)> {
        self.observations
            .iter()
            .rev()
            .find_map(|obs| obs.value.map(|v| (obs.date, v)))
    }

    /// `None` when the window holds no plottable observation
    pub fn chart_payload(&self) -> Option<ChartPayload> {
        let (labels, values) = self.chart_points();
        if labels.is_empty() {
            return None;
        }

        Some(ChartPayload {
            chart_data: ChartData {
                labels,
                datasets: vec![ChartDataset::line(self.title.clone(), values)],
            },
            meta: ChartMeta {
                title: self.title.clone(),
                units: self.units.clone(),
                source_link: format!("https://fred.stlouisfed.org/series/{}", self.id),
                series_id: self.id.as_str().to_string(),
            },
        })
    }
}

pub fn annual_trend(observations: &[SeriesObservation]) -> Trend {
    if observations.len() <= 12 {
        return Trend::Insufficient;
    }

    let last = observations[observations.len() - 1];
    let Some(latest) = last.value else {
        return Trend::Insufficient;
    };

    let target = last.date - Months::new(12);
    let year_ago = observations
        .iter()
        .rev()
        .find(|obs| obs.date <= target)
        .and_then(|obs| obs.value);

    match year_ago {
        Some(prior) => Trend::Annual {
            delta: latest - prior,
        },
        None => Trend::Insufficient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    fn monthly(from: &str, values: &[f64]) -> Vec<SeriesObservation> {
        let start = date(from);
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| SeriesObservation {
                date: start + Months::new(i as u32),
                value: Some(v),
            })
            .collect()
    }

    fn series(observations: Vec<SeriesObservation>) -> FetchedSeries {
        FetchedSeries {
            id: SeriesId::parse("UNRATE").expect("id"),
            title: "Unemployment Rate".to_string(),
            units: "Percent".to_string(),
            observations,
        }
    }

    #[test]
    fn window_start_is_ten_years_back() {
        assert_eq!(window_start(date("2026-08-05")), date("2016-08-05"));
    }

    #[test]
    fn trend_compares_against_year_ago_observation() {
        // 25 monthly points 3.0..=5.4; a year before the last (5.4) is 4.2
        let values: Vec<f64> = (0..25).map(|i| 3.0 + 0.1 * i as f64).collect();
        let observations = monthly("2024-01-01", &values);

        let Trend::Annual { delta } = annual_trend(&observations) else {
            panic!("expected annual trend");
        };
        assert!((delta - 1.2).abs() < 1e-9);
        assert!(annual_trend(&observations).describe().contains("up by 1.20"));
    }

    #[test]
    fn trend_reports_downward_movement() {
        let values: Vec<f64> = (0..25).map(|i| 10.0 - 0.2 * i as f64).collect();
        let observations = monthly("2024-01-01", &values);

        let description = annual_trend(&observations).describe();
        assert!(description.contains("down by 2.40"), "{description}");
    }

    #[test]
    fn trend_requires_more_than_twelve_observations() {
        let values: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let observations = monthly("2025-01-01", &values);
        assert_eq!(annual_trend(&observations), Trend::Insufficient);
    }

    #[test]
    fn trend_is_insufficient_when_an_endpoint_is_a_gap() {
        let mut observations = monthly("2024-01-01", &(0..25).map(|i| i as f64).collect::<Vec<_>>());
        observations.last_mut().expect("non-empty").value = None;
        assert_eq!(annual_trend(&observations), Trend::Insufficient);

        let mut observations = monthly("2024-01-01", &(0..25).map(|i| i as f64).collect::<Vec<_>>());
        observations[12].value = None; // the year-ago point for a 25-long monthly window
        assert_eq!(annual_trend(&observations), Trend::Insufficient);
    }

    #[test]
    fn trend_ignores_gaps_away_from_the_endpoints() {
        let values: Vec<f64> = (0..25).map(|i| 3.0 + 0.1 * i as f64).collect();
        let mut observations = monthly("2024-01-01", &values);
        observations[3].value = None;
        observations[20].value = None;

        let Trend::Annual { delta } = annual_trend(&observations) else {
            panic!("expected annual trend");
        };
        assert!((delta - 1.2).abs() < 1e-9);
    }

    #[test]
    fn chart_points_drop_gaps_pairwise() {
        let mut observations = monthly("2025-01-01", &[1.0, 2.0, 3.0, 4.0]);
        observations[1].value = None;

        let fetched = series(observations);
        let (labels, values) = fetched.chart_points();

        assert_eq!(labels, vec!["2025-01-01", "2025-03-01", "2025-04-01"]);
        assert_eq!(values, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn latest_point_skips_trailing_gaps() {
        let mut observations = monthly("2025-01-01", &[1.0, 2.0, 3.0]);
        observations[2].value = None;

        let fetched = series(observations);
        let (last_date, last_value) = fetched.latest_point().expect("point");
        assert_eq!(last_date, date("2025-02-01"));
        assert_eq!(last_value, 2.0);
    }

    #[test]
    fn chart_payload_carries_meta_and_aligned_series() {
        let fetched = series(monthly("2025-01-01", &[3.7, 3.8, 3.9]));
        let payload = fetched.chart_payload().expect("payload");

        assert_eq!(payload.chart_data.labels.len(), 3);
        assert_eq!(payload.chart_data.datasets.len(), 1);
        assert_eq!(payload.chart_data.datasets[0].data.len(), 3);
        assert_eq!(payload.chart_data.datasets[0].label, "Unemployment Rate");
        assert_eq!(payload.meta.series_id, "UNRATE");
        assert_eq!(payload.meta.units, "Percent");
        assert_eq!(
            payload.meta.source_link,
            "https://fred.stlouisfed.org/series/UNRATE"
        );
    }

    #[test]
    fn chart_payload_absent_when_every_value_is_a_gap() {
        let observations = vec![
            SeriesObservation {
                date: date("2025-01-01"),
                value: None,
            },
            SeriesObservation {
                date: date("2025-02-01"),
                value: None,
            },
        ];
        assert!(series(observations).chart_payload().is_none());
    }
}
