use serde::Serialize;

/// Chart.js line-chart payload consumed by the web front end.
///
/// `labels` and the dataset's `data` are always the same length and
/// index-aligned; gaps are dropped pairwise before this is built.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    pub chart_data: ChartData,
    pub meta: ChartMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Style attributes are fixed constants; only label and data vary per series
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub border_width: u32,
    pub point_radius: u32,
    pub point_hover_radius: u32,
    pub fill: bool,
    pub tension: f64,
}

impl ChartDataset {
    pub fn line(label: String, data: Vec<f64>) -> Self {
        Self {
            label,
            data,
            border_color: "#2563eb",
            background_color: "rgba(37, 99, 235, 0.1)",
            border_width: 2,
            point_radius: 0,
            point_hover_radius: 4,
            fill: true,
            tension: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartMeta {
    pub title: String,
    pub units: String,
    pub source_link: String,
    pub series_id: String,
}
