mod chart;
mod chat;
mod series;

pub use chart::{ChartData, ChartDataset, ChartMeta, ChartPayload};
pub use chat::{AudienceMode, ChatRequest, ChatResponse};
pub use series::{SeriesId, SeriesInfo, SeriesObservation, SeriesResolution, Trend};
