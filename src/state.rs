use std::sync::Arc;

use crate::external::series_provider::SeriesProvider;
use crate::services::llm_service::LlmService;

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<LlmService>,
    pub series_provider: Arc<dyn SeriesProvider>,
}
