mod app;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::external::fred::FredProvider;
use crate::external::series_provider::SeriesProvider;
use crate::logging::LoggingConfig;
use crate::services::llm_service::{LlmConfig, LlmService};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env())?;

    let llm = Arc::new(LlmService::new(LlmConfig::from_env()));
    let series_provider: Arc<dyn SeriesProvider> = Arc::new(FredProvider::from_env());

    let state = AppState {
        llm,
        series_provider,
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 fredchat backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
