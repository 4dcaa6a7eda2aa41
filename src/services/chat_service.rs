use tracing::{error, info};

use crate::models::{ChatRequest, ChatResponse, SeriesId, SeriesResolution};
use crate::services::analysis_service::{self, AnalysisContext};
use crate::services::{resolver_service, series_service};
use crate::state::AppState;

pub const EMPTY_QUERY_RESPONSE: &str = "Please enter a valid query.";

pub const MISSING_CREDENTIAL_RESPONSE: &str =
    "No Gemini API key is configured. Set GEMINI_API_KEY on the server or supply custom_api_key with your request.";

/// Run the full query pipeline: resolve, fetch, narrate.
///
/// Every failure mode collapses into a well-formed response; this function
/// does not error.
pub async fn answer(state: &AppState, request: ChatRequest) -> ChatResponse {
    let message = request.message.trim();
    if message.is_empty() {
        return ChatResponse::text_only(EMPTY_QUERY_RESPONSE);
    }

    // Resolved once, used for both generation calls of this request
    let api_key = match state.llm.resolve_credential(request.custom_api_key.as_deref()) {
        Ok(key) => key,
        Err(e) => {
            error!("No usable generation credential: {}", e);
            return ChatResponse::text_only(MISSING_CREDENTIAL_RESPONSE);
        }
    };

    let series_id = match resolver_service::resolve(&state.llm, &api_key, message).await {
        SeriesResolution::Resolved(id) => id,
        SeriesResolution::Rejected => {
            info!("Query rejected by classifier, composing refusal");
            let text = analysis_service::compose_refusal(&state.llm, &api_key, message).await;
            return ChatResponse::text_only(text);
        }
    };

    let series =
        match series_service::fetch_series(state.series_provider.as_ref(), &series_id).await {
            Ok(series) => series,
            Err(e) => {
                error!("Data fetch failed for {}: {}", series_id, e);
                return ChatResponse::text_only(data_unavailable_message(&series_id));
            }
        };

    let trend = series.annual_trend();

    let (payload, latest) = match (series.chart_payload(), series.latest_point()) {
        (Some(payload), Some(latest)) => (payload, latest),
        _ => {
            error!("Series {} returned no plottable observations", series_id);
            return ChatResponse::text_only(data_unavailable_message(&series_id));
        }
    };

    let (last_date, latest_value) = latest;
    let last_date = last_date.format("%Y-%m-%d").to_string();
    let trend_description = trend.describe();

    let ctx = AnalysisContext {
        series_title: &series.title,
        latest_value,
        units: &series.units,
        last_date: &last_date,
        trend_description: &trend_description,
    };

    let narrative =
        analysis_service::compose_analysis(&state.llm, &api_key, message, &ctx, request.mode).await;

    ChatResponse {
        response: narrative,
        chart_data: Some(payload),
    }
}

fn data_unavailable_message(id: &SeriesId) -> String {
    format!(
        "I found the series ID '{}' but couldn't retrieve the data. It might be discontinued or strictly copyrighted.",
        id
    )
}
