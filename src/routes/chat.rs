use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::models::{ChatRequest, ChatResponse};
use crate::services::chat_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

/// POST /api/chat
///
/// Ask a question about a US economic indicator.
///
/// Request body:
/// {
///   "message": "What is inflation right now?",
///   "mode": "novice" | "experienced" (optional, default experienced),
///   "custom_api_key": "..." (optional, request-scoped Gemini key)
/// }
///
/// Returns: ChatResponse with the narrative text and, for resolved
/// queries, a Chart.js payload. Always 200; failures degrade to text.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!("POST /api/chat - mode: {}", request.mode);
    Json(chat_service::answer(&state, request).await)
}
