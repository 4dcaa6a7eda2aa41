use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{chat, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/chat", chat::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::NaiveDate;
    use tower::ServiceExt;

    use crate::errors::LlmError;
    use crate::external::series_provider::{SeriesProvider, SeriesProviderError};
    use crate::models::{SeriesInfo, SeriesObservation};
    use crate::services::llm_service::{LlmProvider, LlmService};

    struct UnreachableLlm;

    #[async_trait]
    impl LlmProvider for UnreachableLlm {
        async fn generate(&self, _prompt: &str, _api_key: &str) -> Result<String, LlmError> {
            panic!("generation service must not be called");
        }
    }

    struct UnreachableSeriesProvider;

    #[async_trait]
    impl SeriesProvider for UnreachableSeriesProvider {
        async fn fetch_observations(
            &self,
            _series_id: &str,
            _start: NaiveDate,
        ) -> Result<Vec<SeriesObservation>, SeriesProviderError> {
            panic!("data provider must not be called");
        }

        async fn fetch_series_info(
            &self,
            _series_id: &str,
        ) -> Result<SeriesInfo, SeriesProviderError> {
            panic!("data provider must not be called");
        }
    }

    fn test_app() -> Router {
        create_app(AppState {
            llm: Arc::new(LlmService::with_provider(
                Arc::new(UnreachableLlm),
                Some("default-key".to_string()),
            )),
            series_provider: Arc::new(UnreachableSeriesProvider),
        })
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_endpoint_short_circuits_blank_or_missing_message() {
        for body in [r#"{"message": ""}"#, "{}"] {
            let request = Request::post("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request");

            let response = test_app().oneshot(request).await.expect("response");
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body");
            let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

            assert_eq!(json["response"], "Please enter a valid query.");
            assert!(json.get("chart_data").is_none());
        }
    }
}
