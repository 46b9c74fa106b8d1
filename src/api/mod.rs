//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Student endpoints live under `/api/estudiantes/`; every path keeps its
//! trailing slash.

pub mod dto;
pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use openapi::{ApiDoc, OPENAPI_PATH};

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::routes()).merge(docs_routes())
}

/// Builds the servable application: routes, HTTP middleware and state.
///
/// Requests running longer than `request_timeout` are answered with
/// `408 Request Timeout`.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    build_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(timeout_layer(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Answers `408 Request Timeout` for requests running past `limit`.
fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

#[cfg(feature = "swagger-ui")]
fn docs_routes() -> Router<AppState> {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::routing::get;

    use super::*;

    #[tokio::test]
    async fn slow_requests_time_out_with_408() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(timeout_layer(Duration::from_millis(20)));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let Ok(resp) = reqwest::get(format!("http://{addr}/slow")).await else {
            panic!("request failed");
        };
        assert_eq!(resp.status().as_u16(), 408);
    }
}
