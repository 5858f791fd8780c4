// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod books;
pub mod users;

use crate::error::status;
use crate::middleware::auth::require_auth;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, StatusCode};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Covers the 5 MB cover limit plus the text fields around it.
const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

#[derive(Serialize)]
struct NotFoundBody {
    status: &'static str,
    message: &'static str,
}

/// Envelope for unmatched routes.
async fn fallback() -> (StatusCode, Json<NotFoundBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            status: status::ERROR,
            message: "This resource is not available!",
        }),
    )
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let mut public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(users::routes());
    if state.config.expose_user_directory {
        public_routes = public_routes.merge(users::debug_routes());
    }

    // Protected routes (auth required)
    let protected_routes =
        books::routes().route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads/books", ServeDir::new(state.covers.root()))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
