mod error;
mod rest;
mod types;

pub use error::{ApiError, ApiResult, BODY_TOO_LONG, NOT_FOUND_BODY};
pub use rest::{proxy_target, AppState, RestApi};
pub use types::*;

use crate::config::ServerConfig;
use crate::metrics::metrics_route;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Create the complete relay server router
pub fn create_api_server(state: AppState, config: &ServerConfig) -> Router {
    let rest_api = RestApi::new(state);

    let mut router = rest_api.router();

    if config.metrics_enabled {
        router = router.route("/metrics", metrics_route());
    }

    // Access log for every request
    router = router.layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        ),
    );

    if config.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
}
