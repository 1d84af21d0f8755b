use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all Drover endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route(
            "/v1/ranches",
            post(handler::create_ranch).get(handler::list_ranches),
        )
        .route("/v1/ranches/:id/inventory", get(handler::inventory))
        .route("/v1/ranches/:id/rollup", get(handler::ranch_rollup))
        .route("/v1/calves", post(handler::admit_calf))
        .route("/v1/calves/batch", post(handler::admit_batch))
        .route("/v1/calves/:id/history", get(handler::movement_history))
        .route("/v1/loads", post(handler::create_load))
        .route(
            "/v1/loads/:load/calves/:calf/arrival",
            patch(handler::set_arrival_status),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
