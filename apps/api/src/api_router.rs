use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get};
use myrun_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;


pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    max_upload_bytes: usize,
) -> Result<Router, AppError> {
    let run_routes = Router::new()
        .route(
            "/api/runs",
            get(handlers::runs::list_runs_handler).post(handlers::runs::create_run_handler),
        )
        .route(
            "/api/runs/{run_id}",
            delete(handlers::runs::delete_run_handler),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(run_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
