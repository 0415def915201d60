use axum::{
    Router, middleware,
    routing::{get, put},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::boundary::{error_boundary, panic_response};
use crate::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// Layer order, outermost first: request tracing, the error boundary, then
/// the panic catcher, so a panicking handler still gets a rendered 500.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/tax",
            get(handlers::get_rate).post(handlers::create_record),
        )
        .route("/api/tax/all", get(handlers::list_records))
        .route(
            "/api/tax/:id",
            put(handlers::replace_record).delete(handlers::delete_record),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(error_boundary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
