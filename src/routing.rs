//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::{
    AppState, TableStore, endpoints, get_summary, logging::logging_middleware,
    not_found::get_404_not_found, upload_csv,
};

/// The largest upload accepted when no other limit is configured, 10 MiB.
pub const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: TableStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::UPLOAD, post(upload_csv::<S>))
        .route(endpoints::SUMMARY, get(get_summary::<S>))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(DefaultBodyLimit::max(state.upload_limit))
        .with_state(state)
}
