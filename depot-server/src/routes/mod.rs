use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::state::AppState;

mod analytics;
mod files;
mod health;

/// Cap on a multipart request body.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(files::routes())
        .merge(analytics::routes())
        .with_state(state)
        .merge(health::routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}
