use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::gacha::handlers;
use crate::features::gacha::services::GachaService;

/// Create routes for the gacha feature
pub fn routes(service: Arc<GachaService>) -> Router {
    Router::new()
        .route("/api/gacha", get(handlers::get_state))
        .route("/api/gacha/categories", get(handlers::list_categories))
        .route("/api/gacha/eligible", get(handlers::list_eligible))
        .route("/api/gacha/category", put(handlers::set_category))
        .route("/api/gacha/spin", post(handlers::spin))
        .route("/api/gacha/cancel", post(handlers::cancel))
        .route("/api/gacha/stream", get(handlers::stream))
        .with_state(service)
}
