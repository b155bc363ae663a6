use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::foods::handlers;
use crate::features::foods::services::FoodService;

/// Create routes for the foods feature
pub fn routes(service: Arc<FoodService>) -> Router {
    Router::new()
        .route(
            "/items",
            get(handlers::list_foods).post(handlers::create_food),
        )
        .route(
            "/items/{id}",
            get(handlers::get_food)
                .put(handlers::update_food)
                .delete(handlers::delete_food),
        )
        .with_state(service)
}
