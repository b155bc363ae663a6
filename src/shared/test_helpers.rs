use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use fake::faker::lorem::en::Word;
use fake::Fake;
use uuid::Uuid;

use crate::core::config::GachaConfig;
use crate::features::foods::models::FoodItem;
use crate::features::foods::{self, FoodCatalog, FoodService};
use crate::features::gacha::{self, GachaEngine, GachaService};
use crate::modules::food_store::{FoodStore, InMemoryFoodStore};

/// Food item with the given name, category and active flag
pub fn food(name: &str, category: Option<&str>, is_active: bool) -> FoodItem {
    let now = Utc::now();
    FoodItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        category: category.map(str::to_string),
        tags: vec![],
        weight: 1.0,
        is_active,
        created_at: now,
        updated_at: now,
    }
}

/// Active food item with a random name
pub fn random_food(category: Option<&str>) -> FoodItem {
    let name: String = Word().fake();
    food(&name, category, true)
}

/// Everything the HTTP tests need, wired over an in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryFoodStore>,
    pub catalog: Arc<FoodCatalog>,
    pub gacha: Arc<GachaService>,
}

/// Must be called inside a tokio runtime: the gacha catalog listener is spawned
pub fn test_app(config: GachaConfig) -> TestApp {
    let store = Arc::new(InMemoryFoodStore::new());
    let dyn_store: Arc<dyn FoodStore> = store.clone();
    let catalog = Arc::new(FoodCatalog::new(dyn_store.clone()));
    let food_service = Arc::new(FoodService::new(dyn_store, catalog.clone()));
    let gacha_service = Arc::new(GachaService::new(
        catalog.clone(),
        GachaEngine::new(config),
    ));

    tokio::spawn(gacha_service.clone().run_catalog_listener());

    let router = Router::new()
        .merge(foods::routes::routes(food_service))
        .merge(gacha::routes::routes(gacha_service.clone()));

    TestApp {
        router,
        store,
        catalog,
        gacha: gacha_service,
    }
}
