mod food_catalog;
mod food_service;

pub use food_catalog::FoodCatalog;
pub use food_service::FoodService;
