//! Storage backends for the food collection
//!
//! The rest of the crate only sees the [`FoodStore`] trait. `PgFoodStore`
//! is used in production, `InMemoryFoodStore` for local runs and tests.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::foods::models::{FoodFields, FoodItem};

pub use memory::InMemoryFoodStore;
pub use postgres::PgFoodStore;

#[async_trait]
pub trait FoodStore: Send + Sync {
    /// All items, newest first
    async fn list_all(&self) -> Result<Vec<FoodItem>>;

    async fn get(&self, id: Uuid) -> Result<Option<FoodItem>>;

    async fn create(&self, fields: FoodFields) -> Result<FoodItem>;

    /// Replace every mutable field. `None` when `id` does not exist.
    async fn update(&self, id: Uuid, fields: FoodFields) -> Result<Option<FoodItem>>;

    /// Deleting a missing id is not an error
    async fn delete(&self, id: Uuid) -> Result<()>;
}
