use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::FoodStore;
use crate::core::error::{AppError, Result};
use crate::features::foods::models::{FoodFields, FoodItem};

/// Process-local food store.
///
/// Items are kept in insertion order and listed newest first, so records
/// created within the same clock tick still have a stable order.
#[derive(Debug)]
pub struct InMemoryFoodStore {
    items: RwLock<Vec<FoodItem>>,
    available: AtomicBool,
}

impl Default for InMemoryFoodStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFoodStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: every call fails with `StoreUnavailable` while false
    #[allow(dead_code)]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::StoreUnavailable(
                "in-memory store is offline".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FoodStore for InMemoryFoodStore {
    async fn list_all(&self) -> Result<Vec<FoodItem>> {
        self.ensure_available()?;
        let items = self.items.read().await;
        Ok(items.iter().rev().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<FoodItem>> {
        self.ensure_available()?;
        let items = self.items.read().await;
        Ok(items.iter().find(|f| f.id == id).cloned())
    }

    async fn create(&self, fields: FoodFields) -> Result<FoodItem> {
        self.ensure_available()?;
        let now = Utc::now();
        let item = FoodItem {
            id: Uuid::now_v7(),
            name: fields.name,
            category: fields.category,
            tags: fields.tags,
            weight: fields.weight,
            is_active: fields.is_active,
            created_at: now,
            updated_at: now,
        };

        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, fields: FoodFields) -> Result<Option<FoodItem>> {
        self.ensure_available()?;
        let mut items = self.items.write().await;

        let Some(item) = items.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };

        item.name = fields.name;
        item.category = fields.category;
        item.tags = fields.tags;
        item.weight = fields.weight;
        item.is_active = fields.is_active;
        item.updated_at = Utc::now();

        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.ensure_available()?;
        self.items.write().await.retain(|f| f.id != id);
        Ok(())
    }
}
