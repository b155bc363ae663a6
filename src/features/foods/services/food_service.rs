use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::foods::dtos::{FoodRequestDto, FoodResponseDto, FoodSort, ListFoodsQuery};
use crate::features::foods::models::{CategoryFilter, FoodFields, FoodItem};
use crate::features::foods::services::FoodCatalog;
use crate::modules::food_store::FoodStore;

/// Service for managing food items
pub struct FoodService {
    store: Arc<dyn FoodStore>,
    catalog: Arc<FoodCatalog>,
}

impl FoodService {
    pub fn new(store: Arc<dyn FoodStore>, catalog: Arc<FoodCatalog>) -> Self {
        Self { store, catalog }
    }

    /// List food items for the management view
    pub async fn list(&self, query: &ListFoodsQuery) -> Result<Vec<FoodResponseDto>> {
        let filter = CategoryFilter::parse(query.category.as_deref());

        let mut items: Vec<FoodItem> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .filter(|f| filter.matches(f))
            .collect();

        if query.sort == FoodSort::Name {
            items.sort_by_cached_key(|f| f.name.to_lowercase());
        }

        Ok(items.into_iter().map(|f| f.into()).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<FoodResponseDto> {
        self.store
            .get(id)
            .await?
            .map(|f| f.into())
            .ok_or_else(|| AppError::NotFound(format!("Food with id {} not found", id)))
    }

    pub async fn create(&self, dto: FoodRequestDto) -> Result<FoodResponseDto> {
        let fields = Self::to_fields(dto)?;
        let food = self.store.create(fields).await?;
        self.catalog.invalidate().await;

        tracing::info!("Food created: id={}, name={:?}", food.id, food.name);

        Ok(food.into())
    }

    /// Replace all mutable fields. Returns `None` when the id is unknown.
    pub async fn update(&self, id: Uuid, dto: FoodRequestDto) -> Result<Option<FoodResponseDto>> {
        let fields = Self::to_fields(dto)?;
        let updated = self.store.update(id, fields).await?;

        match updated {
            Some(food) => {
                self.catalog.invalidate().await;
                tracing::info!("Food updated: id={}, name={:?}", food.id, food.name);
                Ok(Some(food.into()))
            }
            None => {
                tracing::info!("Update of unknown food {} ignored", id);
                Ok(None)
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete(id).await?;
        self.catalog.invalidate().await;

        tracing::info!("Food deleted: id={}", id);

        Ok(())
    }

    fn to_fields(dto: FoodRequestDto) -> Result<FoodFields> {
        let fields = FoodFields::from(dto);
        if fields.name.is_empty() {
            return Err(AppError::Validation("Name must not be empty".to_string()));
        }
        Ok(fields)
    }
}
