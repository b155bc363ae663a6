use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::FoodStore;
use crate::core::error::{AppError, Result};
use crate::features::foods::models::{FoodFields, FoodItem};

const FOOD_COLUMNS: &str =
    "id, name, category, tags, weight, is_active, created_at, updated_at";

/// Postgres-backed food store
pub struct PgFoodStore {
    pool: PgPool,
}

impl PgFoodStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PgFoodStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgFoodStore")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

#[async_trait]
impl FoodStore for PgFoodStore {
    async fn list_all(&self) -> Result<Vec<FoodItem>> {
        let query = format!(
            "SELECT {} FROM foods ORDER BY created_at DESC, id DESC",
            FOOD_COLUMNS
        );

        sqlx::query_as::<_, FoodItem>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list foods: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get(&self, id: Uuid) -> Result<Option<FoodItem>> {
        let query = format!("SELECT {} FROM foods WHERE id = $1", FOOD_COLUMNS);

        sqlx::query_as::<_, FoodItem>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get food {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn create(&self, fields: FoodFields) -> Result<FoodItem> {
        let query = format!(
            r#"
            INSERT INTO foods (id, name, category, tags, weight, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            FOOD_COLUMNS
        );

        sqlx::query_as::<_, FoodItem>(&query)
            .bind(Uuid::now_v7())
            .bind(&fields.name)
            .bind(&fields.category)
            .bind(&fields.tags)
            .bind(fields.weight)
            .bind(fields.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create food: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update(&self, id: Uuid, fields: FoodFields) -> Result<Option<FoodItem>> {
        let query = format!(
            r#"
            UPDATE foods
            SET name = $2, category = $3, tags = $4, weight = $5, is_active = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FOOD_COLUMNS
        );

        sqlx::query_as::<_, FoodItem>(&query)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.category)
            .bind(&fields.tags)
            .bind(fields.weight)
            .bind(fields.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update food {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete food {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            tracing::debug!("Delete of unknown food {} ignored", id);
        }

        Ok(())
    }
}
