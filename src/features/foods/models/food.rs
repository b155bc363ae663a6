use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::foods::dtos::{FoodRequestDto, FoodResponseDto};
use crate::shared::constants::DEFAULT_FOOD_WEIGHT;

/// Database model for a food item
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub weight: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of a food item, with defaults already applied.
///
/// Create and update both write every field, so an update replaces the
/// whole record rather than patching it.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodFields {
    pub name: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub weight: f64,
    pub is_active: bool,
}

impl From<FoodRequestDto> for FoodFields {
    fn from(dto: FoodRequestDto) -> Self {
        let category = dto
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let tags = dto
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        // The form sends `Number(weight) || 1`, so zero and garbage fall back too
        let weight = dto
            .weight
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(DEFAULT_FOOD_WEIGHT);

        Self {
            name: dto.name.trim().to_string(),
            category,
            tags,
            weight,
            is_active: dto.is_active.unwrap_or(true),
        }
    }
}

impl From<FoodItem> for FoodResponseDto {
    fn from(f: FoodItem) -> Self {
        Self {
            id: f.id,
            name: f.name,
            category: f.category,
            tags: f.tags,
            weight: f.weight,
            is_active: f.is_active,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}
