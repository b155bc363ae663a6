use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Request DTO for creating or replacing a food item.
///
/// Omitted optional fields fall back to their defaults on both create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequestDto {
    /// Display name (required)
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Category label, e.g. "Makanan Berat"
    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,

    /// Free-form tags (default: empty)
    pub tags: Option<Vec<String>>,

    /// Stored weight (default: 1)
    pub weight: Option<f64>,

    /// Whether the item can be drawn (default: true)
    pub is_active: Option<bool>,
}

/// Response DTO for a food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodResponseDto {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub weight: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordering of the management list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FoodSort {
    /// Newest first (store order)
    #[default]
    Newest,
    /// Case-insensitive by name
    Name,
}

/// Query params for listing food items
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListFoodsQuery {
    /// Exact category label, or "ALL". Inactive items are included.
    pub category: Option<String>,

    /// Sort order (default: newest)
    #[serde(default)]
    #[param(inline)]
    pub sort: FoodSort,
}
