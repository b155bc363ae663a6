use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::foods::dtos::{FoodRequestDto, FoodResponseDto, ListFoodsQuery};
use crate::features::foods::services::FoodService;
use crate::shared::types::ApiResponse;

/// List food items
///
/// Returns every item, newest first, including inactive ones.
#[utoipa::path(
    get,
    path = "/items",
    params(ListFoodsQuery),
    responses(
        (status = 200, description = "List of food items", body = Vec<FoodResponseDto>),
        (status = 500, description = "Store unavailable")
    ),
    tag = "foods"
)]
pub async fn list_foods(
    State(service): State<Arc<FoodService>>,
    Query(query): Query<ListFoodsQuery>,
) -> Result<Json<Vec<FoodResponseDto>>> {
    let foods = service.list(&query).await?;
    Ok(Json(foods))
}

/// Get a food item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Food ID")
    ),
    responses(
        (status = 200, description = "Food item found", body = FoodResponseDto),
        (status = 404, description = "Food item not found")
    ),
    tag = "foods"
)]
pub async fn get_food(
    State(service): State<Arc<FoodService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodResponseDto>> {
    let food = service.get_by_id(id).await?;
    Ok(Json(food))
}

/// Create a food item
///
/// Omitted fields default to `tags = []`, `weight = 1`, `isActive = true`.
#[utoipa::path(
    post,
    path = "/items",
    request_body = FoodRequestDto,
    responses(
        (status = 201, description = "Food item created", body = FoodResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "foods"
)]
pub async fn create_food(
    State(service): State<Arc<FoodService>>,
    AppJson(dto): AppJson<FoodRequestDto>,
) -> Result<(StatusCode, Json<FoodResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let food = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

/// Replace a food item
///
/// Every field is written; omitted fields are reset to their defaults.
/// Responds with `null` when the ID does not exist.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Food ID")
    ),
    request_body = FoodRequestDto,
    responses(
        (status = 200, description = "Updated food item, or null if the ID is unknown", body = FoodResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "foods"
)]
pub async fn update_food(
    State(service): State<Arc<FoodService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<FoodRequestDto>,
) -> Result<Json<Option<FoodResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let food = service.update(id, dto).await?;
    Ok(Json(food))
}

/// Delete a food item
///
/// Succeeds whether or not the item existed.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Food ID")
    ),
    responses(
        (status = 200, description = "Food item deleted"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "foods"
)]
pub async fn delete_food(
    State(service): State<Arc<FoodService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
