use utoipa::{Modify, OpenApi};

use crate::features::foods::{dtos as foods_dtos, handlers as foods_handlers};
use crate::features::gacha::{dtos as gacha_dtos, handlers as gacha_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Foods
        foods_handlers::list_foods,
        foods_handlers::get_food,
        foods_handlers::create_food,
        foods_handlers::update_food,
        foods_handlers::delete_food,
        // Gacha
        gacha_handlers::get_state,
        gacha_handlers::list_categories,
        gacha_handlers::list_eligible,
        gacha_handlers::set_category,
        gacha_handlers::spin,
        gacha_handlers::cancel,
        gacha_handlers::stream,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Foods
            foods_dtos::FoodRequestDto,
            foods_dtos::FoodResponseDto,
            foods_dtos::FoodSort,
            // Gacha
            gacha_dtos::SetCategoryDto,
            gacha_dtos::GachaStatusDto,
            gacha_dtos::SpinOutcomeDto,
            gacha_dtos::GachaEventDto,
            ApiResponse<gacha_dtos::GachaStateDto>,
            ApiResponse<gacha_dtos::CategoryOptionsDto>,
            ApiResponse<Vec<foods_dtos::FoodResponseDto>>,
            ApiResponse<gacha_dtos::SpinResponseDto>,
            ApiResponse<gacha_dtos::CancelResponseDto>,
        )
    ),
    tags(
        (name = "foods", description = "Food item management"),
        (name = "gacha", description = "Random food picker"),
    ),
    info(
        title = "Gacha Makan API",
        version = "0.1.0",
        description = "Food list and random picker"
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
