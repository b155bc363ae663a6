pub mod food_dto;

pub use food_dto::{FoodRequestDto, FoodResponseDto, FoodSort, ListFoodsQuery};
