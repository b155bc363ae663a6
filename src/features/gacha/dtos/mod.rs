pub mod gacha_dto;

pub use gacha_dto::{
    CancelResponseDto, CategoryOptionsDto, CategoryQuery, GachaEventDto, GachaStateDto,
    GachaStatusDto, SetCategoryDto, SpinOutcomeDto, SpinResponseDto,
};
