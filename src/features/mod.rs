pub mod foods;
pub mod gacha;
