mod category;
mod food;

pub use category::CategoryFilter;
pub use food::{FoodFields, FoodItem};
