use crate::features::foods::models::{CategoryFilter, FoodItem};

/// Items that may be drawn: active ones whose category matches the selector.
///
/// Input order is preserved and the result is not re-sorted.
pub fn eligible(items: &[FoodItem], category: &CategoryFilter) -> Vec<FoodItem> {
    items
        .iter()
        .filter(|f| f.is_active && category.matches(f))
        .cloned()
        .collect()
}
