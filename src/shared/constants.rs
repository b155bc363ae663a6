/// Selector value meaning "every category"
pub const CATEGORY_ALL: &str = "ALL";

/// Label the web UI shows for [`CATEGORY_ALL`]
pub const CATEGORY_ALL_LABEL: &str = "Semua";

/// Categories offered by the management form. The store does not enforce them.
pub const FOOD_CATEGORIES: [&str; 4] = ["Makanan Berat", "Cemilan", "Minuman", "Lainnya"];

/// Default weight for a food item
pub const DEFAULT_FOOD_WEIGHT: f64 = 1.0;
