use std::fmt;

use crate::features::foods::models::FoodItem;
use crate::shared::constants::{CATEGORY_ALL, CATEGORY_ALL_LABEL};

/// Category selector: either every category or one exact label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a selector. `None`, empty, `"ALL"` and `"Semua"` all mean every category.
    /// Anything else is taken verbatim.
    pub fn parse(selector: Option<&str>) -> Self {
        match selector {
            None | Some("") | Some(CATEGORY_ALL) | Some(CATEGORY_ALL_LABEL) => Self::All,
            Some(label) => Self::Category(label.to_string()),
        }
    }

    /// Case-sensitive match on the item's category
    pub fn matches(&self, item: &FoodItem) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => item.category.as_deref() == Some(label.as_str()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => CATEGORY_ALL,
            Self::Category(label) => label,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
