//! Category Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product category
///
/// Closed set defined by the catalog service. Serialized with the wire
/// names used in the `?category=` query parameter and product records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Shawls,
    Pherans,
    Handbags,
    DryFruits,
    GiftHampers,
}

impl Category {
    /// All categories, in storefront display order
    pub const ALL: [Category; 5] = [
        Category::Shawls,
        Category::Pherans,
        Category::Handbags,
        Category::DryFruits,
        Category::GiftHampers,
    ];

    /// Wire name, as used in query parameters and product records
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Shawls => "shawls",
            Category::Pherans => "pherans",
            Category::Handbags => "handbags",
            Category::DryFruits => "dry-fruits",
            Category::GiftHampers => "gift-hampers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shawls" => Ok(Category::Shawls),
            "pherans" => Ok(Category::Pherans),
            "handbags" => Ok(Category::Handbags),
            "dry-fruits" => Ok(Category::DryFruits),
            "gift-hampers" => Ok(Category::GiftHampers),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}
