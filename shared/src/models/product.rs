//! Product Model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Category;

/// Product record as served by the catalog API
///
/// Consumed read-only; the cart copies a snapshot of the fields it needs
/// at add-time and never holds a live reference to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price in whole rupees
    pub price: f64,
    /// Pre-discount price, when the product is on offer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Primary image URL
    pub image: String,
    /// All image URLs, primary first
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Category,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Selectable options (e.g. Color, Size), absent for single-variant products
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ProductVariant>>,
    /// Free-form attribute map (material, dimensions, origin, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artisan_story: Option<String>,
}

fn default_in_stock() -> bool {
    true
}

/// Variant definition: an option group and its choices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    pub name: String,
    pub options: Vec<String>,
}
