//! Cart line types
//!
//! A cart is an ordered list of [`CartLine`]s. A line is uniquely keyed by
//! `(id, variant)`: adding the same product with the same variant selection
//! merges into the existing line, while a different variant (or no variant
//! vs. a variant) makes a distinct line.

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// One cart row: a product + variant combination and its quantity
///
/// Descriptive fields are snapshots copied from the product at add-time,
/// not live references into the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product ID (not unique per line; see the `(id, variant)` key)
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: Category,
    /// Unit price snapshot in whole rupees
    pub price: f64,
    /// Selected options, e.g. "Color: Maroon, Size: Large (100x200cm)"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Always >= 1; non-positive quantities are removed, never stored
    pub quantity: u32,
}

impl CartLine {
    /// Line total: unit price x quantity
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Whether this line matches the given merge key
    pub fn matches(&self, id: &str, variant: Option<&str>) -> bool {
        self.id == id && self.variant.as_deref() == variant
    }
}

/// Add-to-cart input: the product snapshot taken at add-time
///
/// Quantity is implicitly 1; repeated adds of the same `(id, variant)`
/// increment the existing line instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl CartItemInput {
    /// Convert into a fresh line with quantity 1
    pub fn into_line(self) -> CartLine {
        CartLine {
            id: self.id,
            name: self.name,
            image: self.image,
            category: self.category,
            price: self.price,
            variant: self.variant,
            quantity: 1,
        }
    }
}
