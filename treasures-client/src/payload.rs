//! Multipart payload builder for admin product create/update
//!
//! The admin endpoints take `multipart/form-data`: scalar fields as text
//! parts (booleans and numbers stringified), `variants`/`details` as
//! JSON-encoded text, and images as file parts. On update, only the parts
//! present are applied server-side, and an empty `original_price` clears
//! the stored value.

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use shared::models::{Category, ProductVariant};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ClientResult;

/// An image to upload as a file part
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image from disk, keeping its file name
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let bytes = std::fs::read(path)?;
        Ok(Self { file_name, bytes })
    }

    fn into_part(self) -> ClientResult<Part> {
        let mime = mime_guess::from_path(&self.file_name).first_or_octet_stream();
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(mime.essence_str())?;
        Ok(part)
    }
}

/// Builder for the product create/update form
///
/// Unset fields are omitted from the multipart body. Create requires at
/// least name, description, price, category and the main image; the
/// server enforces that and answers 422 otherwise.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    /// `Some("")` clears the stored value on update
    original_price: Option<String>,
    category: Option<Category>,
    in_stock: Option<bool>,
    rating: Option<f64>,
    reviews: Option<u32>,
    artisan_story: Option<String>,
    variants: Option<Vec<ProductVariant>>,
    details: Option<BTreeMap<String, Value>>,
    image: Option<ImageFile>,
    additional_images: Vec<ImageFile>,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Unit price in whole rupees
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn original_price(mut self, price: f64) -> Self {
        self.original_price = Some(price.to_string());
        self
    }

    /// Clear the pre-discount price on update
    pub fn clear_original_price(mut self) -> Self {
        self.original_price = Some(String::new());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn reviews(mut self, reviews: u32) -> Self {
        self.reviews = Some(reviews);
        self
    }

    pub fn artisan_story(mut self, story: impl Into<String>) -> Self {
        self.artisan_story = Some(story.into());
        self
    }

    pub fn variants(mut self, variants: Vec<ProductVariant>) -> Self {
        self.variants = Some(variants);
        self
    }

    pub fn details(mut self, details: BTreeMap<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// Main product image
    pub fn image(mut self, image: ImageFile) -> Self {
        self.image = Some(image);
        self
    }

    /// Append a gallery image
    pub fn additional_image(mut self, image: ImageFile) -> Self {
        self.additional_images.push(image);
        self
    }

    /// Assemble the multipart body
    pub fn into_multipart(self) -> ClientResult<Form> {
        let mut form = Form::new();

        if let Some(name) = self.name {
            form = form.text("name", name);
        }
        if let Some(description) = self.description {
            form = form.text("description", description);
        }
        if let Some(price) = self.price {
            form = form.text("price", price.to_string());
        }
        if let Some(original_price) = self.original_price {
            form = form.text("original_price", original_price);
        }
        if let Some(category) = self.category {
            form = form.text("category", category.as_str());
        }
        if let Some(in_stock) = self.in_stock {
            form = form.text("in_stock", if in_stock { "true" } else { "false" });
        }
        if let Some(rating) = self.rating {
            form = form.text("rating", rating.to_string());
        }
        if let Some(reviews) = self.reviews {
            form = form.text("reviews", reviews.to_string());
        }
        if let Some(story) = self.artisan_story {
            form = form.text("artisan_story", story);
        }
        if let Some(variants) = self.variants {
            form = form.text("variants", serde_json::to_string(&variants)?);
        }
        if let Some(details) = self.details {
            form = form.text("details", serde_json::to_string(&details)?);
        }
        if let Some(image) = self.image {
            form = form.part("image", image.into_part()?);
        }
        for image in self.additional_images {
            form = form.part("additional_images", image.into_part()?);
        }

        Ok(form)
    }
}
