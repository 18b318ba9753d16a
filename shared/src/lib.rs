//! Shared types for the Kashmiri Treasures storefront
//!
//! Common types used across the cart and API client crates: catalog
//! models, cart line types, and auth payloads. This crate is pure data,
//! no I/O.

pub mod auth;
pub mod cart;
pub mod models;

// Re-exports
pub use auth::{CurrentUser, LoginRequest, LoginResponse};
pub use cart::{CartItemInput, CartLine};
pub use models::{Category, Product, ProductVariant};
