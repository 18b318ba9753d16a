//! Treasures Client - HTTP client for the storefront catalog API
//!
//! Wraps the catalog and auth endpoints behind [`StorefrontClient`]:
//! base-URL resolution, bearer-token attachment, retry with linear
//! backoff for the product listing, and a typed failure taxonomy the
//! storefront can display directly.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod retry;

pub use client::{Session, StorefrontClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, FieldError};
pub use payload::{ImageFile, ProductForm};
pub use retry::{FailureKind, RetryPolicy, RetryState};

// Re-export shared types for convenience
pub use shared::auth::{CurrentUser, LoginRequest, LoginResponse};
pub use shared::models::{Category, Product, ProductVariant};
