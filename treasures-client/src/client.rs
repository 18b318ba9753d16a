//! Storefront API client

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use shared::auth::{CurrentUser, LoginRequest, LoginResponse};
use shared::models::{Category, Product};
use std::fmt;
use treasures_cart::LocalStore;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, decode_validation, server_message};
use crate::payload::ProductForm;
use crate::retry::{FailureKind, RetryState};

// ============================================================================
// Session Trait
// ============================================================================

/// Admin session operations
///
/// The seam the admin panel is written against, so it can be driven by a
/// fake in tests. Catalog calls stay inherent on [`StorefrontClient`].
#[async_trait]
pub trait Session: Send + Sync {
    /// Exchange credentials for a bearer token and persist it
    async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse>;

    /// Drop the cached and persisted token; no network call
    fn logout(&mut self);

    /// Whether a bearer token is currently stored
    fn is_authenticated(&self) -> bool;

    /// The stored bearer token, if any
    fn token(&self) -> Option<&str>;
}

// ============================================================================
// Attempt Failures
// ============================================================================

/// Failure of a single listing attempt, kept apart from [`ClientError`] so
/// the retry loop can classify before deciding whether it is terminal.
#[derive(Debug)]
enum AttemptError {
    Transport(reqwest::Error),
    Status(u16, String),
}

impl AttemptError {
    fn kind(&self) -> FailureKind {
        match self {
            AttemptError::Transport(e) if e.is_timeout() => FailureKind::Timeout,
            AttemptError::Transport(e) if e.is_connect() => FailureKind::Connect,
            AttemptError::Transport(_) => FailureKind::Server,
            AttemptError::Status(..) => FailureKind::Server,
        }
    }

    fn into_client_error(self, base_url: &str) -> ClientError {
        match self {
            AttemptError::Transport(e) if e.is_timeout() => ClientError::Timeout,
            AttemptError::Transport(e) if e.is_connect() => ClientError::Connectivity {
                base_url: base_url.to_string(),
            },
            AttemptError::Transport(e) => ClientError::Http(e),
            AttemptError::Status(status, body) => ClientError::Server {
                status,
                message: server_message(&body),
            },
        }
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Transport(e) => write!(f, "{}", e),
            AttemptError::Status(status, _) => write!(f, "status {}", status),
        }
    }
}

// ============================================================================
// StorefrontClient
// ============================================================================

/// HTTP client for the catalog and auth API
#[derive(Clone)]
pub struct StorefrontClient {
    client: reqwest::Client,
    config: ClientConfig,
    store: LocalStore,
    token: Option<String>,
}

impl StorefrontClient {
    /// Create a new client; the stored bearer token (if any) is picked up
    /// from the local store
    pub fn new(config: ClientConfig, store: LocalStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        let token = store.load_token();
        if token.is_some() {
            tracing::debug!("Restored admin token from storage");
        }

        Self {
            client,
            config,
            store,
            token,
        }
    }

    /// The configured API base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn auth_header(&self) -> ClientResult<String> {
        self.token
            .as_ref()
            .map(|t| format!("Bearer {}", t))
            .ok_or(ClientError::AuthenticationRequired)
    }

    /// Map a non-success admin response onto the failure taxonomy
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::AuthenticationRequired,
                StatusCode::NOT_FOUND => ClientError::NotFound(server_message(&text)),
                StatusCode::UNPROCESSABLE_ENTITY => match decode_validation(&text) {
                    Some(fields) => ClientError::Validation(fields),
                    None => ClientError::Server {
                        status: status.as_u16(),
                        message: server_message(&text),
                    },
                },
                _ => ClientError::Server {
                    status: status.as_u16(),
                    message: server_message(&text),
                },
            });
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Catalog API ==========

    /// Fetch the product list, optionally filtered by category
    ///
    /// Retried under the configured [`crate::retry::RetryPolicy`] with
    /// linear backoff; the terminal failure is surfaced as timeout,
    /// connectivity (carrying the base URL), or server error.
    pub async fn get_products(&self, category: Option<Category>) -> ClientResult<Vec<Product>> {
        let mut url = self.url("/api/products");
        if let Some(category) = category {
            url = format!("{}?category={}", url, category.as_str());
        }

        let mut state = RetryState::new(self.config.retry);
        loop {
            match self.try_get_products(&url).await {
                Ok(products) => {
                    tracing::debug!(count = products.len(), "Fetched product list");
                    return Ok(products);
                }
                Err(attempt) => {
                    tracing::warn!(
                        attempt = state.attempt() + 1,
                        total = state.total_attempts(),
                        "Product fetch failed: {}",
                        attempt
                    );
                    match state.record_failure(attempt.kind()) {
                        Some(delay) => tokio::time::sleep(delay).await,
                        None => return Err(attempt.into_client_error(&self.config.base_url)),
                    }
                }
            }
        }
    }

    async fn try_get_products(&self, url: &str) -> Result<Vec<Product>, AttemptError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Status(status.as_u16(), body));
        }

        response.json().await.map_err(AttemptError::Transport)
    }

    /// Fetch a single product by id; single attempt, 404 maps to NotFound
    pub async fn get_product(&self, id: &str) -> ClientResult<Product> {
        let response = self
            .client
            .get(self.url(&format!("/api/products/{}", id)))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound(server_message(&body)),
                _ => ClientError::Server {
                    status: status.as_u16(),
                    message: server_message(&body),
                },
            });
        }

        response.json().await.map_err(Into::into)
    }

    /// Probe `/api/health`; never errors, a failed probe is just `false`
    pub async fn check_health(&self) -> bool {
        let result = self
            .client
            .get(self.url("/api/health"))
            .timeout(self.config.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }

    // ========== Admin API (bearer-auth) ==========

    /// Current user for the stored token
    pub async fn me(&self) -> ClientResult<CurrentUser> {
        let auth = self.auth_header()?;
        let response = self
            .client
            .get(self.url("/api/auth/me"))
            .header(AUTHORIZATION, auth)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Create a product from a multipart form
    ///
    /// Fails with [`ClientError::AuthenticationRequired`] before issuing
    /// any request when no token is stored.
    pub async fn create_product(&self, form: ProductForm) -> ClientResult<Product> {
        let auth = self.auth_header()?;
        let response = self
            .client
            .post(self.url("/api/products"))
            .header(AUTHORIZATION, auth)
            .multipart(form.into_multipart()?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Update a product; only the fields present in the form are applied
    pub async fn update_product(&self, id: &str, form: ProductForm) -> ClientResult<Product> {
        let auth = self.auth_header()?;
        let response = self
            .client
            .put(self.url(&format!("/api/products/{}", id)))
            .header(AUTHORIZATION, auth)
            .multipart(form.into_multipart()?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Delete a product
    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let auth = self.auth_header()?;
        let response = self
            .client
            .delete(self.url(&format!("/api/products/{}", id)))
            .header(AUTHORIZATION, auth)
            .send()
            .await?;

        let _: serde_json::Value = Self::handle_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl Session for StorefrontClient {
    async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&request)
            .send()
            .await?;

        // Auth failures are not transient; any rejection reads the same
        if !response.status().is_success() {
            return Err(ClientError::InvalidCredentials);
        }

        let login: LoginResponse = response.json().await?;
        self.store.save_token(&login.access_token)?;
        self.token = Some(login.access_token.clone());
        tracing::info!("Admin login succeeded");

        Ok(login)
    }

    fn logout(&mut self) {
        if let Err(e) = self.store.clear_token() {
            tracing::warn!("Failed to clear stored token: {}", e);
        }
        self.token = None;
        tracing::debug!("Admin logged out");
    }

    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
