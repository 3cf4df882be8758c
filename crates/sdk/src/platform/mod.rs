//! Commerce platform REST client.
//!
//! The platform serves brand configuration, a product catalog, customer
//! accounts, bookings and application forms under `/api/storefront/...`.
//! Every request carries the brand's API key in `x-brand-api-key`.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::platform::PlatformClient;
//!
//! let client = PlatformClient::new(&config.platform);
//! let products = client.get_products(Some(12)).await?;
//! let product = client.get_product("cold-brew").await?;
//! ```

mod applications;
mod booking;
mod customer;
pub mod types;

pub use applications::ApplicationReceipt;
pub use booking::{Booking, BookingRequest, EventType, TimeSlot};
pub use customer::{
    CUSTOMER_TOKEN_STORAGE_KEY, CustomerClient, CustomerOrder, CustomerProfile,
    CustomerSession, CustomerSubscription, Frequency, FrequencyInterval, OrderLineItem,
    ProfileUpdate, SubscribeRequest, SubscriptionStatus,
};
pub use types::BrandConfig;

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, instrument};

use crate::config::{PlatformConfig, expose};
use crate::graphql::truncate;
use crate::types::{Collection, Product};

use types::{CollectionEnvelope, CollectionsEnvelope, ProductEnvelope, ProductsEnvelope};

const API_KEY_HEADER: &str = "x-brand-api-key";

// =============================================================================
// Errors
// =============================================================================

/// A non-2xx response from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    server_message: Option<String>,
}

impl ApiError {
    /// Build from a status and the raw response body.
    ///
    /// The server's `error` field wins over its `message` field.
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Self {
        fn text_field(body: &serde_json::Value, name: &str) -> Option<String> {
            body.get(name)
                .and_then(serde_json::Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string)
        }

        let server_message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|b| text_field(&b, "error").or_else(|| text_field(&b, "message")));

        Self {
            status,
            server_message,
        }
    }

    /// The message the server sent, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    /// The server's message, or a generic one naming the status.
    #[must_use]
    pub fn message(&self) -> String {
        self.server_message
            .clone()
            .unwrap_or_else(|| format!("Request failed with status {}", self.status))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ApiError {}

/// Errors from the platform API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Platform answered with a non-success status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A customer call was made without an access token.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The customer session could not be read or written.
    #[error("Session storage error: {0}")]
    Session(#[from] crate::storage::StorageError),
}

impl PlatformError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            _ => None,
        }
    }
}

// =============================================================================
// PlatformClient
// =============================================================================

/// Client for the commerce platform REST API. Cheap to clone.
#[derive(Clone)]
pub struct PlatformClient {
    inner: Arc<PlatformClientInner>,
}

struct PlatformClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.inner.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl PlatformClient {
    /// Create a new platform client.
    #[must_use]
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            inner: Arc::new(PlatformClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: expose(&config.api_key).to_string(),
            }),
        }
    }

    /// The platform base URL (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Start a request to `path` (which must begin with `/`).
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url))
            .header(API_KEY_HEADER, &self.inner.api_key)
    }

    /// Send a request and decode a JSON success body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, PlatformError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %truncate(&body, 500),
                "Platform API returned non-success status"
            );
            return Err(ApiError::from_body(status.as_u16(), &body).into());
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to parse platform response"
            );
            PlatformError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the brand's storefront configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a brand config.
    #[instrument(skip(self))]
    pub async fn get_config(&self) -> Result<BrandConfig, PlatformError> {
        self.send(self.request(Method::GET, "/api/storefront/config"))
            .await
    }

    /// List products, optionally limited.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, limit: Option<u32>) -> Result<Vec<Product>, PlatformError> {
        let path = with_limit("/api/storefront/products", "limit", limit);
        let envelope: ProductsEnvelope = self.send(self.request(Method::GET, &path)).await?;
        Ok(envelope.products.into_iter().map(Into::into).collect())
    }

    /// Fetch one product by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; an unknown handle is an
    /// [`ApiError`] with status 404.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Product, PlatformError> {
        let path = format!("/api/storefront/products/{}", urlencoding::encode(handle));
        let envelope: ProductEnvelope = self.send(self.request(Method::GET, &path)).await?;
        Ok(envelope.product.into())
    }

    /// List collections, optionally limited.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<Collection>, PlatformError> {
        let path = with_limit("/api/storefront/collections", "limit", limit);
        let envelope: CollectionsEnvelope = self.send(self.request(Method::GET, &path)).await?;
        Ok(envelope.collections.into_iter().map(Into::into).collect())
    }

    /// Fetch one collection by handle with up to `product_limit` products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; an unknown handle is an
    /// [`ApiError`] with status 404.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection(
        &self,
        handle: &str,
        product_limit: Option<u32>,
    ) -> Result<Collection, PlatformError> {
        let path = with_limit(
            &format!("/api/storefront/collections/{}", urlencoding::encode(handle)),
            "productLimit",
            product_limit,
        );
        let envelope: CollectionEnvelope = self.send(self.request(Method::GET, &path)).await?;
        Ok(envelope.collection.into())
    }
}

fn with_limit(path: &str, name: &str, limit: Option<u32>) -> String {
    match limit {
        Some(limit) => format!("{path}?{name}={limit}"),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_error_field() {
        let err = ApiError::from_body(400, r#"{"error":"Bad handle","message":"ignored"}"#);
        assert_eq!(err.message(), "Bad handle");
        assert_eq!(err.server_message(), Some("Bad handle"));
    }

    #[test]
    fn test_api_error_falls_back_to_message_field() {
        let err = ApiError::from_body(422, r#"{"message":"Invalid email"}"#);
        assert_eq!(err.to_string(), "Invalid email");
    }

    #[test]
    fn test_api_error_blank_or_non_string_error_uses_message() {
        for body in [
            r#"{"error":"","message":"Invalid email"}"#,
            r#"{"error":"   ","message":"Invalid email"}"#,
            r#"{"error":{"code":7},"message":"Invalid email"}"#,
        ] {
            let err = ApiError::from_body(400, body);
            assert_eq!(err.server_message(), Some("Invalid email"), "body: {body}");
        }
    }

    #[test]
    fn test_api_error_generic_fallback() {
        for body in ["", "<html>oops</html>", r#"{"error":""}"#, "{}"] {
            let err = ApiError::from_body(503, body);
            assert_eq!(err.to_string(), "Request failed with status 503");
            assert_eq!(err.server_message(), None);
        }
    }

    #[test]
    fn test_with_limit() {
        assert_eq!(with_limit("/p", "limit", Some(5)), "/p?limit=5");
        assert_eq!(with_limit("/p", "limit", None), "/p");
    }

    #[test]
    fn test_not_logged_in_message() {
        assert_eq!(PlatformError::NotLoggedIn.to_string(), "Not logged in");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = PlatformClient::new(&PlatformConfig::new("https://adsurf.ai/", "sk_live_123"));
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk_live_123"));
        assert_eq!(client.base_url(), "https://adsurf.ai");
    }
}
