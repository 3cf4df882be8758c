//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents with explicit wire DTOs, one conversion
//!   function per response shape
//! - Shopify is the source of truth for catalog data; responses are cached
//!   in memory via `moka` (configurable TTL, 0 disables caching)
//! - Carts are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::shopify::{CartLineInput, ShopifyClient};
//!
//! let client = ShopifyClient::new(&config.shopify)?;
//!
//! let product = client.get_product_by_handle("my-product").await?;
//!
//! let cart = client.create_cart(None, None).await?;
//! let cart = client
//!     .add_to_cart(&cart.id, vec![CartLineInput::new(&product.variants[0].id, 1)])
//!     .await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::ShopifyClient;
pub use types::*;

use thiserror::Error;

use crate::graphql::{GraphQLErrorDetail, GraphQLQueryError};

/// Errors that can occur when interacting with the Shopify Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors (or a non-success status).
    #[error("GraphQL error: {0}")]
    GraphQL(#[from] GraphQLQueryError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl ShopifyError {
    /// A GraphQL error carrying a single message.
    pub(crate) fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQL(GraphQLQueryError::new(vec![GraphQLErrorDetail::message(
            message,
        )]))
    }

    /// Join mutation user errors into one `UserError`.
    pub(crate) fn user_errors(errors: &[CartUserError]) -> Self {
        Self::UserError(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
