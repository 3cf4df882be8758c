//! Unified error handling.
//!
//! Every module has its own error enum; [`Error`] wraps them all so
//! applications can use one `Result` type across the SDK. Widget errors are
//! meant for shoppers and display without a prefix.

use thiserror::Error;

use crate::cart::CartError;
use crate::config::ConfigError;
use crate::graphql::GraphQLClientError;
use crate::platform::PlatformError;
use crate::shopify::ShopifyError;
use crate::storage::StorageError;
use crate::widgets::{AddToCartError, BookingError, FormError};

/// SDK-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be resolved.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Platform REST call failed.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Shopify Storefront call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Generic GraphQL call failed.
    #[error("GraphQL error: {0}")]
    GraphQL(#[from] GraphQLClientError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be persisted.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error(transparent)]
    AddToCart(#[from] AddToCartError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ApiError;

    #[test]
    fn test_prefixes() {
        let err = Error::from(PlatformError::from(ApiError::from_body(404, "")));
        assert_eq!(err.to_string(), "Platform error: Request failed with status 404");

        let err = Error::from(ShopifyError::NotFound("Product: tee".to_string()));
        assert!(err.to_string().starts_with("Shopify error: "));
    }

    #[test]
    fn test_widget_errors_are_unprefixed() {
        let err = Error::from(FormError::Submit("Email already applied".to_string()));
        assert_eq!(err.to_string(), "Email already applied");
    }
}
