//! Command implementations.

pub mod cart;
pub mod catalog;
pub mod seo;

use clap::ValueEnum;
use storefront_sdk::config::ConfigError;
use storefront_sdk::loaders::CatalogSource;
use storefront_sdk::types::{Collection, Product};
use storefront_sdk::{Error, PlatformClient, SdkConfig, ShopifyClient};

/// Which backend to read the catalog from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Commerce platform REST API
    Platform,
    /// Shopify Storefront GraphQL API
    Shopify,
}

/// Build a Shopify client, failing when no store is configured.
pub fn shopify_client(config: &SdkConfig) -> Result<ShopifyClient, Error> {
    let shopify = config
        .shopify
        .as_ref()
        .ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_STORE_DOMAIN".to_string()))?;
    Ok(ShopifyClient::new(shopify))
}

/// Fetch one product by handle from `source`.
pub async fn fetch_product(
    config: &SdkConfig,
    source: Source,
    handle: &str,
) -> Result<Product, Error> {
    match source {
        Source::Platform => {
            let client = PlatformClient::new(&config.platform);
            Ok(client.product(handle).await?)
        }
        Source::Shopify => Ok(shopify_client(config)?.product(handle).await?),
    }
}

/// Fetch one collection by handle from `source`.
pub async fn fetch_collection(
    config: &SdkConfig,
    source: Source,
    handle: &str,
    product_limit: u32,
) -> Result<Collection, Error> {
    match source {
        Source::Platform => {
            let client = PlatformClient::new(&config.platform);
            Ok(client.collection(handle, product_limit).await?)
        }
        Source::Shopify => Ok(shopify_client(config)?
            .collection(handle, product_limit)
            .await?),
    }
}
