//! Catalog browsing commands.

use storefront_sdk::types::Product;
use storefront_sdk::{PlatformClient, SdkConfig};
use storefront_sdk_core::format_price_range;

use super::{Source, fetch_collection, fetch_product, shopify_client};

fn summarize(product: &Product) -> String {
    let range = &product.price_range;
    let price = format_price_range(&range.min_variant_price, &range.max_variant_price);
    let stock = if product.available_for_sale {
        ""
    } else {
        " (sold out)"
    };
    format!("{} - {} - {price}{stock}", product.handle, product.title)
}

/// List products.
pub async fn products(
    config: &SdkConfig,
    source: Source,
    limit: u32,
) -> storefront_sdk::Result<()> {
    let products = match source {
        Source::Platform => {
            PlatformClient::new(&config.platform)
                .get_products(Some(limit))
                .await?
        }
        Source::Shopify => {
            shopify_client(config)?
                .get_products(limit, None, None)
                .await?
                .products
        }
    };

    tracing::info!("{} products", products.len());
    for product in &products {
        tracing::info!("  {}", summarize(product));
    }
    Ok(())
}

/// Show one product with its variants.
pub async fn product(
    config: &SdkConfig,
    source: Source,
    handle: &str,
) -> storefront_sdk::Result<()> {
    let product = fetch_product(config, source, handle).await?;

    tracing::info!("{}", summarize(&product));
    if !product.vendor.is_empty() {
        tracing::info!("Vendor: {}", product.vendor);
    }
    for variant in &product.variants {
        let stock = if variant.available_for_sale {
            "in stock"
        } else {
            "sold out"
        };
        tracing::info!(
            "  {} - {} - {} ({stock})",
            variant.id,
            variant.title,
            variant.price.display()
        );
    }
    for plan in product.selling_plans() {
        tracing::info!("  plan {} - {}", plan.id, plan.name);
    }
    Ok(())
}

/// List collections.
pub async fn collections(
    config: &SdkConfig,
    source: Source,
    limit: u32,
) -> storefront_sdk::Result<()> {
    let collections = match source {
        Source::Platform => {
            PlatformClient::new(&config.platform)
                .get_collections(Some(limit))
                .await?
        }
        Source::Shopify => {
            shopify_client(config)?
                .get_collections(limit, None, None)
                .await?
                .collections
        }
    };

    tracing::info!("{} collections", collections.len());
    for collection in &collections {
        tracing::info!("  {} - {}", collection.handle, collection.title);
    }
    Ok(())
}

/// Show one collection and its products.
pub async fn collection(
    config: &SdkConfig,
    source: Source,
    handle: &str,
    limit: u32,
) -> storefront_sdk::Result<()> {
    let collection = fetch_collection(config, source, handle, limit).await?;

    tracing::info!(
        "{} - {} ({} products)",
        collection.handle,
        collection.title,
        collection.products.len()
    );
    for product in &collection.products {
        tracing::info!("  {}", summarize(product));
    }
    Ok(())
}
