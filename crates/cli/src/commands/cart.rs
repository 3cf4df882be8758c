//! Local cart commands.
//!
//! The cart lives in the SDK data directory, so successive invocations see
//! the same contents.

use storefront_sdk::analytics::NoopSink;
use storefront_sdk::widgets::{AddToCartButton, CartDrawerView};
use storefront_sdk::{CartStore, FileStorage, KeyValueCartPersistence, SdkConfig};

use super::{Source, fetch_product};

type FileCart = CartStore<KeyValueCartPersistence<FileStorage>>;

fn open_cart(config: &SdkConfig) -> storefront_sdk::Result<FileCart> {
    let storage = FileStorage::open(config.data_dir.clone())?;
    Ok(CartStore::load(KeyValueCartPersistence::new(storage)))
}

/// Print cart lines and totals.
pub fn show(config: &SdkConfig, currency: &str) -> storefront_sdk::Result<()> {
    let cart = open_cart(config)?;
    let view = CartDrawerView::new(&cart, currency);

    if view.is_empty() {
        tracing::info!("Cart is empty");
        return Ok(());
    }

    for line in &view.lines {
        let variant = line
            .variant_title
            .as_deref()
            .map(|t| format!(" ({t})"))
            .unwrap_or_default();
        tracing::info!(
            "  {} x {}{variant} @ {} = {}",
            line.quantity,
            line.title,
            line.price,
            line.line_total
        );
    }
    tracing::info!("{} items, subtotal {}", view.item_count, view.subtotal);
    Ok(())
}

/// Add a product variant to the cart.
pub async fn add(
    config: &SdkConfig,
    source: Source,
    handle: &str,
    variant_id: Option<&str>,
    quantity: u32,
) -> storefront_sdk::Result<()> {
    let product = fetch_product(config, source, handle).await?;
    let mut cart = open_cart(config)?;

    let mut button = AddToCartButton::new(&product);
    if let Some(variant_id) = variant_id {
        button.select_variant(variant_id);
    }
    button.set_quantity(quantity);
    button.add(&product, &mut cart, &NoopSink)?;

    tracing::info!(
        "Added {quantity} x {} ({} items in cart)",
        product.title,
        cart.item_count()
    );
    Ok(())
}

/// Remove a line.
pub fn remove(config: &SdkConfig, variant_id: &str) -> storefront_sdk::Result<()> {
    let mut cart = open_cart(config)?;
    if cart.find(variant_id).is_none() {
        tracing::warn!("No cart line for variant {variant_id}");
        return Ok(());
    }
    cart.remove_item(variant_id)?;
    tracing::info!("Removed {variant_id}");
    Ok(())
}

/// Set a line's quantity.
pub fn set(config: &SdkConfig, variant_id: &str, quantity: i64) -> storefront_sdk::Result<()> {
    let mut cart = open_cart(config)?;
    cart.update_quantity(variant_id, quantity)?;
    tracing::info!("{} items in cart", cart.item_count());
    Ok(())
}

/// Empty the cart.
pub fn clear(config: &SdkConfig) -> storefront_sdk::Result<()> {
    let mut cart = open_cart(config)?;
    cart.clear_cart()?;
    tracing::info!("Cart cleared");
    Ok(())
}
