//! Add-to-cart button.

use thiserror::Error;
use tracing::{info, instrument};

use crate::analytics::{AnalyticsEvent, EventItem, EventSink};
use crate::cart::{CartError, CartItem, CartPersistence, CartStore};
use crate::types::{Product, ProductVariant};

const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Errors from [`AddToCartButton::add`].
#[derive(Debug, Error)]
pub enum AddToCartError {
    #[error("No variant selected")]
    NoVariant,

    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    #[error("{0} is sold out")]
    SoldOut(String),

    /// The item was added but the cart could not be saved.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Build the cart line for one variant of a product.
///
/// The "Default Title" variant of single-variant products gets no variant
/// title. The variant image wins over the product image.
#[must_use]
pub fn cart_item_for(product: &Product, variant: &ProductVariant) -> CartItem {
    CartItem {
        variant_id: variant.id.clone(),
        product_id: product.id.clone(),
        title: product.title.clone(),
        variant_title: (variant.title != DEFAULT_VARIANT_TITLE).then(|| variant.title.clone()),
        price: variant.price.amount,
        compare_at_price: variant.compare_at_price.as_ref().map(|m| m.amount),
        quantity: 1,
        image: variant
            .image
            .as_ref()
            .or_else(|| product.primary_image())
            .map(|i| i.url.clone()),
        handle: product.handle.clone(),
    }
}

/// State of an add-to-cart button: the selected variant and quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartButton {
    variant_id: Option<String>,
    quantity: u32,
}

impl AddToCartButton {
    /// Start on the product's default variant with quantity 1.
    #[must_use]
    pub fn new(product: &Product) -> Self {
        Self {
            variant_id: product.default_variant().map(|v| v.id.clone()),
            quantity: 1,
        }
    }

    #[must_use]
    pub fn variant_id(&self) -> Option<&str> {
        self.variant_id.as_deref()
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn select_variant(&mut self, variant_id: impl Into<String>) {
        self.variant_id = Some(variant_id.into());
    }

    /// Set the quantity; values below 1 become 1.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    fn selected<'a>(&self, product: &'a Product) -> Option<&'a ProductVariant> {
        self.variant_id.as_deref().and_then(|id| product.variant(id))
    }

    /// Whether the button should be disabled.
    #[must_use]
    pub fn is_disabled(&self, product: &Product) -> bool {
        !self.selected(product).is_some_and(|v| v.available_for_sale)
    }

    /// Button label.
    #[must_use]
    pub fn label(&self, product: &Product) -> &'static str {
        if self.is_disabled(product) {
            "Sold Out"
        } else {
            "Add to Cart"
        }
    }

    /// Add the selected variant to the cart, open the drawer and report an
    /// `AddToCart` event.
    ///
    /// # Errors
    ///
    /// Returns an error if no available variant is selected. A
    /// `Cart` error means the item was added and the drawer opened but the
    /// cart could not be saved.
    #[instrument(skip_all, fields(product = %product.handle, variant_id = ?self.variant_id))]
    pub fn add<P: CartPersistence>(
        &self,
        product: &Product,
        cart: &mut CartStore<P>,
        sink: &dyn EventSink,
    ) -> Result<(), AddToCartError> {
        let variant_id = self.variant_id.as_deref().ok_or(AddToCartError::NoVariant)?;
        let variant = product
            .variant(variant_id)
            .ok_or_else(|| AddToCartError::VariantNotFound(variant_id.to_string()))?;
        if !variant.available_for_sale {
            return Err(AddToCartError::SoldOut(product.title.clone()));
        }

        let item = cart_item_for(product, variant);
        let saved = cart.add_item(item.clone(), self.quantity);
        cart.open_cart();

        sink.track(&AnalyticsEvent::AddToCart {
            item: EventItem {
                id: item.variant_id,
                name: item.title,
                variant: item.variant_title,
                price: item.price,
                quantity: self.quantity,
            },
            currency: variant.price.currency_code.clone(),
        });
        info!(quantity = self.quantity, "Added to cart");

        saved.map_err(AddToCartError::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::analytics::RecordingSink;
    use crate::cart::NoPersistence;
    use crate::types::fixtures::{product, variant};

    #[test]
    fn test_cart_item_for() {
        let mut default = variant("v1", "12.50", true);
        default.title = "Default Title".to_string();
        let p = product("cold-brew", vec![default.clone()]);

        let item = cart_item_for(&p, &default);
        assert_eq!(item.variant_title, None);
        assert_eq!(item.handle, "cold-brew");
        assert_eq!(item.price.to_string(), "12.50");
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_add_opens_drawer_and_tracks() {
        let p = product("tee", vec![variant("v1", "20", true)]);
        let mut cart = CartStore::load(NoPersistence);
        let sink = RecordingSink::new();

        let mut button = AddToCartButton::new(&p);
        button.set_quantity(2);
        button.add(&p, &mut cart, &sink).unwrap();
        button.add(&p, &mut cart, &sink).unwrap();

        assert!(cart.is_open());
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 4);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].ga4_name(), "add_to_cart");
    }

    #[test]
    fn test_sold_out_rejected() {
        let p = product("tee", vec![variant("v1", "20", false)]);
        let mut cart = CartStore::load(NoPersistence);
        let sink = RecordingSink::new();

        let button = AddToCartButton::new(&p);
        assert!(button.is_disabled(&p));
        assert_eq!(button.label(&p), "Sold Out");

        let err = button.add(&p, &mut cart, &sink).unwrap_err();
        assert!(matches!(err, AddToCartError::SoldOut(_)));
        assert!(cart.is_empty());
        assert!(!cart.is_open());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_unknown_variant() {
        let p = product("tee", vec![variant("v1", "20", true)]);
        let mut cart = CartStore::load(NoPersistence);

        let mut button = AddToCartButton::new(&p);
        button.select_variant("nope");
        button.set_quantity(0);
        assert_eq!(button.quantity(), 1);

        let err = button.add(&p, &mut cart, &RecordingSink::new()).unwrap_err();
        assert_eq!(err.to_string(), "Variant not found: nope");
    }
}
