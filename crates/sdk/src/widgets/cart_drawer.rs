//! Cart drawer view data.

use rust_decimal::Decimal;
use storefront_sdk_core::{ImageCrop, calculate_discount, format_money, sized_image_url};

use crate::cart::{CartItem, CartPersistence, CartStore};
use crate::shopify::CartLineInput;

const THUMBNAIL_SIZE: u32 = 160;

/// One cart line, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub variant_id: String,
    pub handle: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub discount_percent: Option<u32>,
    pub line_total: String,
    pub image: Option<String>,
}

impl CartLineView {
    fn new(item: &CartItem, currency_code: &str) -> Self {
        let discount = item
            .compare_at_price
            .map(|compare_at| calculate_discount(compare_at, item.price))
            .filter(|percent| *percent > 0);

        Self {
            variant_id: item.variant_id.clone(),
            handle: item.handle.clone(),
            title: item.title.clone(),
            variant_title: item.variant_title.clone(),
            quantity: item.quantity,
            price: format_money(item.price, currency_code),
            compare_at_price: discount
                .and(item.compare_at_price)
                .map(|c| format_money(c, currency_code)),
            discount_percent: discount,
            line_total: format_money(item.line_total(), currency_code),
            image: item.image.as_deref().map(|url| {
                sized_image_url(
                    url,
                    Some(THUMBNAIL_SIZE),
                    Some(THUMBNAIL_SIZE),
                    Some(ImageCrop::Center),
                )
            }),
        }
    }
}

/// The cart drawer: open flag, lines and totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartDrawerView {
    pub is_open: bool,
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartDrawerView {
    /// Snapshot a cart, formatting amounts in `currency_code`.
    #[must_use]
    pub fn new<P: CartPersistence>(cart: &CartStore<P>, currency_code: &str) -> Self {
        Self {
            is_open: cart.is_open(),
            lines: cart
                .items()
                .iter()
                .map(|item| CartLineView::new(item, currency_code))
                .collect(),
            subtotal: format_money(cart.subtotal(), currency_code),
            item_count: cart.item_count(),
        }
    }

    /// Whether to show the empty-cart state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total savings against compare-at prices, if any.
    #[must_use]
    pub fn savings<P: CartPersistence>(cart: &CartStore<P>) -> Decimal {
        cart.items()
            .iter()
            .filter_map(|i| {
                i.compare_at_price
                    .filter(|c| *c > i.price)
                    .map(|c| (c - i.price) * Decimal::from(i.quantity))
            })
            .sum()
    }
}

/// Shopify cart lines for checking out the local cart.
#[must_use]
pub fn checkout_lines<P: CartPersistence>(cart: &CartStore<P>) -> Vec<CartLineInput> {
    cart.items()
        .iter()
        .map(|i| CartLineInput::new(i.variant_id.clone(), i.quantity))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::NoPersistence;

    fn item(variant_id: &str, price: i64, compare_at: Option<i64>, image: Option<&str>) -> CartItem {
        CartItem {
            variant_id: variant_id.to_string(),
            product_id: "p1".to_string(),
            title: "Cold Brew".to_string(),
            variant_title: Some("32 oz".to_string()),
            price: Decimal::from(price),
            compare_at_price: compare_at.map(Decimal::from),
            quantity: 1,
            image: image.map(str::to_string),
            handle: "cold-brew".to_string(),
        }
    }

    #[test]
    fn test_empty_drawer() {
        let cart = CartStore::load(NoPersistence);
        let view = CartDrawerView::new(&cart, "USD");
        assert!(view.is_empty());
        assert!(!view.is_open);
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_lines_and_totals() {
        let mut cart = CartStore::load(NoPersistence);
        cart.add_item(
            item(
                "v1",
                1200,
                Some(1500),
                Some("https://cdn.shopify.com/s/files/1/brew.png"),
            ),
            2,
        )
        .unwrap();
        cart.add_item(item("v2", 5, Some(5), None), 1).unwrap();
        cart.open_cart();

        let view = CartDrawerView::new(&cart, "USD");
        assert!(view.is_open);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "$2,405.00");

        let first = &view.lines[0];
        assert_eq!(first.line_total, "$2,400.00");
        assert_eq!(first.compare_at_price.as_deref(), Some("$1,500.00"));
        assert_eq!(first.discount_percent, Some(20));
        assert_eq!(
            first.image.as_deref(),
            Some("https://cdn.shopify.com/s/files/1/brew_160x160_crop_center.png")
        );

        let second = &view.lines[1];
        assert_eq!(second.discount_percent, None);
        assert_eq!(second.compare_at_price, None);

        assert_eq!(CartDrawerView::savings(&cart), Decimal::from(600));
    }

    #[test]
    fn test_checkout_lines() {
        let mut cart = CartStore::load(NoPersistence);
        cart.add_item(item("v1", 10, None, None), 3).unwrap();
        let lines = checkout_lines(&cart);
        assert_eq!(lines, vec![CartLineInput::new("v1", 3)]);
    }
}
