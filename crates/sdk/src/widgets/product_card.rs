//! Product card view data.

use storefront_sdk_core::{
    ImageCrop, calculate_discount, format_price_range, image_srcset, sized_image_url,
};

use crate::types::Product;

const SRCSET_WIDTHS: [u32; 3] = [1, 2, 3];

/// A product tile, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    pub url: String,
    pub vendor: Option<String>,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub discount_percent: Option<u32>,
    pub badge: Option<&'static str>,
    pub image_url: Option<String>,
    pub image_srcset: Option<String>,
    pub image_alt: String,
    pub available: bool,
}

impl ProductCardView {
    /// Build a card with a square image of `image_size` pixels.
    ///
    /// The compare-at price and discount come from the default variant and
    /// are shown only when it is on sale.
    #[must_use]
    pub fn new(product: &Product, image_size: u32) -> Self {
        let range = &product.price_range;
        let sale = product
            .default_variant()
            .filter(|v| v.is_on_sale())
            .and_then(|v| v.compare_at_price.as_ref().map(|c| (c, &v.price)));
        let discount = sale
            .map(|(compare_at, price)| calculate_discount(compare_at.amount, price.amount))
            .filter(|percent| *percent > 0);

        let badge = if !product.available_for_sale {
            Some("Sold Out")
        } else if discount.is_some() {
            Some("Sale")
        } else {
            None
        };

        let image = product.primary_image();

        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            url: format!("/products/{}", product.handle),
            vendor: Some(product.vendor.clone()).filter(|v| !v.is_empty()),
            price: format_price_range(&range.min_variant_price, &range.max_variant_price),
            compare_at_price: sale.filter(|_| discount.is_some()).map(|(c, _)| c.display()),
            discount_percent: discount,
            badge,
            image_url: image.map(|i| {
                sized_image_url(
                    &i.url,
                    Some(image_size),
                    Some(image_size),
                    Some(ImageCrop::Center),
                )
            }),
            image_srcset: image.map(|i| {
                image_srcset(&i.url, &SRCSET_WIDTHS.map(|factor| factor * image_size))
            }),
            image_alt: image
                .and_then(|i| i.alt_text.clone())
                .unwrap_or_else(|| product.title.clone()),
            available: product.available_for_sale,
        }
    }
}
