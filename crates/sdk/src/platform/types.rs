//! Platform REST payloads and their conversion into catalog types.
//!
//! The platform sends flat product records with decimal prices and one
//! currency code per product. Missing fields take empty defaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_sdk_core::Money;

use crate::types::{
    Collection, Image, PriceRange, Product, ProductOption, ProductVariant, SelectedOption,
    SellingPlanGroup, Seo,
};

const DEFAULT_CURRENCY: &str = "USD";

/// Storefront configuration of a brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandConfig {
    /// Brand id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Primary storefront domain.
    pub domain: Option<String>,
    /// Store currency.
    pub currency_code: Option<String>,
    /// Logo URL.
    pub logo_url: Option<String>,
    /// Connected Shopify store domain, if any.
    pub shopify_store_domain: Option<String>,
    /// Enabled storefront features (e.g. `"subscriptions"`, `"booking"`).
    pub features: Vec<String>,
}

impl BrandConfig {
    /// Whether a feature flag is enabled.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformImage {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformVariant {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    #[serde(default = "available")]
    pub available_for_sale: bool,
    pub inventory_quantity: Option<i64>,
    pub sku: Option<String>,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<PlatformImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlatformOption {
    pub id: Option<String>,
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub available_for_sale: Option<bool>,
    pub currency_code: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub url: Option<String>,
    pub images: Vec<PlatformImage>,
    pub options: Vec<PlatformOption>,
    pub variants: Vec<PlatformVariant>,
    pub requires_selling_plan: bool,
    pub selling_plan_groups: Vec<SellingPlanGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformCollection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub image: Option<PlatformImage>,
    pub products: Vec<PlatformProduct>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsEnvelope {
    #[serde(default)]
    pub products: Vec<PlatformProduct>,
}

#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: PlatformProduct,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsEnvelope {
    #[serde(default)]
    pub collections: Vec<PlatformCollection>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionEnvelope {
    pub collection: PlatformCollection,
}

const fn available() -> bool {
    true
}

// =============================================================================
// Conversions
// =============================================================================

impl From<PlatformImage> for Image {
    fn from(i: PlatformImage) -> Self {
        Self {
            id: i.id,
            url: i.url,
            alt_text: i.alt_text,
            width: i.width,
            height: i.height,
        }
    }
}

impl From<PlatformProduct> for Product {
    fn from(p: PlatformProduct) -> Self {
        let currency = p
            .currency_code
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let money = |amount: Decimal| Money::new(amount, currency.clone());

        let prices = p.variants.iter().map(|v| v.price);
        let min = prices.clone().min().unwrap_or_default();
        let max = prices.max().unwrap_or_default();

        let compare_at: Vec<Decimal> = p
            .variants
            .iter()
            .filter_map(|v| v.compare_at_price)
            .collect();
        let compare_at_price_range = match (compare_at.iter().min(), compare_at.iter().max()) {
            (Some(lo), Some(hi)) => Some(PriceRange {
                min_variant_price: money(*lo),
                max_variant_price: money(*hi),
            }),
            _ => None,
        };

        let variants: Vec<ProductVariant> = p
            .variants
            .into_iter()
            .map(|v| ProductVariant {
                id: v.id,
                title: v.title,
                available_for_sale: v.available_for_sale,
                quantity_available: v.inventory_quantity,
                sku: v.sku,
                price: money(v.price),
                compare_at_price: v.compare_at_price.map(money),
                selected_options: v.selected_options,
                image: v.image.map(Image::from),
            })
            .collect();

        let images: Vec<Image> = p.images.into_iter().map(Image::from).collect();
        let seo = (p.seo_title.is_some() || p.seo_description.is_some()).then(|| Seo {
            title: p.seo_title,
            description: p.seo_description,
        });

        Self {
            available_for_sale: p
                .available_for_sale
                .unwrap_or_else(|| variants.iter().any(|v| v.available_for_sale)),
            id: p.id,
            handle: p.handle,
            title: p.title,
            description: p.description,
            description_html: p.description_html,
            product_type: p.product_type,
            vendor: p.vendor,
            tags: p.tags,
            online_store_url: p.url,
            seo,
            price_range: PriceRange {
                min_variant_price: money(min),
                max_variant_price: money(max),
            },
            compare_at_price_range,
            featured_image: images.first().cloned(),
            images,
            options: p
                .options
                .into_iter()
                .map(|o| ProductOption {
                    id: o.id.unwrap_or_else(|| o.name.clone()),
                    name: o.name,
                    values: o.values,
                })
                .collect(),
            variants,
            requires_selling_plan: p.requires_selling_plan,
            selling_plan_groups: p.selling_plan_groups,
        }
    }
}

impl From<PlatformCollection> for Collection {
    fn from(c: PlatformCollection) -> Self {
        Self {
            id: c.id,
            handle: c.handle,
            title: c.title,
            description: c.description,
            description_html: c.description_html,
            seo: None,
            image: c.image.map(Image::from),
            products: c.products.into_iter().map(Product::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_price_ranges_from_variants() {
        let envelope: ProductEnvelope = serde_json::from_value(json!({
            "product": {
                "id": "p1",
                "handle": "candle",
                "title": "Candle",
                "currencyCode": "EUR",
                "images": [{ "url": "https://cdn.example/candle.jpg" }],
                "variants": [
                    { "id": "v1", "title": "Small", "price": "12.50", "compareAtPrice": "15.00" },
                    { "id": "v2", "title": "Large", "price": 20, "availableForSale": false }
                ]
            }
        }))
        .unwrap();

        let product = Product::from(envelope.product);
        assert_eq!(product.price_range.min_variant_price.display(), "€12.50");
        assert_eq!(product.price_range.max_variant_price.display(), "€20.00");
        assert_eq!(
            product
                .compare_at_price_range
                .as_ref()
                .map(|r| r.max_variant_price.amount),
            Some(Decimal::new(15, 0))
        );
        assert!(product.available_for_sale);
        assert!(!product.variants[1].available_for_sale);
        assert_eq!(
            product.featured_image.map(|i| i.url).as_deref(),
            Some("https://cdn.example/candle.jpg")
        );
        assert!(product.seo.is_none());
    }

    #[test]
    fn test_product_without_variants_defaults() {
        let product = Product::from(PlatformProduct {
            handle: "gift-card".to_string(),
            ..PlatformProduct::default()
        });
        assert_eq!(product.price_range.min_variant_price.display(), "$0.00");
        assert!(!product.available_for_sale);
        assert!(product.compare_at_price_range.is_none());
    }

    #[test]
    fn test_brand_config_features() {
        let config: BrandConfig =
            serde_json::from_value(json!({ "id": "b1", "name": "Acme", "features": ["booking"] }))
                .unwrap();
        assert!(config.has_feature("booking"));
        assert!(!config.has_feature("subscriptions"));
    }
}
