//! Catalog domain types.
//!
//! Both the platform REST client and the Shopify client convert their wire
//! shapes into these types, so loaders and widgets work against one model
//! regardless of the backing source.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_sdk_core::Money;

// =============================================================================
// Price Types
// =============================================================================

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

impl PriceRange {
    /// A range where every variant has the same price.
    #[must_use]
    pub fn single(price: Money) -> Self {
        Self {
            min_variant_price: price.clone(),
            max_variant_price: price,
        }
    }

    /// Whether min and max differ.
    #[must_use]
    pub fn is_range(&self) -> bool {
        self.min_variant_price.amount != self.max_variant_price.amount
    }
}

// =============================================================================
// Image Types
// =============================================================================

/// An image on the CDN, with its intrinsic size when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Selling Plan Types (Subscriptions)
// =============================================================================

/// Price adjustment applied by a selling plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SellingPlanPriceAdjustmentValue {
    /// Percentage discount (e.g. 15 for 15% off).
    Percentage(Decimal),
    /// Fixed amount off the variant price.
    FixedAmount(Money),
    /// Fixed price replacing the variant price.
    FixedPrice(Money),
}

/// Price adjustment for a selling plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingPlanPriceAdjustment {
    /// The type and value of the adjustment.
    pub adjustment_value: SellingPlanPriceAdjustmentValue,
    /// Number of orders this adjustment applies to (`None` = all orders).
    pub order_count: Option<u32>,
}

/// An option on a selling plan (e.g. delivery frequency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellingPlanOption {
    /// Option name (e.g. "Delivery every").
    pub name: String,
    /// Option value (e.g. "30 days").
    pub value: String,
}

/// A single selling plan (subscription cadence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingPlan {
    /// Selling plan ID (pass to cart).
    pub id: String,
    /// Display name (e.g. "Delivery every 30 days").
    pub name: String,
    pub description: Option<String>,
    pub options: Vec<SellingPlanOption>,
    /// Price adjustments (discounts).
    pub price_adjustments: Vec<SellingPlanPriceAdjustment>,
    /// Whether this plan has recurring deliveries.
    pub recurring_deliveries: bool,
}

/// A group of selling plans (e.g. "Subscribe & Save").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingPlanGroup {
    pub name: String,
    pub selling_plans: Vec<SellingPlan>,
}

// =============================================================================
// Product Types
// =============================================================================

/// An option value chosen by a variant, e.g. `Size: Large`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g. "Size").
    pub name: String,
    /// Selected value (e.g. "Large").
    pub value: String,
}

/// An option a product varies by and its possible values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: String,
    /// Option name (e.g. "Size").
    pub name: String,
    /// Available values (e.g. `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// One purchasable combination of option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Quantity available (if inventory tracking is enabled).
    pub quantity_available: Option<i64>,
    pub sku: Option<String>,
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<Image>,
}

impl ProductVariant {
    /// Whether the compare-at price is above the current price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .as_ref()
            .is_some_and(|c| c.amount > self.price.amount)
    }
}

/// A product as both backends describe it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    pub product_type: String,
    pub vendor: String,
    pub tags: Vec<String>,
    pub online_store_url: Option<String>,
    pub seo: Option<Seo>,
    pub price_range: PriceRange,
    /// Compare-at price range.
    pub compare_at_price_range: Option<PriceRange>,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
    /// Whether the product can only be bought on a selling plan.
    pub requires_selling_plan: bool,
    /// Selling plan groups (subscription options).
    pub selling_plan_groups: Vec<SellingPlanGroup>,
}

impl Product {
    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// The first variant available for sale, else the first variant.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }

    /// Featured image, falling back to the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&Image> {
        self.featured_image.as_ref().or_else(|| self.images.first())
    }

    /// Every selling plan across all groups.
    pub fn selling_plans(&self) -> impl Iterator<Item = &SellingPlan> {
        self.selling_plan_groups
            .iter()
            .flat_map(|g| g.selling_plans.iter())
    }
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection with the first page of its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub seo: Option<Seo>,
    pub image: Option<Image>,
    /// Products in this collection.
    pub products: Vec<Product>,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Cursor pagination state of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Paginated list of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    pub products: Vec<Product>,
    pub page_info: PageInfo,
}

/// Paginated list of collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConnection {
    pub collections: Vec<Collection>,
    pub page_info: PageInfo,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use std::str::FromStr;

    use super::*;

    pub(crate) fn usd(amount: &str) -> Money {
        Money::new(Decimal::from_str(amount).unwrap(), "USD")
    }

    pub(crate) fn variant(id: &str, price: &str, available: bool) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            title: format!("Variant {id}"),
            available_for_sale: available,
            quantity_available: None,
            sku: None,
            price: usd(price),
            compare_at_price: None,
            selected_options: Vec::new(),
            image: None,
        }
    }

    pub(crate) fn product(handle: &str, variants: Vec<ProductVariant>) -> Product {
        let price = variants
            .first()
            .map_or_else(|| usd("0"), |v| v.price.clone());
        Product {
            id: format!("gid://shopify/Product/{}", handle.len()),
            handle: handle.to_string(),
            title: handle.replace('-', " "),
            description: String::new(),
            description_html: String::new(),
            available_for_sale: variants.iter().any(|v| v.available_for_sale),
            product_type: String::new(),
            vendor: "Acme".to_string(),
            tags: Vec::new(),
            online_store_url: None,
            seo: None,
            price_range: PriceRange::single(price),
            compare_at_price_range: None,
            featured_image: None,
            images: Vec::new(),
            options: Vec::new(),
            variants,
            requires_selling_plan: false,
            selling_plan_groups: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::{product, usd, variant};
    use super::*;

    #[test]
    fn test_default_variant_prefers_available() {
        let p = product(
            "tee",
            vec![variant("1", "10", false), variant("2", "12", true)],
        );
        assert_eq!(p.default_variant().map(|v| v.id.as_str()), Some("2"));

        let sold_out = product("hat", vec![variant("3", "5", false)]);
        assert_eq!(sold_out.default_variant().map(|v| v.id.as_str()), Some("3"));
    }

    #[test]
    fn test_variant_is_on_sale() {
        let mut v = variant("1", "80", true);
        assert!(!v.is_on_sale());
        v.compare_at_price = Some(usd("100"));
        assert!(v.is_on_sale());
        v.compare_at_price = Some(usd("80"));
        assert!(!v.is_on_sale());
    }

    #[test]
    fn test_price_range_is_range() {
        assert!(!PriceRange::single(usd("5")).is_range());
        let range = PriceRange {
            min_variant_price: usd("5"),
            max_variant_price: usd("9"),
        };
        assert!(range.is_range());
    }
}
