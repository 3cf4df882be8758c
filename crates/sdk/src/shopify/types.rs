//! Shopify-only domain types: the remote cart and its inputs.
//!
//! Catalog types shared with the platform client live in [`crate::types`].

use serde::{Deserialize, Serialize};
use storefront_sdk_core::Money;

use crate::types::{Image, SelectedOption};

// =============================================================================
// Cart Types
// =============================================================================

/// A key/value attribute on a cart or line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: Option<String>,
}

/// Attribute sent with a line or cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInput {
    pub key: String,
    pub value: String,
}

/// The product a cart line belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandiseProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
}

/// The variant bought on a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<Image>,
    pub product: CartMerchandiseProduct,
}

/// Per-unit and line amounts. `total_amount` is after line discounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    pub amount_per_quantity: Money,
    pub compare_at_amount_per_quantity: Option<Money>,
    pub subtotal_amount: Money,
    pub total_amount: Money,
}

/// One line of a remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
    pub attributes: Vec<Attribute>,
    pub cost: CartLineCost,
    pub merchandise: CartMerchandise,
}

/// Cart totals. Tax is absent until checkout computes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal: Money,
    pub total: Money,
    pub total_tax: Option<Money>,
}

/// A discount code and whether it currently applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDiscountCode {
    pub code: String,
    pub applicable: bool,
}

/// A cart held by Shopify, addressed by its GID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub checkout_url: String,
    pub note: Option<String>,
    pub total_quantity: u32,
    pub attributes: Vec<Attribute>,
    pub cost: CartCost,
    pub discount_codes: Vec<CartDiscountCode>,
    pub lines: Vec<CartLine>,
}

// =============================================================================
// Cart Inputs
// =============================================================================

/// A line to add. Set `selling_plan_id` to buy on subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_plan_id: Option<String>,
}

impl CartLineInput {
    /// A plain one-time purchase line.
    #[must_use]
    pub fn new(merchandise_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            merchandise_id: merchandise_id.into(),
            quantity,
            attributes: None,
            selling_plan_id: None,
        }
    }
}

/// Changes to an existing line; unset fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchandise_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_plan_id: Option<String>,
}

/// A validation error returned by a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUserError {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Which recommendations to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductRecommendationIntent {
    #[default]
    Related,
    Complementary,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_input_skips_unset_fields() {
        let json = serde_json::to_value(CartLineInput::new("gid://shopify/ProductVariant/1", 2))
            .unwrap();
        assert_eq!(json["merchandiseId"], "gid://shopify/ProductVariant/1");
        assert_eq!(json["quantity"], 2);
        assert!(json.get("sellingPlanId").is_none());
        assert!(json.get("attributes").is_none());
    }

    #[test]
    fn test_recommendation_intent_wire_names() {
        assert_eq!(
            serde_json::to_value(ProductRecommendationIntent::Complementary).unwrap(),
            "COMPLEMENTARY"
        );
    }
}
