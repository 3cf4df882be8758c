//! Wire shapes of Storefront API responses.
//!
//! One struct per GraphQL fragment; `Edges<T>` models the cursor
//! pagination envelope. These never leave the storefront module: the
//! `conversions` functions turn them into the public domain types.

use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_sdk_core::Money;

// =============================================================================
// Envelopes
// =============================================================================

/// `{ edges: [{ node }] }` pagination envelope.
#[derive(Debug, Deserialize)]
pub struct Edges<T> {
    pub edges: Vec<Edge<T>>,
}

impl<T> Edges<T> {
    /// Unwrap the nodes in order.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// An `Edges<T>` with page info.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub page_info: PageInfoWire,
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoWire {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

// =============================================================================
// Shared Fields
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageWire {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SeoWire {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeWire {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

#[derive(Debug, Deserialize)]
pub struct SelectedOptionWire {
    pub name: String,
    pub value: String,
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub available_for_sale: bool,
    pub product_type: String,
    pub vendor: String,
    pub tags: Vec<String>,
    pub online_store_url: Option<String>,
    pub seo: SeoWire,
    pub price_range: PriceRangeWire,
    pub compare_at_price_range: PriceRangeWire,
    pub featured_image: Option<ImageWire>,
    pub images: Edges<ImageWire>,
    pub options: Vec<ProductOptionWire>,
    pub variants: Edges<VariantNode>,
    pub requires_selling_plan: bool,
    pub selling_plan_groups: Edges<SellingPlanGroupNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionWire {
    pub id: String,
    pub name: String,
    pub option_values: Vec<OptionValueWire>,
}

#[derive(Debug, Deserialize)]
pub struct OptionValueWire {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub quantity_available: Option<i64>,
    pub sku: Option<String>,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub selected_options: Vec<SelectedOptionWire>,
    pub image: Option<ImageWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingPlanGroupNode {
    pub name: String,
    pub selling_plans: Edges<SellingPlanNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingPlanNode {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub recurring_deliveries: bool,
    pub options: Vec<SellingPlanOptionWire>,
    pub price_adjustments: Vec<PriceAdjustmentWire>,
}

#[derive(Debug, Deserialize)]
pub struct SellingPlanOptionWire {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAdjustmentWire {
    pub order_count: Option<u32>,
    pub adjustment_value: AdjustmentValueWire,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
pub enum AdjustmentValueWire {
    #[serde(rename_all = "camelCase")]
    SellingPlanPercentagePriceAdjustment { adjustment_percentage: Decimal },
    #[serde(rename_all = "camelCase")]
    SellingPlanFixedAmountPriceAdjustment { adjustment_amount: Money },
    SellingPlanFixedPriceAdjustment { price: Money },
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendationsData {
    pub product_recommendations: Option<Vec<ProductNode>>,
}

// =============================================================================
// Collections
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub seo: SeoWire,
    pub image: Option<ImageWire>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionWithProducts {
    #[serde(flatten)]
    pub collection: CollectionNode,
    pub products: Connection<CollectionProductNode>,
}

/// The reduced product shape fetched inside a collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub available_for_sale: bool,
    pub product_type: String,
    pub price_range: PriceRangeWire,
    pub compare_at_price_range: PriceRangeWire,
    pub featured_image: Option<ImageWire>,
    pub images: Edges<ImageWire>,
    pub variants: Edges<CollectionVariantNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionVariantNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: Money,
    pub compare_at_price: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionData {
    pub collection: Option<CollectionWithProducts>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsData {
    pub collections: Connection<CollectionNode>,
}

// =============================================================================
// Carts
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AttributeWire {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: String,
    pub note: Option<String>,
    pub total_quantity: u32,
    pub attributes: Vec<AttributeWire>,
    pub cost: CartCostWire,
    pub discount_codes: Vec<DiscountCodeWire>,
    pub lines: Edges<CartLineNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostWire {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    pub total_tax_amount: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct DiscountCodeWire {
    pub code: String,
    pub applicable: bool,
}

/// Cart line union; only plain `CartLine` is supported.
#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
pub enum CartLineNode {
    CartLine(CartLineWire),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineWire {
    pub id: String,
    pub quantity: u32,
    pub attributes: Vec<AttributeWire>,
    pub cost: CartLineCostWire,
    pub merchandise: MerchandiseWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostWire {
    pub amount_per_quantity: Money,
    pub compare_at_amount_per_quantity: Option<Money>,
    pub subtotal_amount: Money,
    pub total_amount: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseWire {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub selected_options: Vec<SelectedOptionWire>,
    pub image: Option<ImageWire>,
    pub product: MerchandiseProductWire,
}

#[derive(Debug, Deserialize)]
pub struct MerchandiseProductWire {
    pub id: String,
    pub handle: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CartUserErrorWire {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// `{ cart, userErrors }` payload shared by every cart mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<CartUserErrorWire>,
}

#[derive(Debug, Deserialize)]
pub struct CartData {
    pub cart: Option<CartNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartData {
    pub cart_create: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartData {
    pub cart_lines_add: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartLinesData {
    pub cart_lines_update: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartData {
    pub cart_lines_remove: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiscountCodesData {
    pub cart_discount_codes_update: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartNoteData {
    pub cart_note_update: Option<CartPayload>,
}
