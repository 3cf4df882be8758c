//! Product type conversion functions.

use crate::types::{
    Product, ProductConnection, ProductOption, ProductVariant, SellingPlan, SellingPlanGroup,
    SellingPlanOption, SellingPlanPriceAdjustment, SellingPlanPriceAdjustmentValue,
};

use super::super::wire::{
    AdjustmentValueWire, Connection, Edges, PriceAdjustmentWire, ProductNode, ProductOptionWire,
    SellingPlanGroupNode, VariantNode,
};
use super::{convert_image, convert_page_info, convert_price_range, convert_selected_option, convert_seo};

pub fn convert_product(p: ProductNode) -> Product {
    Product {
        id: p.id,
        handle: p.handle,
        title: p.title,
        description: p.description,
        description_html: p.description_html,
        available_for_sale: p.available_for_sale,
        product_type: p.product_type,
        vendor: p.vendor,
        tags: p.tags,
        online_store_url: p.online_store_url,
        seo: Some(convert_seo(p.seo)),
        price_range: convert_price_range(p.price_range),
        compare_at_price_range: Some(convert_price_range(p.compare_at_price_range)),
        featured_image: p.featured_image.map(convert_image),
        images: p.images.into_nodes().map(convert_image).collect(),
        options: p.options.into_iter().map(convert_option).collect(),
        variants: p.variants.into_nodes().map(convert_variant).collect(),
        requires_selling_plan: p.requires_selling_plan,
        selling_plan_groups: convert_selling_plan_groups(p.selling_plan_groups),
    }
}

pub fn convert_product_connection(connection: Connection<ProductNode>) -> ProductConnection {
    ProductConnection {
        products: connection
            .edges
            .into_iter()
            .map(|e| convert_product(e.node))
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}

fn convert_option(o: ProductOptionWire) -> ProductOption {
    ProductOption {
        id: o.id,
        name: o.name,
        values: o.option_values.into_iter().map(|v| v.name).collect(),
    }
}

fn convert_variant(v: VariantNode) -> ProductVariant {
    ProductVariant {
        id: v.id,
        title: v.title,
        available_for_sale: v.available_for_sale,
        quantity_available: v.quantity_available,
        sku: v.sku,
        price: v.price,
        compare_at_price: v.compare_at_price,
        selected_options: v
            .selected_options
            .into_iter()
            .map(convert_selected_option)
            .collect(),
        image: v.image.map(convert_image),
    }
}

// =============================================================================
// Selling Plan Conversions
// =============================================================================

fn convert_selling_plan_groups(groups: Edges<SellingPlanGroupNode>) -> Vec<SellingPlanGroup> {
    groups
        .into_nodes()
        .map(|group| SellingPlanGroup {
            name: group.name,
            selling_plans: group
                .selling_plans
                .into_nodes()
                .map(|sp| SellingPlan {
                    id: sp.id,
                    name: sp.name,
                    description: sp.description,
                    options: sp
                        .options
                        .into_iter()
                        .map(|opt| SellingPlanOption {
                            name: opt.name.unwrap_or_default(),
                            value: opt.value.unwrap_or_default(),
                        })
                        .collect(),
                    price_adjustments: sp
                        .price_adjustments
                        .into_iter()
                        .map(convert_price_adjustment)
                        .collect(),
                    recurring_deliveries: sp.recurring_deliveries,
                })
                .collect(),
        })
        .collect()
}

fn convert_price_adjustment(adj: PriceAdjustmentWire) -> SellingPlanPriceAdjustment {
    let adjustment_value = match adj.adjustment_value {
        AdjustmentValueWire::SellingPlanPercentagePriceAdjustment {
            adjustment_percentage,
        } => SellingPlanPriceAdjustmentValue::Percentage(adjustment_percentage),
        AdjustmentValueWire::SellingPlanFixedAmountPriceAdjustment { adjustment_amount } => {
            SellingPlanPriceAdjustmentValue::FixedAmount(adjustment_amount)
        }
        AdjustmentValueWire::SellingPlanFixedPriceAdjustment { price } => {
            SellingPlanPriceAdjustmentValue::FixedPrice(price)
        }
    };

    SellingPlanPriceAdjustment {
        adjustment_value,
        order_count: adj.order_count,
    }
}
