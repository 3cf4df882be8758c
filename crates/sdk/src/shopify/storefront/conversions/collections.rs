//! Collection type conversion functions.

use crate::types::{Collection, CollectionConnection, Product, ProductVariant};

use super::super::wire::{
    CollectionNode, CollectionProductNode, CollectionVariantNode, CollectionWithProducts,
    Connection,
};
use super::{convert_image, convert_page_info, convert_price_range, convert_seo};

pub fn convert_collection(collection: CollectionWithProducts) -> Collection {
    let mut converted = convert_collection_node(collection.collection);
    converted.products = collection
        .products
        .edges
        .into_iter()
        .map(|e| convert_collection_product(e.node))
        .collect();
    converted
}

pub fn convert_collection_connection(
    connection: Connection<CollectionNode>,
) -> CollectionConnection {
    CollectionConnection {
        collections: connection
            .edges
            .into_iter()
            .map(|e| convert_collection_node(e.node))
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}

fn convert_collection_node(c: CollectionNode) -> Collection {
    Collection {
        id: c.id,
        handle: c.handle,
        title: c.title,
        description: c.description,
        description_html: c.description_html,
        seo: Some(convert_seo(c.seo)),
        image: c.image.map(convert_image),
        products: Vec::new(),
    }
}

/// Expand the reduced collection product into a full [`Product`].
///
/// Fields the collection query does not fetch are filled with empty
/// defaults here, and only here: `vendor`, `tags`, `options`,
/// `description_html`, `seo`, selling plans, and each variant's
/// `selected_options`, `image`, `sku` and `quantity_available`. Fetch the
/// product by handle when those are needed.
fn convert_collection_product(p: CollectionProductNode) -> Product {
    Product {
        id: p.id,
        handle: p.handle,
        title: p.title,
        description: p.description,
        description_html: String::new(),
        available_for_sale: p.available_for_sale,
        product_type: p.product_type,
        vendor: String::new(),
        tags: Vec::new(),
        online_store_url: None,
        seo: None,
        price_range: convert_price_range(p.price_range),
        compare_at_price_range: Some(convert_price_range(p.compare_at_price_range)),
        featured_image: p.featured_image.map(convert_image),
        images: p.images.into_nodes().map(convert_image).collect(),
        options: Vec::new(),
        variants: p
            .variants
            .into_nodes()
            .map(convert_collection_variant)
            .collect(),
        requires_selling_plan: false,
        selling_plan_groups: Vec::new(),
    }
}

fn convert_collection_variant(v: CollectionVariantNode) -> ProductVariant {
    ProductVariant {
        id: v.id,
        title: v.title,
        available_for_sale: v.available_for_sale,
        quantity_available: None,
        sku: None,
        price: v.price,
        compare_at_price: v.compare_at_price,
        selected_options: Vec::new(),
        image: None,
    }
}
