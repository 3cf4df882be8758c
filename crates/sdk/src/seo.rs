//! schema.org JSON-LD documents for storefront pages.
//!
//! Each builder returns a `serde_json::Value`; embed it with
//! `<script type="application/ld+json">`. Page URLs are derived from the
//! store's base URL: `/products/{handle}` and `/collections/{handle}`.

use serde_json::{Map, Value, json};
use storefront_sdk_core::extract_numeric_id;

use crate::types::{Collection, Product, ProductVariant};

const CONTEXT: &str = "https://schema.org";
const IN_STOCK: &str = "https://schema.org/InStock";
const OUT_OF_STOCK: &str = "https://schema.org/OutOfStock";

fn product_url(base_url: &str, handle: &str) -> String {
    format!("{}/products/{handle}", base_url.trim_end_matches('/'))
}

fn offer(variant: &ProductVariant, url: &str) -> Value {
    let url = extract_numeric_id(&variant.id)
        .map_or_else(|| url.to_string(), |id| format!("{url}?variant={id}"));

    let mut offer = json!({
        "@type": "Offer",
        "url": url,
        "price": variant.price.amount.to_string(),
        "priceCurrency": variant.price.currency_code,
        "availability": if variant.available_for_sale { IN_STOCK } else { OUT_OF_STOCK },
    });
    if let Some(sku) = variant.sku.as_deref().filter(|s| !s.is_empty()) {
        offer["sku"] = json!(sku);
    }
    offer
}

/// `Product` document. Several variants become an `AggregateOffer`.
#[must_use]
pub fn product_json_ld(product: &Product, base_url: &str) -> Value {
    let url = product_url(base_url, &product.handle);
    let mut doc = json!({
        "@context": CONTEXT,
        "@type": "Product",
        "name": product.title,
        "url": url,
        "image": product.images.iter().map(|i| i.url.as_str()).collect::<Vec<_>>(),
    });

    let description = product
        .seo
        .as_ref()
        .and_then(|s| s.description.as_deref())
        .unwrap_or(&product.description);
    if !description.is_empty() {
        doc["description"] = json!(description);
    }
    if !product.vendor.is_empty() {
        doc["brand"] = json!({ "@type": "Brand", "name": product.vendor });
    }
    if doc["image"].as_array().is_some_and(Vec::is_empty)
        && let Some(image) = product.primary_image()
    {
        doc["image"] = json!([image.url]);
    }

    let offers: Vec<Value> = product.variants.iter().map(|v| offer(v, &url)).collect();
    doc["offers"] = match offers.len() {
        0 => Value::Null,
        1 => offers.into_iter().next().unwrap_or(Value::Null),
        count => json!({
            "@type": "AggregateOffer",
            "lowPrice": product.price_range.min_variant_price.amount.to_string(),
            "highPrice": product.price_range.max_variant_price.amount.to_string(),
            "priceCurrency": product.price_range.min_variant_price.currency_code,
            "offerCount": count,
            "offers": offers,
        }),
    };
    if doc["offers"].is_null()
        && let Some(map) = doc.as_object_mut()
    {
        map.remove("offers");
    }

    doc
}

/// `BreadcrumbList` from `(name, url)` pairs, outermost first.
#[must_use]
pub fn breadcrumb_json_ld(items: &[(&str, &str)]) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items
            .iter()
            .enumerate()
            .map(|(i, (name, url))| json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": url,
            }))
            .collect::<Vec<_>>(),
    })
}

/// `Organization` document for the store.
#[must_use]
pub fn organization_json_ld(
    name: &str,
    url: &str,
    logo_url: Option<&str>,
    same_as: &[&str],
) -> Value {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(CONTEXT));
    doc.insert("@type".into(), json!("Organization"));
    doc.insert("name".into(), json!(name));
    doc.insert("url".into(), json!(url));
    if let Some(logo) = logo_url {
        doc.insert("logo".into(), json!(logo));
    }
    if !same_as.is_empty() {
        doc.insert("sameAs".into(), json!(same_as));
    }
    Value::Object(doc)
}

/// `CollectionPage` whose main entity lists the collection's products.
#[must_use]
pub fn collection_json_ld(collection: &Collection, base_url: &str) -> Value {
    let base = base_url.trim_end_matches('/');
    json!({
        "@context": CONTEXT,
        "@type": "CollectionPage",
        "name": collection.title,
        "description": collection.description,
        "url": format!("{base}/collections/{}", collection.handle),
        "mainEntity": {
            "@type": "ItemList",
            "numberOfItems": collection.products.len(),
            "itemListElement": collection
                .products
                .iter()
                .enumerate()
                .map(|(i, p)| json!({
                    "@type": "ListItem",
                    "position": i + 1,
                    "url": product_url(base, &p.handle),
                    "name": p.title,
                }))
                .collect::<Vec<_>>(),
        },
    })
}
