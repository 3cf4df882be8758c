//! Integration tests for the storefront SDK.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-sdk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `platform_client` - Platform REST catalog calls and error bodies
//! - `customer` - Customer session, profile and subscription calls
//! - `shopify_client` - Storefront API queries, caching and cart mutations
//! - `graphql_client` - Generic GraphQL client
//! - `widgets` - Booking wizard, application forms and add-to-cart flows
//!
//! Each test starts its own `mockito` server. This library holds the
//! response fixtures they share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use serde_json::{Value, json};
use storefront_sdk::config::PlatformConfig;

/// API key used by every platform fixture client.
pub const API_KEY: &str = "test-brand-key";

/// Platform config pointing at a mock server.
#[must_use]
pub fn platform_config(base_url: &str) -> PlatformConfig {
    PlatformConfig::new(base_url, API_KEY)
}

/// A platform product record with two variants, the second sold out.
#[must_use]
pub fn platform_product(handle: &str) -> Value {
    json!({
        "id": format!("prod-{handle}"),
        "handle": handle,
        "title": "Cold Brew Concentrate",
        "description": "Smooth and strong.",
        "vendor": "Roastery",
        "currencyCode": "USD",
        "images": [{ "url": "https://cdn.shopify.com/s/files/cold-brew.jpg", "altText": "Bottle" }],
        "variants": [
            { "id": "var-1", "title": "32 oz", "price": "24.00", "compareAtPrice": "30.00" },
            { "id": "var-2", "title": "64 oz", "price": "42.00", "availableForSale": false }
        ]
    })
}

/// `GET /api/storefront/products/{handle}` body.
#[must_use]
pub fn platform_product_body(handle: &str) -> String {
    json!({ "product": platform_product(handle) }).to_string()
}

fn money(amount: &str) -> Value {
    json!({ "amount": amount, "currencyCode": "USD" })
}

/// A Storefront API `Product` node as returned by the product queries.
#[must_use]
pub fn shopify_product_node(handle: &str) -> Value {
    json!({
        "id": "gid://shopify/Product/1001",
        "handle": handle,
        "title": "Single Origin Beans",
        "description": "Washed Ethiopian.",
        "descriptionHtml": "<p>Washed Ethiopian.</p>",
        "availableForSale": true,
        "productType": "Coffee",
        "vendor": "Roastery",
        "tags": ["coffee"],
        "onlineStoreUrl": null,
        "seo": { "title": null, "description": null },
        "priceRange": { "minVariantPrice": money("18.00"), "maxVariantPrice": money("18.00") },
        "compareAtPriceRange": { "minVariantPrice": money("0.0"), "maxVariantPrice": money("0.0") },
        "featuredImage": {
            "id": "gid://shopify/ProductImage/1",
            "url": "https://cdn.shopify.com/s/files/beans.jpg",
            "altText": null,
            "width": 1200,
            "height": 1200
        },
        "images": { "edges": [] },
        "options": [],
        "variants": { "edges": [{ "node": {
            "id": "gid://shopify/ProductVariant/2001",
            "title": "Default Title",
            "availableForSale": true,
            "quantityAvailable": 12,
            "sku": "BEANS-12",
            "price": money("18.00"),
            "compareAtPrice": null,
            "selectedOptions": [{ "name": "Title", "value": "Default Title" }],
            "image": null
        }}]},
        "requiresSellingPlan": false,
        "sellingPlanGroups": { "edges": [] }
    })
}

/// A GraphQL response envelope with `data` only.
#[must_use]
pub fn graphql_data(data: &Value) -> String {
    json!({ "data": data }).to_string()
}

/// A GraphQL response envelope carrying one error at `path`.
#[must_use]
pub fn graphql_error(message: &str, path: &[&str]) -> String {
    json!({
        "data": null,
        "errors": [{
            "message": message,
            "locations": [{ "line": 1, "column": 3 }],
            "path": path
        }]
    })
    .to_string()
}

/// A customer subscription record with the given status.
#[must_use]
pub fn subscription(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "productTitle": "Cold Brew Concentrate",
        "variantTitle": "32 oz",
        "quantity": 1,
        "price": "21.60",
        "currencyCode": "USD",
        "frequency": { "interval": "week", "intervalCount": 2 },
        "nextBillingDate": "2026-11-01"
    })
}
