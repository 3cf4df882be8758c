//! Cache types for Storefront API responses.

use crate::types::{Collection, CollectionConnection, Product, ProductConnection};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductConnection),
    Collection(Box<Collection>),
    Collections(CollectionConnection),
}

pub fn product_key(handle: &str) -> String {
    format!("product:{handle}")
}

pub fn products_key(first: u32, after: Option<&str>) -> String {
    format!("products:{first}:{}", after.unwrap_or(""))
}

pub fn collection_key(handle: &str, product_count: u32, after: Option<&str>) -> String {
    format!("collection:{handle}:{product_count}:{}", after.unwrap_or(""))
}

pub fn collections_key(first: u32, after: Option<&str>) -> String {
    format!("collections:{first}:{}", after.unwrap_or(""))
}
