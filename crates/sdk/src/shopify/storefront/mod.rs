//! Shopify Storefront API client implementation.
//!
//! Sends hand-written GraphQL documents with `reqwest` and decodes the
//! `graphql_client` response envelope. Caches products and collections
//! using `moka`.

mod cache;
mod conversions;
mod queries;
mod wire;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::config::{ShopifyConfig, expose};
use crate::graphql::{split_response, truncate};
use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, CartUserError, ProductRecommendationIntent,
};
use crate::types::{Collection, CollectionConnection, Product, ProductConnection};

use cache::CacheValue;
use conversions::{
    convert_cart, convert_collection, convert_collection_connection, convert_product,
    convert_product_connection, convert_user_error,
};
use wire::{
    AddToCartData, CartData, CartPayload, CollectionData, CollectionsData, CreateCartData,
    ProductData, ProductRecommendationsData, ProductsData, RemoveFromCartData,
    UpdateCartLinesData, UpdateCartNoteData, UpdateDiscountCodesData,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// ShopifyClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides access to products, collections, and cart operations.
/// Products and collections are cached for the configured TTL.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Option<Cache<String, CacheValue>>,
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("endpoint", &self.inner.endpoint)
            .field("access_token", &"[REDACTED]")
            .field("cached", &self.inner.cache.is_some())
            .finish()
    }
}

impl ShopifyClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self::with_endpoint(
            config.endpoint(),
            expose(&config.storefront_access_token),
            config.cache_ttl,
        )
    }

    /// Create a client for an explicit GraphQL endpoint.
    ///
    /// A zero `cache_ttl` disables caching.
    #[must_use]
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
        cache_ttl: Duration,
    ) -> Self {
        let cache = (!cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(cache_ttl)
                .support_invalidation_closures()
                .build()
        });

        Self {
            inner: Arc::new(ShopifyClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token: access_token.into(),
                cache,
            }),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<V, T>(
        &self,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request_body = QueryBody {
            variables,
            query,
            operation_name,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = operation_name,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::graphql(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            )));
        }

        let response: Response<serde_json::Value> = match serde_json::from_str(&response_text)
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = operation_name,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        // Partial data may not fit `T`, so errors are checked before decoding.
        let data = split_response(response)?.ok_or_else(|| {
            tracing::error!(
                operation = operation_name,
                body = %truncate(&response_text, 500),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::graphql("No data in response")
        })?;

        serde_json::from_value(data).map_err(|e| {
            tracing::error!(
                error = %e,
                operation = operation_name,
                body = %truncate(&response_text, 500),
                "Shopify GraphQL data did not match the expected shape"
            );
            ShopifyError::Parse(e)
        })
    }

    async fn cached(&self, key: &str) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn store(&self, key: String, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = cache::product_key(handle);

        if let Some(CacheValue::Product(product)) = self.cached(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data: ProductData = self
            .execute(
                "GetProductByHandle",
                queries::GET_PRODUCT_BY_HANDLE,
                json!({ "handle": handle }),
            )
            .await?;

        let product_data = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        let product = convert_product(product_data);

        self.store(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated list of products.
    ///
    /// Search queries bypass the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        first: u32,
        after: Option<String>,
        query: Option<String>,
    ) -> Result<ProductConnection, ShopifyError> {
        let cache_key = cache::products_key(first, after.as_deref());

        if query.is_none()
            && let Some(CacheValue::Products(products)) = self.cached(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data: ProductsData = self
            .execute(
                "GetProducts",
                queries::GET_PRODUCTS,
                json!({ "first": first, "after": after, "query": query }),
            )
            .await?;

        let connection = convert_product_connection(data.products);

        if query.is_none() {
            self.store(cache_key, CacheValue::Products(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    /// Get product recommendations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_recommendations(
        &self,
        product_id: &str,
        intent: Option<ProductRecommendationIntent>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let data: ProductRecommendationsData = self
            .execute(
                "GetProductRecommendations",
                queries::GET_PRODUCT_RECOMMENDATIONS,
                json!({ "productId": product_id, "intent": intent }),
            )
            .await?;

        Ok(data
            .product_recommendations
            .map(|recs| recs.into_iter().map(convert_product).collect())
            .unwrap_or_default())
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get a collection by its handle, with up to `product_count` products.
    ///
    /// Collection products carry a reduced field set; see
    /// [`Collection::products`].
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_by_handle(
        &self,
        handle: &str,
        product_count: u32,
        after: Option<String>,
    ) -> Result<Collection, ShopifyError> {
        let cache_key = cache::collection_key(handle, product_count, after.as_deref());

        if let Some(CacheValue::Collection(collection)) = self.cached(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let data: CollectionData = self
            .execute(
                "GetCollectionByHandle",
                queries::GET_COLLECTION_BY_HANDLE,
                json!({ "handle": handle, "productCount": product_count, "after": after }),
            )
            .await?;

        let collection_data = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        let collection = convert_collection(collection_data);

        self.store(
            cache_key,
            CacheValue::Collection(Box::new(collection.clone())),
        )
        .await;

        Ok(collection)
    }

    /// Get a paginated list of collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(
        &self,
        first: u32,
        after: Option<String>,
        query: Option<String>,
    ) -> Result<CollectionConnection, ShopifyError> {
        let cache_key = cache::collections_key(first, after.as_deref());

        if query.is_none()
            && let Some(CacheValue::Collections(collections)) = self.cached(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data: CollectionsData = self
            .execute(
                "GetCollections",
                queries::GET_COLLECTIONS,
                json!({ "first": first, "after": after, "query": query }),
            )
            .await?;

        let connection = convert_collection_connection(data.collections);

        if query.is_none() {
            self.store(cache_key, CacheValue::Collections(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Create a new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(
        &self,
        lines: Option<Vec<CartLineInput>>,
        note: Option<String>,
    ) -> Result<Cart, ShopifyError> {
        let data: CreateCartData = self
            .execute(
                "CreateCart",
                queries::CREATE_CART,
                json!({ "input": { "lines": lines, "note": note } }),
            )
            .await?;

        cart_from_payload(data.cart_create, "create cart")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, ShopifyError> {
        let data: CartData = self
            .execute("GetCart", queries::GET_CART, json!({ "cartId": cart_id }))
            .await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let data: AddToCartData = self
            .execute(
                "AddToCart",
                queries::ADD_TO_CART,
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;

        cart_from_payload(data.cart_lines_add, "add to cart")
    }

    /// Update cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let data: UpdateCartLinesData = self
            .execute(
                "UpdateCartLines",
                queries::UPDATE_CART_LINES,
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;

        cart_from_payload(data.cart_lines_update, "update cart")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let data: RemoveFromCartData = self
            .execute(
                "RemoveFromCart",
                queries::REMOVE_FROM_CART,
                json!({ "cartId": cart_id, "lineIds": line_ids }),
            )
            .await?;

        cart_from_payload(data.cart_lines_remove, "remove from cart")
    }

    /// Update discount codes on a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, discount_codes), fields(cart_id = %cart_id))]
    pub async fn update_discount_codes(
        &self,
        cart_id: &str,
        discount_codes: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let data: UpdateDiscountCodesData = self
            .execute(
                "UpdateCartDiscountCodes",
                queries::UPDATE_CART_DISCOUNT_CODES,
                json!({ "cartId": cart_id, "discountCodes": discount_codes }),
            )
            .await?;

        cart_from_payload(data.cart_discount_codes_update, "update discount codes")
    }

    /// Update cart note.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, note), fields(cart_id = %cart_id))]
    pub async fn update_cart_note(&self, cart_id: &str, note: &str) -> Result<Cart, ShopifyError> {
        let data: UpdateCartNoteData = self
            .execute(
                "UpdateCartNote",
                queries::UPDATE_CART_NOTE,
                json!({ "cartId": cart_id, "note": note }),
            )
            .await?;

        cart_from_payload(data.cart_note_update, "update cart note")
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, handle: &str) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate(&cache::product_key(handle)).await;
        }
    }

    /// Invalidate every cached page of a collection.
    pub fn invalidate_collection(&self, handle: &str) {
        if let Some(cache) = &self.inner.cache {
            let prefix = format!("collection:{handle}:");
            if let Err(e) = cache.invalidate_entries_if(move |key, _| key.starts_with(&prefix)) {
                warn!(error = %e, "Failed to invalidate collection cache");
            }
        }
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
    }
}

/// Unwrap a cart mutation payload, surfacing `userErrors` first.
fn cart_from_payload(payload: Option<CartPayload>, action: &str) -> Result<Cart, ShopifyError> {
    if let Some(result) = payload {
        if !result.user_errors.is_empty() {
            let errors: Vec<CartUserError> = result
                .user_errors
                .into_iter()
                .map(convert_user_error)
                .collect();
            return Err(ShopifyError::user_errors(&errors));
        }

        if let Some(cart) = result.cart {
            return Ok(convert_cart(cart));
        }
    }

    Err(ShopifyError::graphql(format!("Failed to {action}")))
}
