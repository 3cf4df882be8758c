//! Persisted client-side shopping cart.
//!
//! [`CartStore`] is an explicitly constructed state container: applications
//! create one at startup, pass it by reference to whatever needs it, and
//! choose how it persists by injecting a [`CartPersistence`] strategy.
//!
//! Only the item list is persisted. The drawer's open/closed flag is UI
//! state and always starts closed.
//!
//! # Example
//!
//! ```rust,ignore
//! let storage = FileStorage::open(".storefront")?;
//! let mut cart = CartStore::load(KeyValueCartPersistence::new(storage));
//!
//! cart.add_item(item, 2)?;
//! println!("{} items, subtotal {}", cart.item_count(), cart.subtotal());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key for the persisted item list.
///
/// The persisted shape is not versioned: changing [`CartItem`] in an
/// incompatible way requires a new key.
pub const CART_STORAGE_KEY: &str = "storefront-cart";

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The mutation was applied in memory but could not be persisted.
    #[error("Failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

/// A line in the client-side cart. Unique by `variant_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub variant_id: String,
    pub product_id: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub handle: String,
}

impl CartItem {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Persistence
// =============================================================================

/// How a [`CartStore`] loads and saves its items.
pub trait CartPersistence {
    /// Load previously saved items; `None` when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the payload is
    /// not a valid item list.
    fn load(&self) -> Result<Option<Vec<CartItem>>, StorageError>;

    /// Replace the saved items.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, items: &[CartItem]) -> Result<(), StorageError>;
}

/// Persists the item list as JSON under [`CART_STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct KeyValueCartPersistence<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> KeyValueCartPersistence<S> {
    /// Persist under the default key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Persist under a custom key (e.g. one cart per brand).
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl<S: KeyValueStorage> CartPersistence for KeyValueCartPersistence<S> {
    fn load(&self) -> Result<Option<Vec<CartItem>>, StorageError> {
        self.storage
            .get(&self.key)?
            .map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
            .transpose()
    }

    fn save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(&self.key, &raw)
    }
}

/// Persistence that keeps nothing; for previews and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl CartPersistence for NoPersistence {
    fn load(&self) -> Result<Option<Vec<CartItem>>, StorageError> {
        Ok(None)
    }

    fn save(&self, _items: &[CartItem]) -> Result<(), StorageError> {
        Ok(())
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// The shopping cart: an ordered list of unique-by-variant line items plus
/// the drawer visibility flag.
#[derive(Debug)]
pub struct CartStore<P> {
    items: Vec<CartItem>,
    is_open: bool,
    persistence: P,
}

impl<P: CartPersistence> CartStore<P> {
    /// Create a store, rehydrating items from `persistence`.
    ///
    /// Unreadable or corrupt saved state is logged and replaced with an
    /// empty cart. Saved lines with a zero quantity are dropped.
    pub fn load(persistence: P) -> Self {
        let items = match persistence.load() {
            Ok(Some(items)) => items.into_iter().filter(|i| i.quantity > 0).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted cart");
                Vec::new()
            }
        };
        debug!(items = items.len(), "Cart rehydrated");

        Self {
            items,
            is_open: false,
            persistence,
        }
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for a variant.
    #[must_use]
    pub fn find(&self, variant_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.variant_id == variant_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of `item`, merging with an existing line for the
    /// same variant. Adding zero units does nothing.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the new state could not be saved; the
    /// in-memory cart is updated regardless.
    pub fn add_item(&mut self, item: CartItem, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.variant_id == item.variant_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { quantity, ..item });
        }
        self.persist()
    }

    /// Remove the line for `variant_id`, if present.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the new state could not be saved.
    pub fn remove_item(&mut self, variant_id: &str) -> Result<(), CartError> {
        self.items.retain(|i| i.variant_id != variant_id);
        self.persist()
    }

    /// Set the quantity for `variant_id`; zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the new state could not be saved.
    pub fn update_quantity(&mut self, variant_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.items.retain(|i| i.variant_id != variant_id);
        } else if let Some(item) = self.items.iter_mut().find(|i| i.variant_id == variant_id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.persist()
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the new state could not be saved.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.items.clear();
        self.persist()
    }

    /// Whether the cart drawer is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn open_cart(&mut self) {
        self.is_open = true;
    }

    pub const fn close_cart(&mut self) {
        self.is_open = false;
    }

    pub const fn toggle_cart(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    fn persist(&self) -> Result<(), CartError> {
        self.persistence.save(&self.items).map_err(|e| {
            warn!(error = %e, "Cart mutation applied but not persisted");
            CartError::from(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;

    fn item(variant_id: &str, price: &str) -> CartItem {
        CartItem {
            variant_id: variant_id.to_string(),
            product_id: format!("product-{variant_id}"),
            title: format!("Product {variant_id}"),
            variant_title: Some("Default".to_string()),
            price: price.parse().unwrap(),
            compare_at_price: None,
            quantity: 1,
            image: None,
            handle: format!("product-{variant_id}"),
        }
    }

    #[test]
    fn test_add_same_variant_merges_quantities() {
        let mut cart = CartStore::load(NoPersistence);
        cart.add_item(item("v1", "10.00"), 2).unwrap();
        cart.add_item(item("v1", "10.00"), 3).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.find("v1").unwrap().quantity, 5);
    }

    #[test]
    fn test_add_ignores_incoming_quantity_field() {
        let mut cart = CartStore::load(NoPersistence);
        let mut line = item("v1", "1");
        line.quantity = 40;
        cart.add_item(line, 1).unwrap();
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = CartStore::load(NoPersistence);
        cart.add_item(item("v1", "10.00"), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = CartStore::load(NoPersistence);
        cart.add_item(item("v1", "10.00"), 1).unwrap();
        cart.add_item(item("v2", "10.00"), 1).unwrap();

        cart.update_quantity("v1", 0).unwrap();
        cart.update_quantity("v2", -1).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_replaces() {
        let mut cart = CartStore::load(NoPersistence);
        cart.add_item(item("v1", "10.00"), 4).unwrap();
        cart.update_quantity("v1", 2).unwrap();
        cart.update_quantity("missing", 9).unwrap();

        assert_eq!(cart.find("v1").unwrap().quantity, 2);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_totals_track_mutations() {
        let mut cart = CartStore::load(NoPersistence);
        cart.add_item(item("v1", "12.50"), 2).unwrap();
        cart.add_item(item("v2", "3.25"), 4).unwrap();
        assert_eq!(cart.subtotal(), "38.00".parse::<Decimal>().unwrap());
        assert_eq!(cart.item_count(), 6);

        cart.update_quantity("v2", 1).unwrap();
        assert_eq!(cart.subtotal(), "28.25".parse::<Decimal>().unwrap());
        assert_eq!(cart.item_count(), 3);

        cart.remove_item("v1").unwrap();
        assert_eq!(cart.subtotal(), "3.25".parse::<Decimal>().unwrap());
        assert_eq!(cart.item_count(), 1);

        cart.clear_cart().unwrap();
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_open_close_toggle() {
        let mut cart = CartStore::load(NoPersistence);
        assert!(!cart.is_open());
        cart.open_cart();
        assert!(cart.is_open());
        cart.toggle_cart();
        assert!(!cart.is_open());
        cart.toggle_cart();
        cart.close_cart();
        assert!(!cart.is_open());
    }

    #[test]
    fn test_persisted_items_round_trip_and_open_flag_resets() {
        let storage = Arc::new(MemoryStorage::new());

        let mut first = CartStore::load(KeyValueCartPersistence::new(Arc::clone(&storage)));
        first.add_item(item("v1", "9.99"), 2).unwrap();
        first.add_item(item("v2", "1.00"), 1).unwrap();
        first.open_cart();

        let second = CartStore::load(KeyValueCartPersistence::new(Arc::clone(&storage)));
        assert_eq!(second.items(), first.items());
        assert!(!second.is_open());
    }

    #[test]
    fn test_corrupt_persisted_state_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();

        let cart = CartStore::load(KeyValueCartPersistence::new(storage));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_file_backed_cart_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = crate::storage::FileStorage::open(dir.path()).unwrap();

        let mut cart = CartStore::load(KeyValueCartPersistence::new(storage.clone()));
        cart.add_item(item("v9", "5.00"), 3).unwrap();

        let reloaded = CartStore::load(KeyValueCartPersistence::new(storage));
        assert_eq!(reloaded.find("v9").unwrap().quantity, 3);
    }
}
