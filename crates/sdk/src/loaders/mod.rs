//! Data loaders: async fetches tracked as loading/error/data.
//!
//! Every load takes a [`Ticket`] from its [`Resource`] before awaiting the
//! network. Only the newest ticket may write its result, so a slow response
//! for an old handle can never overwrite a newer one.

mod customer;

pub use customer::{CustomerBackend, CustomerData, CustomerLoader, SubscriptionLoader};

#[cfg(test)]
pub(crate) use customer::fakes;

use std::fmt::Display;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::platform::{PlatformClient, PlatformError};
use crate::shopify::{ShopifyClient, ShopifyError};
use crate::types::{Collection, Product};

// =============================================================================
// Resource
// =============================================================================

/// Request generation handed out by [`Resource::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Loading/error/data triad guarded by a request generation.
///
/// A failed load keeps the previous data and records the error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource<T> {
    loading: bool,
    error: Option<String>,
    data: Option<T>,
    generation: u64,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
            generation: 0,
        }
    }
}

impl<T> Resource<T> {
    /// An idle, empty resource.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request: marks loading, clears the error, returns its ticket.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.generation)
    }

    /// Whether `ticket` belongs to the newest request.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a result if `ticket` is current. Returns whether it was applied.
    pub fn resolve<E: Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "Dropping stale response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Drop data and error and invalidate in-flight requests.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.error = None;
        self.data = None;
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// CatalogSource
// =============================================================================

/// Anything that can fetch products and collections by handle.
pub trait CatalogSource: Send + Sync {
    type Error: Display + Send;

    fn product(&self, handle: &str) -> impl Future<Output = Result<Product, Self::Error>> + Send;

    fn collection(
        &self,
        handle: &str,
        product_limit: u32,
    ) -> impl Future<Output = Result<Collection, Self::Error>> + Send;
}

impl CatalogSource for PlatformClient {
    type Error = PlatformError;

    fn product(&self, handle: &str) -> impl Future<Output = Result<Product, Self::Error>> + Send {
        self.get_product(handle)
    }

    fn collection(
        &self,
        handle: &str,
        product_limit: u32,
    ) -> impl Future<Output = Result<Collection, Self::Error>> + Send {
        self.get_collection(handle, Some(product_limit))
    }
}

impl CatalogSource for ShopifyClient {
    type Error = ShopifyError;

    fn product(&self, handle: &str) -> impl Future<Output = Result<Product, Self::Error>> + Send {
        self.get_product_by_handle(handle)
    }

    fn collection(
        &self,
        handle: &str,
        product_limit: u32,
    ) -> impl Future<Output = Result<Collection, Self::Error>> + Send {
        self.get_collection_by_handle(handle, product_limit, None)
    }
}

// =============================================================================
// ProductLoader / CollectionLoader
// =============================================================================

/// Loads one product by handle.
#[derive(Debug)]
pub struct ProductLoader<C> {
    source: C,
    state: Mutex<Resource<Product>>,
}

impl<C: CatalogSource> ProductLoader<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            state: Mutex::new(Resource::new()),
        }
    }

    /// Fetch `handle`. Returns false if a newer load superseded this one.
    pub async fn load(&self, handle: &str) -> bool {
        let ticket = lock(&self.state).begin();
        let result = self.source.product(handle).await;
        lock(&self.state).resolve(ticket, result)
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> Resource<Product> {
        lock(&self.state).clone()
    }
}

/// Loads one collection (with products) by handle.
#[derive(Debug)]
pub struct CollectionLoader<C> {
    source: C,
    product_limit: u32,
    state: Mutex<Resource<Collection>>,
}

impl<C: CatalogSource> CollectionLoader<C> {
    pub fn new(source: C, product_limit: u32) -> Self {
        Self {
            source,
            product_limit,
            state: Mutex::new(Resource::new()),
        }
    }

    /// Fetch `handle`. Returns false if a newer load superseded this one.
    pub async fn load(&self, handle: &str) -> bool {
        let ticket = lock(&self.state).begin();
        let result = self.source.collection(handle, self.product_limit).await;
        lock(&self.state).resolve(ticket, result)
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> Resource<Collection> {
        lock(&self.state).clone()
    }
}
