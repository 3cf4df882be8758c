//! Customer account loaders.

use std::future::Future;
use std::sync::Mutex;

use tracing::{debug, instrument, warn};

use super::lock;
use crate::platform::{
    CustomerClient, CustomerOrder, CustomerProfile, CustomerSubscription, Frequency,
    PlatformError, ProfileUpdate,
};
use crate::storage::{KeyValueStorage, StorageError};

/// Customer account operations the loaders depend on.
pub trait CustomerBackend: Send + Sync {
    fn profile(&self) -> impl Future<Output = Result<CustomerProfile, PlatformError>> + Send;

    fn orders(&self) -> impl Future<Output = Result<Vec<CustomerOrder>, PlatformError>> + Send;

    fn subscriptions(
        &self,
    ) -> impl Future<Output = Result<Vec<CustomerSubscription>, PlatformError>> + Send;

    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<CustomerProfile, PlatformError>> + Send;

    fn pause(
        &self,
        subscription_id: &str,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send;

    fn resume(
        &self,
        subscription_id: &str,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send;

    fn cancel(
        &self,
        subscription_id: &str,
        reason: Option<&str>,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send;

    fn skip_next(
        &self,
        subscription_id: &str,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send;

    fn change_frequency(
        &self,
        subscription_id: &str,
        frequency: Frequency,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send;

    /// Forget the session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token could not be removed from storage.
    fn logout(&self) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage> CustomerBackend for CustomerClient<S> {
    fn profile(&self) -> impl Future<Output = Result<CustomerProfile, PlatformError>> + Send {
        self.get_profile()
    }

    fn orders(&self) -> impl Future<Output = Result<Vec<CustomerOrder>, PlatformError>> + Send {
        self.get_orders()
    }

    fn subscriptions(
        &self,
    ) -> impl Future<Output = Result<Vec<CustomerSubscription>, PlatformError>> + Send {
        self.get_subscriptions()
    }

    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<CustomerProfile, PlatformError>> + Send {
        Self::update_profile(self, update)
    }

    fn pause(
        &self,
        subscription_id: &str,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send {
        self.pause_subscription(subscription_id)
    }

    fn resume(
        &self,
        subscription_id: &str,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send {
        self.resume_subscription(subscription_id)
    }

    fn cancel(
        &self,
        subscription_id: &str,
        reason: Option<&str>,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send {
        self.cancel_subscription(subscription_id, reason)
    }

    fn skip_next(
        &self,
        subscription_id: &str,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send {
        self.skip_next_delivery(subscription_id)
    }

    fn change_frequency(
        &self,
        subscription_id: &str,
        frequency: Frequency,
    ) -> impl Future<Output = Result<CustomerSubscription, PlatformError>> + Send {
        Self::change_frequency(self, subscription_id, frequency)
    }

    fn logout(&self) -> Result<(), StorageError> {
        Self::logout(self)
    }
}

// =============================================================================
// CustomerLoader
// =============================================================================

/// Everything loaded for the logged-in customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerData {
    pub loading: bool,
    pub error: Option<String>,
    pub profile: Option<CustomerProfile>,
    pub orders: Vec<CustomerOrder>,
    pub subscriptions: Vec<CustomerSubscription>,
}

#[derive(Debug, Default)]
struct CustomerState {
    data: CustomerData,
    generation: u64,
}

/// Loads profile, orders and subscriptions together.
///
/// The three fetches run concurrently and fail independently: whatever
/// succeeded is kept and the first failure becomes the shared error.
#[derive(Debug)]
pub struct CustomerLoader<B> {
    backend: B,
    state: Mutex<CustomerState>,
}

impl<B: CustomerBackend> CustomerLoader<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(CustomerState::default()),
        }
    }

    /// The backend this loader reads from.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch everything. Returns false if a newer load or a logout
    /// superseded this one.
    #[instrument(skip(self))]
    pub async fn load(&self) -> bool {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.data.loading = true;
            state.data.error = None;
            state.generation
        };

        let (profile, orders, subscriptions) = tokio::join!(
            self.backend.profile(),
            self.backend.orders(),
            self.backend.subscriptions()
        );

        let mut state = lock(&self.state);
        if state.generation != generation {
            debug!(generation, "Dropping stale customer data");
            return false;
        }

        let data = &mut state.data;
        data.loading = false;
        let mut first_error = None;
        match profile {
            Ok(profile) => data.profile = Some(profile),
            Err(e) => first_error = first_error.or(Some(e)),
        }
        match orders {
            Ok(orders) => data.orders = orders,
            Err(e) => first_error = first_error.or(Some(e)),
        }
        match subscriptions {
            Ok(subscriptions) => data.subscriptions = subscriptions,
            Err(e) => first_error = first_error.or(Some(e)),
        }
        if let Some(e) = first_error {
            warn!(error = %e, "Customer data partially loaded");
            data.error = Some(e.to_string());
        }
        true
    }

    /// Save profile changes and keep the returned profile.
    ///
    /// # Errors
    ///
    /// Returns the platform error after recording it.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<CustomerProfile, PlatformError> {
        match self.backend.update_profile(update).await {
            Ok(profile) => {
                let mut state = lock(&self.state);
                state.data.profile = Some(profile.clone());
                state.data.error = None;
                Ok(profile)
            }
            Err(e) => {
                lock(&self.state).data.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Replace a subscription in the loaded list by id.
    pub fn replace_subscription(&self, subscription: CustomerSubscription) {
        let mut state = lock(&self.state);
        if let Some(existing) = state
            .data
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id)
        {
            *existing = subscription;
        }
    }

    /// Forget the token and discard all customer data.
    ///
    /// # Errors
    ///
    /// Returns an error if the token could not be removed; data is cleared
    /// either way.
    pub fn logout(&self) -> Result<(), StorageError> {
        {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.data = CustomerData::default();
        }
        self.backend.logout()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> CustomerData {
        lock(&self.state).data.clone()
    }
}

// =============================================================================
// SubscriptionLoader
// =============================================================================

/// Runs subscription lifecycle actions, tracking the pending action and
/// the last error.
#[derive(Debug)]
pub struct SubscriptionLoader<B> {
    backend: B,
    state: Mutex<ActionState>,
}

#[derive(Debug, Default)]
struct ActionState {
    pending: Option<String>,
    error: Option<String>,
}

impl<B: CustomerBackend> SubscriptionLoader<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(ActionState::default()),
        }
    }

    /// Id of the subscription with an action in flight.
    #[must_use]
    pub fn pending(&self) -> Option<String> {
        lock(&self.state).pending.clone()
    }

    /// Message of the last failed action.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    /// Pause a subscription.
    ///
    /// # Errors
    ///
    /// Returns the platform error after recording it.
    pub async fn pause(&self, id: &str) -> Result<CustomerSubscription, PlatformError> {
        self.track(id, self.backend.pause(id)).await
    }

    /// Resume a paused subscription.
    ///
    /// # Errors
    ///
    /// Returns the platform error after recording it.
    pub async fn resume(&self, id: &str) -> Result<CustomerSubscription, PlatformError> {
        self.track(id, self.backend.resume(id)).await
    }

    /// Cancel a subscription.
    ///
    /// # Errors
    ///
    /// Returns the platform error after recording it.
    pub async fn cancel(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<CustomerSubscription, PlatformError> {
        self.track(id, self.backend.cancel(id, reason)).await
    }

    /// Skip the next delivery.
    ///
    /// # Errors
    ///
    /// Returns the platform error after recording it.
    pub async fn skip_next(&self, id: &str) -> Result<CustomerSubscription, PlatformError> {
        self.track(id, self.backend.skip_next(id)).await
    }

    /// Change the delivery frequency.
    ///
    /// # Errors
    ///
    /// Returns the platform error after recording it.
    pub async fn change_frequency(
        &self,
        id: &str,
        frequency: Frequency,
    ) -> Result<CustomerSubscription, PlatformError> {
        self.track(id, self.backend.change_frequency(id, frequency))
            .await
    }

    async fn track(
        &self,
        id: &str,
        action: impl Future<Output = Result<CustomerSubscription, PlatformError>>,
    ) -> Result<CustomerSubscription, PlatformError> {
        {
            let mut state = lock(&self.state);
            state.pending = Some(id.to_string());
            state.error = None;
        }

        let result = action.await;

        let mut state = lock(&self.state);
        state.pending = None;
        if let Err(e) = &result {
            warn!(subscription_id = %id, error = %e, "Subscription action failed");
            state.error = Some(e.to_string());
        }
        result
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::fakes::FakeCustomer;
    use super::*;
    use crate::platform::SubscriptionStatus;

    #[tokio::test]
    async fn test_load_all() {
        let loader = CustomerLoader::new(FakeCustomer::default());
        assert!(loader.load().await);

        let data = loader.snapshot();
        assert!(!data.loading);
        assert_eq!(data.error, None);
        assert_eq!(data.profile.unwrap().email, "ada@example.com");
        assert_eq!(data.subscriptions.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_data() {
        let loader = CustomerLoader::new(FakeCustomer::failing(&["orders"]));
        loader.load().await;

        let data = loader.snapshot();
        assert_eq!(data.error.as_deref(), Some("Server exploded"));
        assert!(data.profile.is_some());
        assert_eq!(data.subscriptions.len(), 1);
        assert!(data.orders.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_data() {
        let loader = CustomerLoader::new(FakeCustomer::default());
        loader.load().await;
        loader.logout().unwrap();

        assert_eq!(loader.snapshot(), CustomerData::default());
        assert!(loader.backend().logged_out.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let loader = CustomerLoader::new(FakeCustomer::default());
        let update = ProfileUpdate {
            first_name: Some("Grace".to_string()),
            ..ProfileUpdate::default()
        };
        let profile = loader.update_profile(&update).await.unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Grace"));
        assert_eq!(
            loader.snapshot().profile.unwrap().first_name.as_deref(),
            Some("Grace")
        );
    }

    #[tokio::test]
    async fn test_replace_subscription() {
        let loader = CustomerLoader::new(FakeCustomer::default());
        loader.load().await;

        let subscriptions = SubscriptionLoader::new(FakeCustomer::default());
        let paused = subscriptions.pause("s1").await.unwrap();
        loader.replace_subscription(paused);

        assert_eq!(
            loader.snapshot().subscriptions[0].status,
            SubscriptionStatus::Paused
        );
    }

    #[tokio::test]
    async fn test_action_error_recorded_and_returned() {
        let loader = SubscriptionLoader::new(FakeCustomer::failing(&["cancel"]));
        let err = loader.cancel("s1", Some("too much")).await.unwrap_err();

        assert_eq!(err.to_string(), "Server exploded");
        assert_eq!(loader.error().as_deref(), Some("Server exploded"));
        assert_eq!(loader.pending(), None);

        loader.resume("s1").await.unwrap();
        assert_eq!(loader.error(), None);
    }
}
