//! Customer account portal.

use tracing::debug;

use crate::loaders::{CustomerBackend, CustomerData, CustomerLoader, SubscriptionLoader};
use crate::platform::{CustomerSubscription, Frequency, PlatformError, ProfileUpdate};
use crate::storage::StorageError;

/// Portal sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PortalTab {
    #[default]
    Orders,
    Subscriptions,
    Profile,
}

/// Tabbed view over a customer's orders, subscriptions and profile.
///
/// Subscription actions never fail at this level: a failed action is
/// recorded by the subscription loader and shown through [`error`].
///
/// [`error`]: CustomerPortal::error
#[derive(Debug)]
pub struct CustomerPortal<B> {
    customer: CustomerLoader<B>,
    actions: SubscriptionLoader<B>,
    tab: PortalTab,
}

impl<B: CustomerBackend + Clone> CustomerPortal<B> {
    pub fn new(backend: B) -> Self {
        Self {
            customer: CustomerLoader::new(backend.clone()),
            actions: SubscriptionLoader::new(backend),
            tab: PortalTab::default(),
        }
    }

    #[must_use]
    pub const fn tab(&self) -> PortalTab {
        self.tab
    }

    pub const fn select_tab(&mut self, tab: PortalTab) {
        self.tab = tab;
    }

    /// Load everything for the logged-in customer.
    pub async fn load(&self) {
        self.customer.load().await;
    }

    /// Current customer data.
    #[must_use]
    pub fn data(&self) -> CustomerData {
        self.customer.snapshot()
    }

    /// Error to display: the last failed action, else the load error.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.actions.error().or_else(|| self.customer.snapshot().error)
    }

    /// Subscription with an action in flight.
    #[must_use]
    pub fn pending_subscription(&self) -> Option<String> {
        self.actions.pending()
    }

    pub async fn pause(&self, subscription_id: &str) {
        let result = self.actions.pause(subscription_id).await;
        self.apply(result);
    }

    pub async fn resume(&self, subscription_id: &str) {
        let result = self.actions.resume(subscription_id).await;
        self.apply(result);
    }

    pub async fn cancel(&self, subscription_id: &str, reason: Option<&str>) {
        let result = self.actions.cancel(subscription_id, reason).await;
        self.apply(result);
    }

    pub async fn skip_next(&self, subscription_id: &str) {
        let result = self.actions.skip_next(subscription_id).await;
        self.apply(result);
    }

    pub async fn change_frequency(&self, subscription_id: &str, frequency: Frequency) {
        let result = self
            .actions
            .change_frequency(subscription_id, frequency)
            .await;
        self.apply(result);
    }

    /// Save profile changes. Returns whether they were saved.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> bool {
        self.customer.update_profile(update).await.is_ok()
    }

    /// Log out and drop all customer data.
    ///
    /// # Errors
    ///
    /// Returns an error if the session token could not be removed.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.tab = PortalTab::default();
        self.customer.logout()
    }

    fn apply(&self, result: Result<CustomerSubscription, PlatformError>) {
        match result {
            Ok(subscription) => self.customer.replace_subscription(subscription),
            Err(e) => debug!(error = %e, "Subscription action failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::loaders::fakes::FakeCustomer;
    use crate::platform::SubscriptionStatus;

    #[tokio::test]
    async fn test_action_updates_subscription() {
        let portal = CustomerPortal::new(FakeCustomer::default());
        portal.load().await;
        portal.pause("s1").await;

        let data = portal.data();
        assert_eq!(data.subscriptions[0].status, SubscriptionStatus::Paused);
        assert_eq!(portal.error(), None);
    }

    #[tokio::test]
    async fn test_action_error_is_swallowed_and_shown() {
        let portal = CustomerPortal::new(FakeCustomer::failing(&["skip"]));
        portal.load().await;
        portal.skip_next("s1").await;

        assert_eq!(portal.error().as_deref(), Some("Server exploded"));
        assert_eq!(portal.pending_subscription(), None);
        assert_eq!(portal.data().subscriptions[0].status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn test_tabs_and_logout() {
        let backend = FakeCustomer::default();
        let mut portal = CustomerPortal::new(backend.clone());
        portal.load().await;
        portal.select_tab(PortalTab::Profile);
        assert_eq!(portal.tab(), PortalTab::Profile);

        portal.logout().unwrap();
        assert_eq!(portal.tab(), PortalTab::Orders);
        assert!(portal.data().profile.is_none());
        assert!(backend.logged_out.load(Ordering::SeqCst));
    }
}
