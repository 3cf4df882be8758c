//! Customer accounts on the platform.
//!
//! Customer endpoints live under `/api/storefront/customer/*` and require
//! the customer's access token, sent as `x-customer-token` (and as the
//! `token` query parameter on reads). The token is persisted by
//! [`CustomerSession`] under [`CUSTOMER_TOKEN_STORAGE_KEY`].

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_sdk_core::Money;
use tracing::{info, instrument};

use super::{PlatformClient, PlatformError};
use crate::storage::{KeyValueStorage, StorageError};

/// Storage key holding the customer access token (plain string).
pub const CUSTOMER_TOKEN_STORAGE_KEY: &str = "storefront-customer-token";

const CUSTOMER_TOKEN_HEADER: &str = "x-customer-token";

// =============================================================================
// Types
// =============================================================================

/// The logged-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    /// Customer id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Whether the customer accepts marketing.
    #[serde(default)]
    pub accepts_marketing: bool,
    /// Account creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CustomerProfile {
    /// The customer's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Profile fields to change. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepts_marketing: Option<bool>,
}

/// One line of a past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub title: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

/// A past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    /// Order id.
    pub id: String,
    /// Display name, e.g. `#1001`.
    pub name: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Payment status.
    #[serde(default)]
    pub financial_status: Option<String>,
    /// Shipping status.
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    /// Order total.
    pub total_price: Decimal,
    /// Currency of every amount on the order.
    pub currency_code: String,
    /// Order lines.
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
}

impl CustomerOrder {
    /// Order total as money.
    #[must_use]
    pub fn total(&self) -> Money {
        Money::new(self.total_price, self.currency_code.clone())
    }
}

/// Subscription lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

/// Unit of a delivery frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyInterval {
    Day,
    Week,
    Month,
    Year,
}

impl FrequencyInterval {
    const fn noun(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Delivery frequency, e.g. every 2 weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frequency {
    pub interval: FrequencyInterval,
    pub interval_count: u32,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval_count == 1 {
            write!(f, "Every {}", self.interval.noun())
        } else {
            write!(f, "Every {} {}s", self.interval_count, self.interval.noun())
        }
    }
}

/// A customer's product subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSubscription {
    pub id: String,
    pub status: SubscriptionStatus,
    pub product_title: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    pub currency_code: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub next_billing_date: Option<NaiveDate>,
    #[serde(default)]
    pub image: Option<String>,
}

impl CustomerSubscription {
    /// Price per delivery as money.
    #[must_use]
    pub fn price(&self) -> Money {
        Money::new(self.price, self.currency_code.clone())
    }
}

/// Request to start a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub variant_id: String,
    pub selling_plan_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
struct ProfileEnvelope {
    customer: CustomerProfile,
}

#[derive(Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<CustomerOrder>,
}

#[derive(Deserialize)]
struct SubscriptionsEnvelope {
    #[serde(default)]
    subscriptions: Vec<CustomerSubscription>,
}

#[derive(Deserialize)]
struct SubscriptionEnvelope {
    subscription: CustomerSubscription,
}

// =============================================================================
// CustomerSession
// =============================================================================

/// Persisted customer access token.
#[derive(Clone)]
pub struct CustomerSession<S> {
    storage: S,
    key: String,
}

impl<S> fmt::Debug for CustomerSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerSession")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStorage> CustomerSession<S> {
    /// A session stored under [`CUSTOMER_TOKEN_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: CUSTOMER_TOKEN_STORAGE_KEY.to_string(),
        }
    }

    /// The stored token, if logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .get(&self.key)?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Store a token obtained from the platform's login flow.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn login(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(&self.key, token)
    }

    /// Forget the token.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }

    /// Whether a token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    fn require_token(&self) -> Result<String, PlatformError> {
        self.token()?.ok_or(PlatformError::NotLoggedIn)
    }
}

// =============================================================================
// CustomerClient
// =============================================================================

/// Customer-scoped platform calls. Cheap to clone.
pub struct CustomerClient<S> {
    platform: PlatformClient,
    session: Arc<CustomerSession<S>>,
}

impl<S> Clone for CustomerClient<S> {
    fn clone(&self) -> Self {
        Self {
            platform: self.platform.clone(),
            session: Arc::clone(&self.session),
        }
    }
}

impl<S> fmt::Debug for CustomerClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerClient")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStorage> CustomerClient<S> {
    /// Create a customer client over a platform client and session.
    pub fn new(platform: PlatformClient, session: CustomerSession<S>) -> Self {
        Self {
            platform,
            session: Arc::new(session),
        }
    }

    /// The session holding the access token.
    #[must_use]
    pub fn session(&self) -> &CustomerSession<S> {
        &self.session
    }

    /// Log out by removing the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn logout(&self) -> Result<(), StorageError> {
        info!("Customer logged out");
        self.session.logout()
    }

    fn read(&self, path: &str) -> Result<RequestBuilder, PlatformError> {
        let token = self.session.require_token()?;
        let path = format!(
            "/api/storefront/customer/{path}?token={}",
            urlencoding::encode(&token)
        );
        Ok(self
            .platform
            .request(Method::GET, &path)
            .header(CUSTOMER_TOKEN_HEADER, token))
    }

    fn write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<RequestBuilder, PlatformError> {
        let token = self.session.require_token()?;
        Ok(self
            .platform
            .request(method, &format!("/api/storefront/customer/{path}"))
            .header(CUSTOMER_TOKEN_HEADER, token)
            .json(body))
    }

    async fn subscription_action(
        &self,
        subscription_id: &str,
        action: &str,
        body: serde_json::Value,
    ) -> Result<CustomerSubscription, PlatformError> {
        let path = format!(
            "subscriptions/{}/{action}",
            urlencoding::encode(subscription_id)
        );
        let request = self.write(Method::POST, &path, &body)?;
        let envelope: SubscriptionEnvelope = self.platform.send(request).await?;
        Ok(envelope.subscription)
    }

    /// Fetch the customer's profile.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<CustomerProfile, PlatformError> {
        let envelope: ProfileEnvelope = self.platform.send(self.read("profile")?).await?;
        Ok(envelope.customer)
    }

    /// Fetch the customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<Vec<CustomerOrder>, PlatformError> {
        let envelope: OrdersEnvelope = self.platform.send(self.read("orders")?).await?;
        Ok(envelope.orders)
    }

    /// Fetch the customer's subscriptions.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_subscriptions(&self) -> Result<Vec<CustomerSubscription>, PlatformError> {
        let envelope: SubscriptionsEnvelope =
            self.platform.send(self.read("subscriptions")?).await?;
        Ok(envelope.subscriptions)
    }

    /// Update profile fields.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<CustomerProfile, PlatformError> {
        let request = self.write(Method::PATCH, "profile", update)?;
        let envelope: ProfileEnvelope = self.platform.send(request).await?;
        Ok(envelope.customer)
    }

    /// Start a subscription.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self, request), fields(variant_id = %request.variant_id))]
    pub async fn subscribe(
        &self,
        request: &SubscribeRequest,
    ) -> Result<CustomerSubscription, PlatformError> {
        let request = self.write(Method::POST, "subscriptions", request)?;
        let envelope: SubscriptionEnvelope = self.platform.send(request).await?;
        Ok(envelope.subscription)
    }

    /// Cancel a subscription.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn cancel_subscription(
        &self,
        subscription_id: &str,
        reason: Option<&str>,
    ) -> Result<CustomerSubscription, PlatformError> {
        self.subscription_action(
            subscription_id,
            "cancel",
            serde_json::json!({ "reason": reason }),
        )
        .await
    }

    /// Pause a subscription.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn pause_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<CustomerSubscription, PlatformError> {
        self.subscription_action(subscription_id, "pause", serde_json::json!({}))
            .await
    }

    /// Resume a paused subscription.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn resume_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<CustomerSubscription, PlatformError> {
        self.subscription_action(subscription_id, "resume", serde_json::json!({}))
            .await
    }

    /// Change how often a subscription delivers.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn change_frequency(
        &self,
        subscription_id: &str,
        frequency: Frequency,
    ) -> Result<CustomerSubscription, PlatformError> {
        self.subscription_action(
            subscription_id,
            "frequency",
            serde_json::to_value(frequency)?,
        )
        .await
    }

    /// Skip the next scheduled delivery.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` without a token, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn skip_next_delivery(
        &self,
        subscription_id: &str,
    ) -> Result<CustomerSubscription, PlatformError> {
        self.subscription_action(subscription_id, "skip", serde_json::json!({}))
            .await
    }
}
