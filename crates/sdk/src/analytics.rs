//! Analytics and attribution tracking.
//!
//! Three pieces:
//! - [`PixelTracker`] posts events to the platform's attribution pixel,
//!   fire-and-forget.
//! - [`AnalyticsConfig::script_tags`] renders the GA4, Meta Pixel and
//!   Clarity loader snippets for whichever ids are configured.
//! - [`AnalyticsEvent`] maps commerce events to GA4 and Meta names and
//!   parameters so callers can forward them to `gtag`/`fbq`.

use std::sync::{Arc, Mutex, OnceLock};

use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::{AnalyticsConfig, PlatformConfig};
use crate::loaders::lock;

/// Path of the attribution pixel endpoint on the platform.
pub const PIXEL_TRACK_PATH: &str = "/api/pixel/track";

const USER_AGENT: &str = concat!("storefront-sdk/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Events
// =============================================================================

/// A product line as reported to analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventItem {
    pub id: String,
    pub name: String,
    pub variant: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
}

impl EventItem {
    fn ga4(&self) -> Value {
        json!({
            "item_id": self.id,
            "item_name": self.name,
            "item_variant": self.variant,
            "price": self.price,
            "quantity": self.quantity,
        })
    }

    fn value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A commerce event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    PageView {
        url: String,
        title: Option<String>,
    },
    ViewItem {
        item: EventItem,
        currency: String,
    },
    AddToCart {
        item: EventItem,
        currency: String,
    },
    RemoveFromCart {
        item: EventItem,
        currency: String,
    },
    ViewCart {
        items: Vec<EventItem>,
        currency: String,
    },
    BeginCheckout {
        items: Vec<EventItem>,
        currency: String,
    },
    Purchase {
        transaction_id: String,
        items: Vec<EventItem>,
        currency: String,
    },
    Search {
        query: String,
    },
    /// An application or contact form was submitted.
    Lead {
        form_type: String,
    },
}

impl AnalyticsEvent {
    /// GA4 event name.
    #[must_use]
    pub const fn ga4_name(&self) -> &'static str {
        match self {
            Self::PageView { .. } => "page_view",
            Self::ViewItem { .. } => "view_item",
            Self::AddToCart { .. } => "add_to_cart",
            Self::RemoveFromCart { .. } => "remove_from_cart",
            Self::ViewCart { .. } => "view_cart",
            Self::BeginCheckout { .. } => "begin_checkout",
            Self::Purchase { .. } => "purchase",
            Self::Search { .. } => "search",
            Self::Lead { .. } => "generate_lead",
        }
    }

    /// Meta Pixel standard event name; `None` when Meta has no equivalent.
    #[must_use]
    pub const fn meta_name(&self) -> Option<&'static str> {
        match self {
            Self::PageView { .. } => Some("PageView"),
            Self::ViewItem { .. } => Some("ViewContent"),
            Self::AddToCart { .. } => Some("AddToCart"),
            Self::BeginCheckout { .. } => Some("InitiateCheckout"),
            Self::Purchase { .. } => Some("Purchase"),
            Self::Search { .. } => Some("Search"),
            Self::Lead { .. } => Some("Lead"),
            Self::RemoveFromCart { .. } | Self::ViewCart { .. } => None,
        }
    }

    fn items(&self) -> &[EventItem] {
        match self {
            Self::ViewItem { item, .. }
            | Self::AddToCart { item, .. }
            | Self::RemoveFromCart { item, .. } => std::slice::from_ref(item),
            Self::ViewCart { items, .. }
            | Self::BeginCheckout { items, .. }
            | Self::Purchase { items, .. } => items,
            Self::PageView { .. } | Self::Search { .. } | Self::Lead { .. } => &[],
        }
    }

    fn currency(&self) -> Option<&str> {
        match self {
            Self::ViewItem { currency, .. }
            | Self::AddToCart { currency, .. }
            | Self::RemoveFromCart { currency, .. }
            | Self::ViewCart { currency, .. }
            | Self::BeginCheckout { currency, .. }
            | Self::Purchase { currency, .. } => Some(currency),
            Self::PageView { .. } | Self::Search { .. } | Self::Lead { .. } => None,
        }
    }

    fn value(&self) -> Decimal {
        self.items().iter().map(EventItem::value).sum()
    }

    /// GA4 `gtag('event', name, params)` parameters.
    #[must_use]
    pub fn ga4_params(&self) -> Value {
        match self {
            Self::PageView { url, title } => json!({
                "page_location": url,
                "page_title": title,
            }),
            Self::Search { query } => json!({ "search_term": query }),
            Self::Lead { form_type } => json!({ "form_type": form_type }),
            Self::Purchase { transaction_id, .. } => json!({
                "transaction_id": transaction_id,
                "currency": self.currency(),
                "value": self.value(),
                "items": self.items().iter().map(EventItem::ga4).collect::<Vec<_>>(),
            }),
            _ => json!({
                "currency": self.currency(),
                "value": self.value(),
                "items": self.items().iter().map(EventItem::ga4).collect::<Vec<_>>(),
            }),
        }
    }

    /// Meta `fbq('track', name, params)` parameters.
    #[must_use]
    pub fn meta_params(&self) -> Value {
        match self {
            Self::PageView { .. } => json!({}),
            Self::Search { query } => json!({ "search_string": query }),
            Self::Lead { form_type } => json!({ "content_name": form_type }),
            _ => json!({
                "content_ids": self.items().iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
                "content_type": "product",
                "value": self.value(),
                "currency": self.currency(),
                "num_items": self.items().iter().map(|i| u64::from(i.quantity)).sum::<u64>(),
            }),
        }
    }
}

/// Receives analytics events from widgets.
pub trait EventSink: Send + Sync {
    fn track(&self, event: &AnalyticsEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn track(&self, _event: &AnalyticsEvent) {}
}

/// Sink that keeps events in memory, for previews and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events tracked so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        lock(&self.events).clone()
    }
}

impl EventSink for RecordingSink {
    fn track(&self, event: &AnalyticsEvent) {
        lock(&self.events).push(event.clone());
    }
}

// =============================================================================
// PixelTracker
// =============================================================================

/// Body posted to the attribution pixel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelPayload {
    pub brand_id: Option<String>,
    pub session_id: String,
    pub event: String,
    pub properties: Value,
    pub timestamp: String,
    pub user_agent: String,
    pub url: Option<String>,
}

/// Client for the platform's attribution pixel. Cheap to clone.
///
/// The session id is a UUID v4 generated on first use and reused for the
/// tracker's lifetime.
#[derive(Clone)]
pub struct PixelTracker {
    inner: Arc<PixelTrackerInner>,
}

struct PixelTrackerInner {
    client: reqwest::Client,
    endpoint: String,
    brand_id: Option<String>,
    session_id: OnceLock<String>,
    page_url: Mutex<Option<String>>,
}

impl std::fmt::Debug for PixelTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelTracker")
            .field("endpoint", &self.inner.endpoint)
            .field("brand_id", &self.inner.brand_id)
            .finish_non_exhaustive()
    }
}

impl PixelTracker {
    /// Create a tracker posting to the configured platform.
    #[must_use]
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            inner: Arc::new(PixelTrackerInner {
                client: reqwest::Client::new(),
                endpoint: format!(
                    "{}{PIXEL_TRACK_PATH}",
                    config.base_url.trim_end_matches('/')
                ),
                brand_id: config.brand_id.clone(),
                session_id: OnceLock::new(),
                page_url: Mutex::new(None),
            }),
        }
    }

    /// The endpoint events are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// The tracker's session id.
    #[must_use]
    pub fn session_id(&self) -> &str {
        self.inner
            .session_id
            .get_or_init(|| Uuid::new_v4().to_string())
    }

    /// Set the page URL reported with subsequent events.
    pub fn set_page_url(&self, url: impl Into<String>) {
        *lock(&self.inner.page_url) = Some(url.into());
    }

    /// Build the payload for a named event.
    #[must_use]
    pub fn payload(&self, event: &str, properties: Value) -> PixelPayload {
        PixelPayload {
            brand_id: self.inner.brand_id.clone(),
            session_id: self.session_id().to_string(),
            event: event.to_string(),
            properties,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            user_agent: USER_AGENT.to_string(),
            url: lock(&self.inner.page_url).clone(),
        }
    }

    /// Post a payload and wait for the response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip_all, fields(event = %payload.event))]
    pub async fn send(&self, payload: &PixelPayload) -> Result<(), reqwest::Error> {
        self.inner
            .client
            .post(&self.inner.endpoint)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fire-and-forget: post `payload` on a background task.
    ///
    /// Failures, and calls made outside a Tokio runtime, are logged at debug
    /// and otherwise ignored.
    pub fn dispatch(&self, payload: PixelPayload) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let tracker = self.clone();
                handle.spawn(async move {
                    if let Err(e) = tracker.send(&payload).await {
                        debug!(error = %e, event = %payload.event, "Pixel event not delivered");
                    }
                });
            }
            Err(_) => debug!(event = %payload.event, "No runtime; pixel event dropped"),
        }
    }
}

impl EventSink for PixelTracker {
    fn track(&self, event: &AnalyticsEvent) {
        self.dispatch(self.payload(event.ga4_name(), event.ga4_params()));
    }
}

// =============================================================================
// Script tags
// =============================================================================

impl AnalyticsConfig {
    /// Loader snippets for every configured provider, newline separated.
    /// Empty when nothing is configured.
    #[must_use]
    pub fn script_tags(&self) -> String {
        let mut tags = Vec::new();

        if let Some(id) = tag_id("ga4", self.ga4_measurement_id.as_deref()) {
            tags.push(format!(
                "<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n\
                 <script>window.dataLayer=window.dataLayer||[];\
                 function gtag(){{dataLayer.push(arguments);}}\
                 gtag('js',new Date());gtag('config','{id}');</script>"
            ));
        }

        if let Some(id) = tag_id("meta", self.meta_pixel_id.as_deref()) {
            tags.push(format!(
                "<script>!function(f,b,e,v,n,t,s){{if(f.fbq)return;n=f.fbq=function(){{n.callMethod?\
                 n.callMethod.apply(n,arguments):n.queue.push(arguments)}};if(!f._fbq)f._fbq=n;\
                 n.push=n;n.loaded=!0;n.version='2.0';n.queue=[];t=b.createElement(e);t.async=!0;\
                 t.src=v;s=b.getElementsByTagName(e)[0];s.parentNode.insertBefore(t,s)}}\
                 (window,document,'script','https://connect.facebook.net/en_US/fbevents.js');\
                 fbq('init','{id}');fbq('track','PageView');</script>"
            ));
        }

        if let Some(id) = tag_id("clarity", self.clarity_project_id.as_deref()) {
            tags.push(format!(
                "<script>(function(c,l,a,r,i,t,y){{c[a]=c[a]||function(){{(c[a].q=c[a].q||[]).push(arguments)}};\
                 t=l.createElement(r);t.async=1;t.src=\"https://www.clarity.ms/tag/\"+i;\
                 y=l.getElementsByTagName(r)[0];y.parentNode.insertBefore(t,y);}})\
                 (window,document,\"clarity\",\"script\",\"{id}\");</script>"
            ));
        }

        tags.join("\n")
    }
}

/// A configured provider id, trimmed. Blank ids are skipped. Ids with
/// anything besides ASCII alphanumerics, `-` or `_` are rejected, since
/// they are interpolated into inline script text.
fn tag_id<'a>(provider: &str, value: Option<&'a str>) -> Option<&'a str> {
    let id = value.map(str::trim).filter(|v| !v.is_empty())?;
    if id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        Some(id)
    } else {
        warn!(provider, "Ignoring analytics id with unsupported characters");
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> EventItem {
        EventItem {
            id: id.to_string(),
            name: format!("Product {id}"),
            variant: None,
            price: Decimal::from(price),
            quantity,
        }
    }

    #[test]
    fn test_event_names() {
        let event = AnalyticsEvent::AddToCart {
            item: item("v1", 10, 2),
            currency: "USD".to_string(),
        };
        assert_eq!(event.ga4_name(), "add_to_cart");
        assert_eq!(event.meta_name(), Some("AddToCart"));

        let checkout = AnalyticsEvent::BeginCheckout {
            items: vec![],
            currency: "USD".to_string(),
        };
        assert_eq!(checkout.meta_name(), Some("InitiateCheckout"));

        let view_cart = AnalyticsEvent::ViewCart {
            items: vec![],
            currency: "USD".to_string(),
        };
        assert_eq!(view_cart.meta_name(), None);
    }

    #[test]
    fn test_params_value_and_items() {
        let event = AnalyticsEvent::Purchase {
            transaction_id: "order-1".to_string(),
            items: vec![item("v1", 10, 2), item("v2", 5, 1)],
            currency: "USD".to_string(),
        };

        let ga4 = event.ga4_params();
        assert_eq!(ga4["transaction_id"], "order-1");
        assert_eq!(ga4["value"], json!(Decimal::from(25)));
        assert_eq!(ga4["items"][0]["item_id"], "v1");

        let meta = event.meta_params();
        assert_eq!(meta["content_ids"], json!(["v1", "v2"]));
        assert_eq!(meta["num_items"], 3);
        assert_eq!(meta["currency"], "USD");
    }

    #[test]
    fn test_session_id_is_stable() {
        let tracker = PixelTracker::new(&PlatformConfig::new("https://adsurf.ai/", "key"));
        assert_eq!(tracker.endpoint(), "https://adsurf.ai/api/pixel/track");

        let first = tracker.session_id().to_string();
        assert_eq!(tracker.clone().session_id(), first);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_payload_shape() {
        let tracker = PixelTracker::new(&PlatformConfig::new("https://adsurf.ai", "key"));
        tracker.set_page_url("https://shop.example.com/products/tee");

        let json = serde_json::to_value(tracker.payload("page_view", json!({}))).unwrap();
        assert_eq!(json["event"], "page_view");
        assert_eq!(json["sessionId"], tracker.session_id());
        assert_eq!(json["url"], "https://shop.example.com/products/tee");
        assert!(json["userAgent"].as_str().is_some_and(|ua| ua.starts_with("storefront-sdk/")));
        assert!(json["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
    }

    #[test]
    fn test_dispatch_without_runtime_is_dropped() {
        let tracker = PixelTracker::new(&PlatformConfig::new("http://127.0.0.1:9", "key"));
        tracker.track(&AnalyticsEvent::Search {
            query: "tea".to_string(),
        });
    }

    #[test]
    fn test_script_tags_only_for_configured_ids() {
        let none = AnalyticsConfig::default();
        assert_eq!(none.script_tags(), "");

        let config = AnalyticsConfig {
            ga4_measurement_id: Some("G-TEST".to_string()),
            meta_pixel_id: Some("  ".to_string()),
            clarity_project_id: Some("abc123".to_string()),
        };
        let tags = config.script_tags();
        assert!(tags.contains("gtag/js?id=G-TEST"));
        assert!(tags.contains("gtag('config','G-TEST')"));
        assert!(!tags.contains("fbevents.js"));
        assert!(tags.contains("\"abc123\""));
    }

    #[test]
    fn test_script_tags_reject_ids_that_break_out_of_script() {
        let config = AnalyticsConfig {
            ga4_measurement_id: Some("G-1');alert(1);//".to_string()),
            meta_pixel_id: Some("123</script><script>x()".to_string()),
            clarity_project_id: Some("ok_id-9".to_string()),
        };
        let tags = config.script_tags();
        assert!(!tags.contains("alert"));
        assert!(!tags.contains("gtag/js"));
        assert!(!tags.contains("fbevents.js"));
        assert!(tags.contains("\"ok_id-9\""));
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        sink.track(&AnalyticsEvent::Lead {
            form_type: "wholesale".to_string(),
        });
        assert_eq!(sink.events().len(), 1);
    }
}
