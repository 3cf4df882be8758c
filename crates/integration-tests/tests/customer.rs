//! Integration tests for customer accounts: session, data loading and
//! subscription management.

use mockito::{Matcher, Server};
use serde_json::json;
use storefront_sdk::loaders::{CustomerLoader, SubscriptionLoader};
use storefront_sdk::platform::{
    CustomerClient, CustomerSession, Frequency, FrequencyInterval, PlatformError,
    SubscriptionStatus,
};
use storefront_sdk::widgets::{CustomerPortal, PortalTab};
use storefront_sdk::{MemoryStorage, PlatformClient};
use storefront_sdk_integration_tests::{platform_config, subscription};

const TOKEN: &str = "tok-123";

fn customer_client(server: &Server, logged_in: bool) -> CustomerClient<MemoryStorage> {
    let platform = PlatformClient::new(&platform_config(&server.url()));
    let client = CustomerClient::new(platform, CustomerSession::new(MemoryStorage::new()));
    if logged_in {
        client
            .session()
            .login(TOKEN)
            .expect("token should be stored");
    }
    client
}

async fn mock_read(
    server: &mut Server,
    resource: &str,
    status: usize,
    body: String,
) -> mockito::Mock {
    server
        .mock("GET", format!("/api/storefront/customer/{resource}").as_str())
        .match_header("x-customer-token", TOKEN)
        .match_query(Matcher::UrlEncoded("token".into(), TOKEN.into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn profile_body() -> String {
    json!({
        "customer": {
            "id": "cust-1",
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "acceptsMarketing": true
        }
    })
    .to_string()
}

fn orders_body() -> String {
    json!({
        "orders": [{
            "id": "order-1",
            "name": "#1001",
            "createdAt": "2026-09-01T12:00:00Z",
            "financialStatus": "paid",
            "totalPrice": "48.00",
            "currencyCode": "USD",
            "lineItems": [{ "title": "Cold Brew Concentrate", "quantity": 2, "price": "24.00" }]
        }]
    })
    .to_string()
}

fn subscriptions_body() -> String {
    json!({ "subscriptions": [subscription("sub-1", "active")] }).to_string()
}

// === Session ===

#[tokio::test]
async fn test_logged_out_calls_fail_without_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = customer_client(&server, false);
    let err = client.get_profile().await.expect_err("should need a login");

    assert!(matches!(err, PlatformError::NotLoggedIn));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_profile_sends_token_in_header_and_query() {
    let mut server = Server::new_async().await;
    let mock = mock_read(&mut server, "profile", 200, profile_body()).await;

    let client = customer_client(&server, true);
    let profile = client.get_profile().await.expect("profile should load");

    assert_eq!(profile.full_name(), "Ada Lovelace");
    assert!(profile.accepts_marketing);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_logout_clears_token() {
    let server = Server::new_async().await;
    let client = customer_client(&server, true);
    assert!(client.session().is_logged_in());

    client.logout().expect("logout should succeed");

    assert!(!client.session().is_logged_in());
    assert!(matches!(
        client.get_orders().await,
        Err(PlatformError::NotLoggedIn)
    ));
}

// === Loader ===

#[tokio::test]
async fn test_loader_fetches_everything() {
    let mut server = Server::new_async().await;
    let profile = mock_read(&mut server, "profile", 200, profile_body()).await;
    let orders = mock_read(&mut server, "orders", 200, orders_body()).await;
    let subs = mock_read(&mut server, "subscriptions", 200, subscriptions_body()).await;

    let loader = CustomerLoader::new(customer_client(&server, true));
    assert!(loader.load().await);

    let data = loader.snapshot();
    assert!(!data.loading);
    assert_eq!(data.error, None);
    assert_eq!(data.orders.len(), 1);
    assert_eq!(data.orders[0].total().display(), "$48.00");
    assert_eq!(data.subscriptions[0].frequency.to_string(), "Every 2 weeks");
    assert_eq!(
        data.profile.map(|p| p.email),
        Some("ada@example.com".to_string())
    );

    profile.assert_async().await;
    orders.assert_async().await;
    subs.assert_async().await;
}

#[tokio::test]
async fn test_loader_keeps_partial_data_on_failure() {
    let mut server = Server::new_async().await;
    let _profile = mock_read(&mut server, "profile", 200, profile_body()).await;
    let _orders = mock_read(
        &mut server,
        "orders",
        500,
        r#"{"error":"Orders unavailable"}"#.to_string(),
    )
    .await;
    let _subs = mock_read(&mut server, "subscriptions", 200, subscriptions_body()).await;

    let loader = CustomerLoader::new(customer_client(&server, true));
    loader.load().await;

    let data = loader.snapshot();
    assert_eq!(data.error.as_deref(), Some("Orders unavailable"));
    assert!(data.profile.is_some());
    assert!(data.orders.is_empty());
    assert_eq!(data.subscriptions.len(), 1);
}

// === Subscriptions ===

#[tokio::test]
async fn test_pause_posts_action_with_token() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/storefront/customer/subscriptions/sub-1/pause")
        .match_header("x-customer-token", TOKEN)
        .with_status(200)
        .with_body(json!({ "subscription": subscription("sub-1", "paused") }).to_string())
        .create_async()
        .await;

    let actions = SubscriptionLoader::new(customer_client(&server, true));
    let paused = actions.pause("sub-1").await.expect("pause should succeed");

    assert_eq!(paused.status, SubscriptionStatus::Paused);
    assert_eq!(actions.pending(), None);
    assert_eq!(actions.error(), None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_change_frequency_sends_interval() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/storefront/customer/subscriptions/sub-1/frequency")
        .match_body(Matcher::Json(json!({ "interval": "month", "intervalCount": 1 })))
        .with_status(200)
        .with_body(json!({ "subscription": subscription("sub-1", "active") }).to_string())
        .create_async()
        .await;

    let actions = SubscriptionLoader::new(customer_client(&server, true));
    let frequency = Frequency {
        interval: FrequencyInterval::Month,
        interval_count: 1,
    };
    assert!(actions.change_frequency("sub-1", frequency).await.is_ok());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_action_records_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/api/storefront/customer/subscriptions/sub-1/skip")
        .with_status(409)
        .with_body(r#"{"error":"Next delivery already processed"}"#)
        .create_async()
        .await;

    let actions = SubscriptionLoader::new(customer_client(&server, true));
    assert!(actions.skip_next("sub-1").await.is_err());
    assert_eq!(
        actions.error().as_deref(),
        Some("Next delivery already processed")
    );
}

// === Portal ===

#[tokio::test]
async fn test_portal_pause_updates_loaded_subscription() {
    let mut server = Server::new_async().await;
    let _profile = mock_read(&mut server, "profile", 200, profile_body()).await;
    let _orders = mock_read(&mut server, "orders", 200, orders_body()).await;
    let _subs = mock_read(&mut server, "subscriptions", 200, subscriptions_body()).await;
    let _pause = server
        .mock("POST", "/api/storefront/customer/subscriptions/sub-1/pause")
        .with_status(200)
        .with_body(json!({ "subscription": subscription("sub-1", "paused") }).to_string())
        .create_async()
        .await;

    let mut portal = CustomerPortal::new(customer_client(&server, true));
    portal.select_tab(PortalTab::Subscriptions);
    portal.load().await;
    portal.pause("sub-1").await;

    let data = portal.data();
    assert_eq!(data.subscriptions[0].status, SubscriptionStatus::Paused);
    assert_eq!(portal.error(), None);

    portal.logout().expect("logout should succeed");
    assert_eq!(portal.tab(), PortalTab::Orders);
    assert_eq!(portal.data().profile, None);
}
