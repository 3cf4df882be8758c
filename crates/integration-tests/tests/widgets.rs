//! Integration tests for widgets wired to a mock platform.

use chrono::NaiveDate;
use mockito::{Matcher, Server};
use serde_json::json;
use storefront_sdk::analytics::{AnalyticsEvent, PixelTracker, RecordingSink};
use storefront_sdk::loaders::ProductLoader;
use storefront_sdk::widgets::{
    AddToCartButton, AddToCartError, ApplicationForm, BookingStep, BookingWidget, CartDrawerView,
    FormError, FormPreset, GENERIC_SUBMIT_ERROR, checkout_lines,
};
use storefront_sdk::{CartStore, FileStorage, KeyValueCartPersistence, PlatformClient};
use storefront_sdk_integration_tests::{platform_config, platform_product_body};

fn platform(server: &Server) -> PlatformClient {
    PlatformClient::new(&platform_config(&server.url()))
}

fn file_cart(dir: &std::path::Path) -> CartStore<KeyValueCartPersistence<FileStorage>> {
    let storage = FileStorage::open(dir).expect("storage dir should open");
    CartStore::load(KeyValueCartPersistence::new(storage))
}

// === Add to cart ===

#[tokio::test]
async fn test_loaded_product_added_to_persisted_cart() {
    let mut server = Server::new_async().await;
    let _product = server
        .mock("GET", "/api/storefront/products/cold-brew")
        .with_status(200)
        .with_body(platform_product_body("cold-brew"))
        .create_async()
        .await;

    let loader = ProductLoader::new(platform(&server));
    assert!(loader.load("cold-brew").await);
    let snapshot = loader.snapshot();
    let product = snapshot.data().expect("product should be loaded");

    let dir = tempfile::tempdir().expect("temp dir");
    let mut cart = file_cart(dir.path());
    let sink = RecordingSink::new();

    let mut button = AddToCartButton::new(product);
    assert_eq!(button.variant_id(), Some("var-1"));
    button.set_quantity(2);
    button
        .add(product, &mut cart, &sink)
        .expect("add should succeed");

    assert!(cart.is_open());
    assert!(matches!(
        sink.events().as_slice(),
        [AnalyticsEvent::AddToCart { .. }]
    ));

    let reloaded = file_cart(dir.path());
    assert_eq!(reloaded.item_count(), 2);

    let view = CartDrawerView::new(&reloaded, "USD");
    assert_eq!(view.subtotal, "$48.00");
    assert_eq!(view.lines[0].compare_at_price.as_deref(), Some("$30.00"));
    assert_eq!(view.lines[0].discount_percent, Some(20));

    let lines = checkout_lines(&reloaded);
    assert_eq!(lines[0].merchandise_id, "var-1");
    assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn test_sold_out_variant_is_rejected() {
    let mut server = Server::new_async().await;
    let _product = server
        .mock("GET", "/api/storefront/products/cold-brew")
        .with_status(200)
        .with_body(platform_product_body("cold-brew"))
        .create_async()
        .await;

    let product = platform(&server)
        .get_product("cold-brew")
        .await
        .expect("product should load");

    let dir = tempfile::tempdir().expect("temp dir");
    let mut cart = file_cart(dir.path());
    let sink = RecordingSink::new();

    let mut button = AddToCartButton::new(&product);
    button.select_variant("var-2");

    assert_eq!(button.label(&product), "Sold Out");
    let err = button
        .add(&product, &mut cart, &sink)
        .expect_err("sold out variant should be rejected");

    assert!(matches!(err, AddToCartError::SoldOut(_)));
    assert!(cart.is_empty());
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_loader_records_not_found() {
    let mut server = Server::new_async().await;
    let _product = server
        .mock("GET", "/api/storefront/products/missing")
        .with_status(404)
        .with_body(r#"{"error":"Product not found"}"#)
        .create_async()
        .await;

    let loader = ProductLoader::new(platform(&server));
    assert!(loader.load("missing").await);

    let snapshot = loader.snapshot();
    assert!(!snapshot.loading());
    assert_eq!(snapshot.error(), Some("Product not found"));
    assert!(snapshot.data().is_none());
}

// === Booking ===

async fn mock_event_types(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/api/storefront/booking/event-types")
        .with_status(200)
        .with_body(
            json!({
                "eventTypes": [
                    { "id": "et-1", "title": "Coffee tasting", "durationMinutes": 30 },
                    { "id": "et-2", "title": "Barista class", "durationMinutes": 90 }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await
}

#[tokio::test]
async fn test_booking_wizard_end_to_end() {
    let mut server = Server::new_async().await;
    let _types = mock_event_types(&mut server).await;
    let _slots = server
        .mock("GET", "/api/storefront/booking/availability")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("eventTypeId".into(), "et-1".into()),
            Matcher::UrlEncoded("date".into(), "2026-11-02".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "slots": [
                    { "start": "2026-11-02T15:00:00Z", "end": "2026-11-02T15:30:00Z" },
                    { "start": "2026-11-02T16:00:00Z", "end": "2026-11-02T16:30:00Z" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let booking = server
        .mock("POST", "/api/storefront/booking/bookings")
        .match_body(Matcher::PartialJson(json!({
            "eventTypeId": "et-1",
            "start": "2026-11-02T16:00:00Z",
            "name": "Ada Lovelace",
            "email": "ada@example.com"
        })))
        .with_status(200)
        .with_body(
            json!({
                "booking": {
                    "id": "bk-1",
                    "eventTypeId": "et-1",
                    "start": "2026-11-02T16:00:00Z",
                    "end": "2026-11-02T16:30:00Z"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut widget = BookingWidget::new(platform(&server));
    widget.start().await;
    assert_eq!(widget.step(), BookingStep::EventType);
    assert_eq!(widget.event_types().len(), 2);

    widget.select_event_type("et-1").expect("known event type");
    assert_eq!(widget.step(), BookingStep::Calendar);

    let date = NaiveDate::from_ymd_opt(2026, 11, 2).expect("valid date");
    widget.select_date(date).await.expect("availability should load");
    assert_eq!(widget.step(), BookingStep::Time);
    assert_eq!(widget.slots().len(), 2);
    assert_eq!(widget.slots()[1].label(), "4:00 PM");

    let start = widget.slots()[1].start;
    widget.select_slot(start).expect("slot is open");
    assert_eq!(widget.step(), BookingStep::Form);

    widget.set_name("  Ada Lovelace ");
    widget.set_email("ada@example.com");
    let confirmed = widget.submit().await.expect("booking should succeed");
    assert_eq!(confirmed.id, "bk-1");
    assert_eq!(widget.step(), BookingStep::Confirmation);

    booking.assert_async().await;
}

#[tokio::test]
async fn test_booking_date_without_slots() {
    let mut server = Server::new_async().await;
    let _types = mock_event_types(&mut server).await;
    let _slots = server
        .mock("GET", "/api/storefront/booking/availability")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"slots":[]}"#)
        .create_async()
        .await;

    let mut widget = BookingWidget::for_event_type(platform(&server), "et-2");
    widget.start().await;
    assert_eq!(widget.step(), BookingStep::Calendar);

    let date = NaiveDate::from_ymd_opt(2026, 12, 25).expect("valid date");
    widget.select_date(date).await.expect("availability should load");

    assert_eq!(widget.step(), BookingStep::Time);
    assert!(widget.slots().is_empty());
    assert!(widget.availability_message().is_some());

    widget.go_back();
    assert_eq!(widget.step(), BookingStep::Calendar);
    widget.go_back();
    assert_eq!(widget.step(), BookingStep::Calendar);
}

#[tokio::test]
async fn test_booking_failure_keeps_form_step() {
    let mut server = Server::new_async().await;
    let _types = mock_event_types(&mut server).await;
    let _slots = server
        .mock("GET", "/api/storefront/booking/availability")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({ "slots": [{ "start": "2026-11-02T15:00:00Z", "end": "2026-11-02T15:30:00Z" }] })
                .to_string(),
        )
        .create_async()
        .await;
    let _booking = server
        .mock("POST", "/api/storefront/booking/bookings")
        .with_status(409)
        .with_body(r#"{"error":"This time was just booked"}"#)
        .create_async()
        .await;

    let mut widget = BookingWidget::for_event_type(platform(&server), "et-1");
    widget.start().await;
    let date = NaiveDate::from_ymd_opt(2026, 11, 2).expect("valid date");
    widget.select_date(date).await.expect("availability should load");
    let start = widget.slots()[0].start;
    widget.select_slot(start).expect("slot is open");
    widget.set_name("Ada");
    widget.set_email("ada@example.com");

    assert!(widget.submit().await.is_err());
    assert_eq!(widget.step(), BookingStep::Form);
    assert_eq!(widget.error(), Some("This time was just booked"));
}

// === Application forms ===

#[tokio::test]
async fn test_contact_form_submits_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/storefront/applications")
        .match_body(Matcher::PartialJson(json!({
            "formType": "contact",
            "fields": { "name": "Ada", "email": "ada@example.com", "message": "Hello" }
        })))
        .with_status(200)
        .with_body(r#"{"id":"app-1","message":"Thanks!"}"#)
        .create_async()
        .await;

    let mut form = ApplicationForm::preset(platform(&server), FormPreset::Contact);
    form.set_value("name", "Ada");
    form.set_value("email", "ada@example.com");
    form.set_value("message", "Hello");

    let receipt = form.submit().await.expect("submission should succeed");
    assert_eq!(receipt.id.as_deref(), Some("app-1"));
    assert!(form.is_submitted());
    assert_eq!(form.value("name"), "");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/storefront/applications")
        .expect(0)
        .create_async()
        .await;

    let mut form = ApplicationForm::preset(platform(&server), FormPreset::Contact);
    form.set_value("email", "not-an-email");

    let err = form.submit().await.expect_err("form is invalid");
    assert!(matches!(err, FormError::Invalid(3)));
    assert_eq!(form.field_error("name"), Some("Name is required"));
    assert_eq!(
        form.field_error("email"),
        Some("Please enter a valid email address")
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_rejection_message_is_shown() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/storefront/applications")
        .with_status(422)
        .with_body(r#"{"error":"This email has already applied"}"#)
        .create_async()
        .await;

    let mut form = ApplicationForm::preset(platform(&server), FormPreset::Contact);
    form.set_value("name", "Ada");
    form.set_value("email", "ada@example.com");
    form.set_value("message", "Hello");

    let err = form.submit().await.expect_err("server rejects");
    assert_eq!(err.to_string(), "This email has already applied");
    assert_eq!(form.submit_error(), Some("This email has already applied"));
    assert_eq!(form.value("name"), "Ada");
}

#[tokio::test]
async fn test_server_error_without_message_is_generic() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/storefront/applications")
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;

    let mut form = ApplicationForm::preset(platform(&server), FormPreset::Contact);
    form.set_value("name", "Ada");
    form.set_value("email", "ada@example.com");
    form.set_value("message", "Hello");

    assert!(form.submit().await.is_err());
    assert_eq!(form.submit_error(), Some(GENERIC_SUBMIT_ERROR));
}

// === Pixel ===

#[tokio::test]
async fn test_pixel_posts_payload() {
    let mut server = Server::new_async().await;
    let mut config = platform_config(&server.url());
    config.brand_id = Some("brand-1".to_string());

    let tracker = PixelTracker::new(&config);
    tracker.set_page_url("https://shop.example.com/products/cold-brew");

    let mock = server
        .mock("POST", "/api/pixel/track")
        .match_body(Matcher::PartialJson(json!({
            "brandId": "brand-1",
            "sessionId": tracker.session_id(),
            "event": "add_to_cart",
            "url": "https://shop.example.com/products/cold-brew"
        })))
        .with_status(204)
        .create_async()
        .await;

    let payload = tracker.payload("add_to_cart", json!({ "value": 24 }));
    tracker.send(&payload).await.expect("pixel should accept");

    mock.assert_async().await;
}
