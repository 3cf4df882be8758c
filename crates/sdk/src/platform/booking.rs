//! Booking endpoints: event types, availability and booking creation.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{PlatformClient, PlatformError};

/// A bookable kind of appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventType {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// An open slot on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    /// Start time as `9:30 AM` (UTC).
    #[must_use]
    pub fn label(&self) -> String {
        self.start.format("%-I:%M %p").to_string()
    }
}

/// Attendee details submitted to create a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub event_type_id: String,
    pub start: DateTime<Utc>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub event_type_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub meeting_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTypesEnvelope {
    #[serde(default)]
    event_types: Vec<EventType>,
}

#[derive(Deserialize)]
struct AvailabilityEnvelope {
    #[serde(default)]
    slots: Vec<TimeSlot>,
}

#[derive(Deserialize)]
struct BookingEnvelope {
    booking: Booking,
}

impl PlatformClient {
    /// List bookable event types.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_event_types(&self) -> Result<Vec<EventType>, PlatformError> {
        let envelope: EventTypesEnvelope = self
            .send(self.request(Method::GET, "/api/storefront/booking/event-types"))
            .await?;
        Ok(envelope.event_types)
    }

    /// Open slots for an event type on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_availability(
        &self,
        event_type_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, PlatformError> {
        let path = format!(
            "/api/storefront/booking/availability?eventTypeId={}&date={}",
            urlencoding::encode(event_type_id),
            date.format("%Y-%m-%d")
        );
        let envelope: AvailabilityEnvelope = self.send(self.request(Method::GET, &path)).await?;
        Ok(envelope.slots)
    }

    /// Create a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the slot was taken.
    #[instrument(skip(self, request), fields(event_type_id = %request.event_type_id))]
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, PlatformError> {
        let envelope: BookingEnvelope = self
            .send(
                self.request(Method::POST, "/api/storefront/booking/bookings")
                    .json(request),
            )
            .await?;
        Ok(envelope.booking)
    }
}
