//! Appointment booking wizard.
//!
//! Steps run `EventType -> Calendar -> Time -> Form -> Confirmation`.
//! Each forward step is driven by a selection; [`BookingWidget::go_back`]
//! clears the selection that led to the current step and returns to the
//! previous one. A failed request records an error and leaves the step
//! unchanged so the shopper can retry.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use storefront_sdk_core::Email;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::platform::{Booking, BookingRequest, EventType, PlatformClient, PlatformError, TimeSlot};

/// Shown on the time step when the chosen date has no open slots.
pub const NO_AVAILABLE_TIMES_MESSAGE: &str = "No available times on this date";

/// Errors from booking transitions.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Select an event type first")]
    NoEventType,

    #[error("That time is not available")]
    UnavailableSlot,

    #[error("Select a time first")]
    NoSlot,

    #[error("{0}")]
    Invalid(String),

    #[error("Booking is already confirmed")]
    AlreadyConfirmed,

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Wizard screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    EventType,
    Calendar,
    Time,
    Form,
    Confirmation,
}

/// Booking endpoints the wizard calls.
pub trait BookingBackend: Send + Sync {
    fn event_types(&self) -> impl Future<Output = Result<Vec<EventType>, PlatformError>> + Send;

    fn availability(
        &self,
        event_type_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<TimeSlot>, PlatformError>> + Send;

    fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> impl Future<Output = Result<Booking, PlatformError>> + Send;
}

impl BookingBackend for PlatformClient {
    fn event_types(&self) -> impl Future<Output = Result<Vec<EventType>, PlatformError>> + Send {
        self.get_event_types()
    }

    fn availability(
        &self,
        event_type_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<TimeSlot>, PlatformError>> + Send {
        self.get_availability(event_type_id, date)
    }

    fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> impl Future<Output = Result<Booking, PlatformError>> + Send {
        Self::create_booking(self, request)
    }
}

/// Booking wizard state.
#[derive(Debug)]
pub struct BookingWidget<B> {
    backend: B,
    step: BookingStep,
    preselected_event_type: Option<String>,
    event_types: Vec<EventType>,
    event_type: Option<EventType>,
    date: Option<NaiveDate>,
    slots: Vec<TimeSlot>,
    slot: Option<TimeSlot>,
    name: String,
    email: String,
    notes: String,
    loading: bool,
    error: Option<String>,
    booking: Option<Booking>,
}

impl<B: BookingBackend> BookingWidget<B> {
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            step: BookingStep::EventType,
            preselected_event_type: None,
            event_types: Vec::new(),
            event_type: None,
            date: None,
            slots: Vec::new(),
            slot: None,
            name: String::new(),
            email: String::new(),
            notes: String::new(),
            loading: false,
            error: None,
            booking: None,
        }
    }

    /// Wizard for a single event type; starts on the calendar once
    /// [`start`](Self::start) has loaded it.
    pub fn for_event_type(backend: B, event_type_id: impl Into<String>) -> Self {
        Self {
            preselected_event_type: Some(event_type_id.into()),
            ..Self::new(backend)
        }
    }

    #[must_use]
    pub const fn step(&self) -> BookingStep {
        self.step
    }

    #[must_use]
    pub fn event_types(&self) -> &[EventType] {
        &self.event_types
    }

    #[must_use]
    pub const fn event_type(&self) -> Option<&EventType> {
        self.event_type.as_ref()
    }

    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[must_use]
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    #[must_use]
    pub const fn slot(&self) -> Option<&TimeSlot> {
        self.slot.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    /// Message for the time step when the date has no open slots.
    #[must_use]
    pub fn availability_message(&self) -> Option<&'static str> {
        (self.step == BookingStep::Time && self.slots.is_empty())
            .then_some(NO_AVAILABLE_TIMES_MESSAGE)
    }

    /// Fetch event types. Called once; later calls are no-ops.
    #[instrument(skip(self))]
    pub async fn start(&mut self) {
        if !self.event_types.is_empty() {
            return;
        }

        self.loading = true;
        let result = self.backend.event_types().await;
        self.loading = false;

        match result {
            Ok(event_types) => {
                self.error = None;
                self.event_types = event_types;
                if let Some(id) = self.preselected_event_type.clone()
                    && let Err(e) = self.select_event_type(&id)
                {
                    self.error = Some(e.to_string());
                }
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Choose an event type and move to the calendar.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEventType` if `id` was not among the fetched types.
    pub fn select_event_type(&mut self, id: &str) -> Result<(), BookingError> {
        self.ensure_open()?;
        let event_type = self
            .event_types
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| BookingError::UnknownEventType(id.to_string()))?;

        self.event_type = Some(event_type);
        self.clear_date();
        self.error = None;
        self.step = BookingStep::Calendar;
        Ok(())
    }

    /// Choose a date and fetch its open slots, moving to the time step.
    ///
    /// A date without slots still moves to the time step, where
    /// [`availability_message`](Self::availability_message) explains why
    /// nothing can be chosen.
    ///
    /// # Errors
    ///
    /// Returns `NoEventType` before an event type is chosen, or the
    /// platform error (also recorded) if availability cannot be fetched.
    #[instrument(skip(self))]
    pub async fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        self.ensure_open()?;
        let event_type_id = self
            .event_type
            .as_ref()
            .map(|e| e.id.clone())
            .ok_or(BookingError::NoEventType)?;

        self.loading = true;
        let result = self.backend.availability(&event_type_id, date).await;
        self.loading = false;

        match result {
            Ok(slots) => {
                self.error = None;
                self.date = Some(date);
                self.slots = slots;
                self.slot = None;
                self.step = BookingStep::Time;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e.into())
            }
        }
    }

    /// Choose one of the open slots by start time and move to the form.
    ///
    /// # Errors
    ///
    /// Returns `UnavailableSlot` if no open slot starts at `start`.
    pub fn select_slot(&mut self, start: DateTime<Utc>) -> Result<(), BookingError> {
        self.ensure_open()?;
        let slot = self
            .slots
            .iter()
            .find(|s| s.start == start)
            .copied()
            .ok_or(BookingError::UnavailableSlot)?;

        self.slot = Some(slot);
        self.error = None;
        self.step = BookingStep::Form;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Validate the attendee and create the booking.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for a blank name or bad email, `NoSlot` before a
    /// time is chosen, or the platform error (also recorded) if the
    /// booking fails.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<&Booking, BookingError> {
        self.ensure_open()?;
        let (Some(event_type_id), Some(slot)) =
            (self.event_type.as_ref().map(|e| e.id.clone()), self.slot)
        else {
            return Err(BookingError::NoSlot);
        };

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(self.invalid("Name is required"));
        }
        let Ok(email) = Email::parse(&self.email) else {
            return Err(self.invalid("Please enter a valid email address"));
        };

        let notes = self.notes.trim();
        let request = BookingRequest {
            event_type_id,
            start: slot.start,
            name,
            email: email.as_str().to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        };

        self.loading = true;
        let result = self.backend.create_booking(&request).await;
        self.loading = false;

        match result {
            Ok(booking) => {
                info!(booking_id = %booking.id, "Booking confirmed");
                self.error = None;
                self.step = BookingStep::Confirmation;
                Ok(self.booking.insert(booking))
            }
            Err(e) => {
                self.fail(&e);
                Err(e.into())
            }
        }
    }

    /// Return to the previous step, clearing the selection that led here.
    ///
    /// No-op on the first step, on the confirmation, and on the calendar
    /// of a single-event-type wizard.
    pub fn go_back(&mut self) {
        self.error = None;
        match self.step {
            BookingStep::EventType | BookingStep::Confirmation => {}
            BookingStep::Calendar => {
                if self.preselected_event_type.is_none() {
                    self.event_type = None;
                    self.step = BookingStep::EventType;
                }
            }
            BookingStep::Time => {
                self.clear_date();
                self.step = BookingStep::Calendar;
            }
            BookingStep::Form => {
                self.slot = None;
                self.step = BookingStep::Time;
            }
        }
    }

    fn clear_date(&mut self) {
        self.date = None;
        self.slots.clear();
        self.slot = None;
    }

    const fn ensure_open(&self) -> Result<(), BookingError> {
        match self.step {
            BookingStep::Confirmation => Err(BookingError::AlreadyConfirmed),
            _ => Ok(()),
        }
    }

    fn invalid(&mut self, message: &str) -> BookingError {
        self.error = Some(message.to_string());
        BookingError::Invalid(message.to_string())
    }

    fn fail(&mut self, error: &PlatformError) {
        warn!(error = %error, step = ?self.step, "Booking request failed");
        self.error = Some(error.to_string());
    }
}
