//! Application and contact forms with client-side validation.
//!
//! Fields are validated one at a time as they change (only to clear or
//! refresh an error already shown) and all together on submit. Submitting
//! with an invalid field never reaches the network.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};
use storefront_sdk_core::Email;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::platform::{ApplicationReceipt, PlatformClient, PlatformError};

/// Shown when a submission fails without a server message.
pub const GENERIC_SUBMIT_ERROR: &str = "Something went wrong. Please try again.";

/// Errors from [`ApplicationForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Some fields failed validation; nothing was sent.
    #[error("{0} field(s) need attention")]
    Invalid(usize),

    /// The server rejected the submission or could not be reached.
    #[error("{0}")]
    Submit(String),
}

/// Input type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Tel,
    Textarea,
    /// One of a fixed list of options.
    Select(Vec<String>),
    /// `"true"` when checked.
    Checkbox,
}

/// Caller-supplied rule: returns an error message for an invalid value.
pub type Validator = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A form field definition.
#[derive(Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
    validator: Option<Validator>,
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("custom_validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            placeholder: None,
            validator: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Add a rule that runs after the built-in ones.
    #[must_use]
    pub fn validate_with(
        mut self,
        validator: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Error message for `value`, or `None` if it is valid.
    #[must_use]
    pub fn validate(&self, value: &str) -> Option<String> {
        let value = value.trim();
        let empty = match self.kind {
            FieldKind::Checkbox => value != "true",
            _ => value.is_empty(),
        };

        if empty {
            return self
                .required
                .then(|| format!("{} is required", self.label));
        }

        let builtin = match &self.kind {
            FieldKind::Email => Email::parse(value)
                .err()
                .map(|_| "Please enter a valid email address".to_string()),
            FieldKind::Url => (!is_web_url(value)).then(|| "Please enter a valid URL".to_string()),
            FieldKind::Select(options) => (!options.iter().any(|o| o == value))
                .then(|| "Please select a valid option".to_string()),
            FieldKind::Text | FieldKind::Tel | FieldKind::Textarea | FieldKind::Checkbox => None,
        };

        builtin.or_else(|| self.validator.as_ref().and_then(|v| v(value)))
    }

    fn to_json(&self, value: &str) -> Value {
        match self.kind {
            FieldKind::Checkbox => Value::Bool(value.trim() == "true"),
            _ => Value::String(value.trim().to_string()),
        }
    }
}

fn is_web_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

// =============================================================================
// Presets
// =============================================================================

/// Built-in forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPreset {
    Wholesale,
    Affiliate,
    Ambassador,
    Contact,
}

impl FormPreset {
    /// The `formType` sent to the platform.
    #[must_use]
    pub const fn form_type(self) -> &'static str {
        match self {
            Self::Wholesale => "wholesale",
            Self::Affiliate => "affiliate",
            Self::Ambassador => "ambassador",
            Self::Contact => "contact",
        }
    }

    #[must_use]
    pub fn fields(self) -> Vec<FormField> {
        let name = FormField::new("name", "Name", FieldKind::Text).required();
        let email = FormField::new("email", "Email", FieldKind::Email).required();

        match self {
            Self::Wholesale => vec![
                FormField::new("businessName", "Business name", FieldKind::Text).required(),
                name,
                email,
                FormField::new("phone", "Phone", FieldKind::Tel),
                FormField::new("website", "Website", FieldKind::Url)
                    .placeholder("https://"),
                FormField::new(
                    "businessType",
                    "Business type",
                    FieldKind::Select(options(&[
                        "Retail store",
                        "Online store",
                        "Cafe or restaurant",
                        "Distributor",
                        "Other",
                    ])),
                )
                .required(),
                FormField::new("message", "Tell us about your business", FieldKind::Textarea),
            ],
            Self::Affiliate => vec![
                name,
                email,
                FormField::new("website", "Website or channel", FieldKind::Url).required(),
                FormField::new(
                    "audienceSize",
                    "Audience size",
                    FieldKind::Select(options(&["Under 1k", "1k-10k", "10k-100k", "100k+"])),
                ),
                FormField::new("promotionPlan", "How will you promote us?", FieldKind::Textarea)
                    .required(),
            ],
            Self::Ambassador => vec![
                name,
                email,
                FormField::new("instagram", "Instagram handle", FieldKind::Text)
                    .required()
                    .placeholder("@")
                    .validate_with(|v| {
                        v.contains(char::is_whitespace)
                            .then(|| "Handles cannot contain spaces".to_string())
                    }),
                FormField::new("tiktok", "TikTok handle", FieldKind::Text),
                FormField::new("why", "Why do you want to join?", FieldKind::Textarea).required(),
                FormField::new("terms", "I agree to the program terms", FieldKind::Checkbox)
                    .required(),
            ],
            Self::Contact => vec![
                name,
                email,
                FormField::new("subject", "Subject", FieldKind::Text),
                FormField::new("message", "Message", FieldKind::Textarea).required(),
            ],
        }
    }
}

fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

// =============================================================================
// Form
// =============================================================================

/// Where forms are submitted.
pub trait ApplicationBackend: Send + Sync {
    fn submit(
        &self,
        form_type: &str,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = Result<ApplicationReceipt, PlatformError>> + Send;
}

impl ApplicationBackend for PlatformClient {
    fn submit(
        &self,
        form_type: &str,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = Result<ApplicationReceipt, PlatformError>> + Send {
        self.submit_application(form_type, fields)
    }
}

type SuccessCallback = Box<dyn FnMut(&ApplicationReceipt) + Send>;

/// A form's values, field errors and submission state.
pub struct ApplicationForm<B> {
    backend: B,
    form_type: String,
    fields: Vec<FormField>,
    values: HashMap<String, String>,
    errors: HashMap<String, String>,
    submitting: bool,
    submitted: bool,
    submit_error: Option<String>,
    on_success: Option<SuccessCallback>,
}

impl<B> fmt::Debug for ApplicationForm<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationForm")
            .field("form_type", &self.form_type)
            .field("fields", &self.fields)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

impl<B: ApplicationBackend> ApplicationForm<B> {
    pub fn new(backend: B, form_type: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            backend,
            form_type: form_type.into(),
            fields,
            values: HashMap::new(),
            errors: HashMap::new(),
            submitting: false,
            submitted: false,
            submit_error: None,
            on_success: None,
        }
    }

    /// One of the built-in forms.
    pub fn preset(backend: B, preset: FormPreset) -> Self {
        Self::new(backend, preset.form_type(), preset.fields())
    }

    /// Called with the receipt after every successful submission.
    #[must_use]
    pub fn on_success(mut self, callback: impl FnMut(&ApplicationReceipt) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    #[must_use]
    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the last submission succeeded.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Update a value. A field already showing an error is re-validated so
    /// the error clears as soon as the value is fixed.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if self.errors.contains_key(name) {
            let error = self
                .fields
                .iter()
                .find(|f| f.name == name)
                .and_then(|f| f.validate(&value));
            match error {
                Some(message) => self.errors.insert(name.to_string(), message),
                None => self.errors.remove(name),
            };
        }
        self.values.insert(name.to_string(), value);
        self.submitted = false;
    }

    /// Validate every field, replacing all field errors. Returns whether
    /// the form is valid.
    pub fn validate_all(&mut self) -> bool {
        self.errors = self
            .fields
            .iter()
            .filter_map(|f| f.validate(self.value(&f.name)).map(|e| (f.name.clone(), e)))
            .collect();
        self.errors.is_empty()
    }

    fn payload(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.to_json(self.value(&f.name))))
            .collect()
    }

    fn reset(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.submit_error = None;
    }

    /// Validate and send the form.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` without sending anything if a field fails
    /// validation, or `Submit` with the server's message (else a generic
    /// one) if the submission fails.
    #[instrument(skip(self), fields(form_type = %self.form_type))]
    pub async fn submit(&mut self) -> Result<ApplicationReceipt, FormError> {
        self.submit_error = None;
        if !self.validate_all() {
            return Err(FormError::Invalid(self.errors.len()));
        }

        self.submitting = true;
        let result = self.backend.submit(&self.form_type, &self.payload()).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                info!("Application submitted");
                self.reset();
                self.submitted = true;
                if let Some(callback) = self.on_success.as_mut() {
                    callback(&receipt);
                }
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "Application submission failed");
                let message = match &e {
                    PlatformError::Api(api) => api.server_message().map(str::to_string),
                    _ => None,
                }
                .unwrap_or_else(|| GENERIC_SUBMIT_ERROR.to_string());
                self.submit_error = Some(message.clone());
                Err(FormError::Submit(message))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::ready;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::platform::ApiError;

    /// Records submissions and answers with a fixed status/body.
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<(String, Map<String, Value>)>>,
        failure: Option<(u16, &'static str)>,
    }

    impl ApplicationBackend for FakeBackend {
        fn submit(
            &self,
            form_type: &str,
            fields: &Map<String, Value>,
        ) -> impl Future<Output = Result<ApplicationReceipt, PlatformError>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push((form_type.to_string(), fields.clone()));
            ready(match self.failure {
                Some((status, body)) => Err(ApiError::from_body(status, body).into()),
                None => Ok(ApplicationReceipt {
                    id: Some("app_1".to_string()),
                    message: None,
                }),
            })
        }
    }

    fn fill_contact<B: ApplicationBackend>(form: &mut ApplicationForm<B>) {
        form.set_value("name", "Ada");
        form.set_value("email", "ada@example.com");
        form.set_value("message", "Hello");
    }

    #[test]
    fn test_builtin_rules() {
        let email = FormField::new("email", "Email", FieldKind::Email).required();
        assert_eq!(email.validate("  ").as_deref(), Some("Email is required"));
        assert_eq!(
            email.validate("nope").as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(email.validate("a@b.co"), None);

        let url = FormField::new("site", "Site", FieldKind::Url);
        assert_eq!(url.validate(""), None);
        assert_eq!(url.validate("ftp://x.com").as_deref(), Some("Please enter a valid URL"));
        assert_eq!(url.validate("https://x.com"), None);

        let terms = FormField::new("terms", "Terms", FieldKind::Checkbox).required();
        assert_eq!(terms.validate("false").as_deref(), Some("Terms is required"));
        assert_eq!(terms.validate("true"), None);
    }

    #[test]
    fn test_custom_validator_runs_after_builtin() {
        let field = FormField::new("email", "Email", FieldKind::Email).validate_with(|v| {
            (!v.ends_with("@corp.com")).then(|| "Use your work email".to_string())
        });
        assert_eq!(
            field.validate("bad").as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            field.validate("a@gmail.com").as_deref(),
            Some("Use your work email")
        );
        assert_eq!(field.validate("a@corp.com"), None);
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let mut form = ApplicationForm::preset(FakeBackend::default(), FormPreset::Contact);
        form.set_value("email", "not-an-email");

        let err = form.submit().await.unwrap_err();
        assert_eq!(err, FormError::Invalid(3));
        assert_eq!(form.field_error("name"), Some("Name is required"));
        assert!(form.backend.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_set_value_only_revalidates_fields_with_errors() {
        let mut form = ApplicationForm::preset(FakeBackend::default(), FormPreset::Contact);
        form.set_value("email", "bad");
        assert_eq!(form.field_error("email"), None);

        form.validate_all();
        assert!(form.field_error("email").is_some());

        form.set_value("email", "still bad");
        assert_eq!(
            form.field_error("email"),
            Some("Please enter a valid email address")
        );
        form.set_value("email", "ada@example.com");
        assert_eq!(form.field_error("email"), None);
    }

    #[tokio::test]
    async fn test_success_resets_and_calls_back() {
        let successes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&successes);
        let mut form = ApplicationForm::preset(FakeBackend::default(), FormPreset::Contact)
            .on_success(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        fill_contact(&mut form);

        let receipt = form.submit().await.unwrap();
        assert_eq!(receipt.id.as_deref(), Some("app_1"));
        assert!(form.is_submitted());
        assert_eq!(form.value("name"), "");
        assert_eq!(successes.load(Ordering::SeqCst), 1);

        let calls = form.backend.calls.lock().unwrap();
        assert_eq!(calls[0].0, "contact");
        assert_eq!(calls[0].1["email"], "ada@example.com");
        assert_eq!(calls[0].1["subject"], "");
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let backend = FakeBackend {
            failure: Some((422, r#"{"message":"Email already applied"}"#)),
            ..FakeBackend::default()
        };
        let mut form = ApplicationForm::preset(backend, FormPreset::Contact);
        fill_contact(&mut form);
        let err = form.submit().await.unwrap_err();
        assert_eq!(err, FormError::Submit("Email already applied".to_string()));
        assert_eq!(form.value("name"), "Ada");

        let backend = FakeBackend {
            failure: Some((500, "<html>oops</html>")),
            ..FakeBackend::default()
        };
        let mut form = ApplicationForm::preset(backend, FormPreset::Contact);
        fill_contact(&mut form);
        form.submit().await.unwrap_err();
        assert_eq!(form.submit_error(), Some(GENERIC_SUBMIT_ERROR));
    }

    #[test]
    fn test_presets() {
        for preset in [
            FormPreset::Wholesale,
            FormPreset::Affiliate,
            FormPreset::Ambassador,
            FormPreset::Contact,
        ] {
            let fields = preset.fields();
            assert!(fields.iter().any(|f| f.kind == FieldKind::Email && f.required));
        }

        let ambassador = FormPreset::Ambassador.fields();
        let handle = ambassador.iter().find(|f| f.name == "instagram").unwrap();
        assert_eq!(
            handle.validate("my handle").as_deref(),
            Some("Handles cannot contain spaces")
        );
    }
}
