//! Application form submissions (wholesale, affiliate, ...).

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{PlatformClient, PlatformError};

/// Acknowledgement of a submitted application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationReceipt {
    pub id: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationBody<'a> {
    form_type: &'a str,
    fields: &'a serde_json::Map<String, serde_json::Value>,
}

impl PlatformClient {
    /// Submit an application form.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; validation failures reported by
    /// the server arrive as an `ApiError` carrying its message.
    #[instrument(skip(self, fields))]
    pub async fn submit_application(
        &self,
        form_type: &str,
        fields: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ApplicationReceipt, PlatformError> {
        let body = ApplicationBody { form_type, fields };
        self.send(
            self.request(Method::POST, "/api/storefront/applications")
                .json(&body),
        )
        .await
    }
}
