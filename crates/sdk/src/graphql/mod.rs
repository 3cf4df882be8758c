//! Generic GraphQL client.
//!
//! A thin POST-and-parse wrapper for any GraphQL endpoint: the caller
//! supplies the endpoint, fixed headers and documents. Responses carrying an
//! `errors` array become a [`GraphQLQueryError`] with every error detail, so
//! callers can inspect field-level failures with
//! [`GraphQLQueryError::has_error_at_path`].
//!
//! # Example
//!
//! ```rust,ignore
//! let client = GraphQLClient::new(
//!     "https://api.example.com/graphql",
//!     [("Authorization".to_string(), format!("Bearer {token}"))],
//! )?;
//!
//! let data: ShopData = client.query("{ shop { name } }", None).await?;
//! ```

mod error;

pub use error::{ErrorLocation, GraphQLErrorDetail, GraphQLQueryError, PathSegment};

use std::sync::Arc;

use futures::future::try_join_all;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Errors from [`GraphQLClient`].
#[derive(Debug, Error)]
pub enum GraphQLClientError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried GraphQL errors.
    #[error("{0}")]
    Query(#[from] GraphQLQueryError),

    /// Response body was not valid GraphQL JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response had neither data nor errors.
    #[error("No data in response")]
    MissingData,

    /// A configured header name or value is invalid.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// A GraphQL request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    /// A request for `query` with optional variables.
    #[must_use]
    pub fn new(query: impl Into<String>, variables: Option<serde_json::Value>) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
        }
    }
}

/// Client for an arbitrary GraphQL endpoint. Cheap to clone.
#[derive(Clone)]
pub struct GraphQLClient {
    inner: Arc<GraphQLClientInner>,
}

struct GraphQLClientInner {
    client: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl std::fmt::Debug for GraphQLClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLClient")
            .field("endpoint", &self.inner.endpoint)
            .field("headers", &self.inner.headers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl GraphQLClient {
    /// Create a client for `endpoint` that sends `headers` on every request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHeader` if a header name or value is not valid HTTP.
    pub fn new(
        endpoint: impl Into<String>,
        headers: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, GraphQLClientError> {
        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| GraphQLClientError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| GraphQLClientError::InvalidHeader(format!("{name}: {e}")))?;
            header_map.insert(name, value);
        }

        Ok(Self {
            inner: Arc::new(GraphQLClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                headers: header_map,
            }),
        })
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Run a query document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, GraphQL
    /// `errors`, unparseable JSON or missing data.
    #[instrument(skip_all, fields(endpoint = %self.inner.endpoint))]
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T, GraphQLClientError> {
        self.execute(&GraphQLRequest::new(query, variables)).await
    }

    /// Run a mutation document. Identical wire behavior to [`query`](Self::query).
    ///
    /// # Errors
    ///
    /// Same as [`query`](Self::query).
    #[instrument(skip_all, fields(endpoint = %self.inner.endpoint))]
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        mutation: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T, GraphQLClientError> {
        self.execute(&GraphQLRequest::new(mutation, variables)).await
    }

    /// Run several requests in parallel. Results are in request order; the
    /// first failure fails the whole batch.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by any request.
    #[instrument(skip_all, fields(endpoint = %self.inner.endpoint, count = requests.len()))]
    pub async fn batch_query<T: DeserializeOwned>(
        &self,
        requests: &[GraphQLRequest],
    ) -> Result<Vec<T>, GraphQLClientError> {
        try_join_all(requests.iter().map(|request| self.execute(request))).await
    }

    /// POST a request and unwrap the GraphQL envelope.
    ///
    /// # Errors
    ///
    /// Same as [`query`](Self::query).
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &GraphQLRequest,
    ) -> Result<T, GraphQLClientError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .headers(self.inner.headers.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %truncate(&body, 500),
                "GraphQL endpoint returned non-success status"
            );
            return Err(GraphQLClientError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        // Partial data may not fit `T`, so errors are checked before decoding.
        let envelope: graphql_client::Response<serde_json::Value> = serde_json::from_str(&body)?;
        let data = split_response(envelope)?.ok_or(GraphQLClientError::MissingData)?;
        Ok(serde_json::from_value(data)?)
    }
}

/// Separate a GraphQL envelope into data or errors.
///
/// A non-empty `errors` array wins over any partial `data`.
pub(crate) fn split_response<T>(
    response: graphql_client::Response<T>,
) -> Result<Option<T>, GraphQLQueryError> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        debug!(errors = ?errors, "GraphQL errors in response");
        return Err(GraphQLQueryError::new(
            errors.into_iter().map(GraphQLErrorDetail::from).collect(),
        ));
    }
    Ok(response.data)
}

/// Truncate a response body for logs and error messages.
pub(crate) fn truncate(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GraphQLRequest {
            operation_name: Some("Shop".to_string()),
            ..GraphQLRequest::new("{ shop { name } }", None)
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["operationName"], "Shop");
        assert!(json.get("variables").is_none());
    }

    #[test]
    fn test_split_response_errors_win_over_data() {
        let response: graphql_client::Response<serde_json::Value> = serde_json::from_str(
            r#"{"data":{"a":1},"errors":[{"message":"denied","path":["a"]}]}"#,
        )
        .unwrap();

        let err = split_response(response).unwrap_err();
        assert_eq!(err.to_string(), "denied");
        assert!(err.has_error_at_path(&["a".into()]));
    }

    #[test]
    fn test_split_response_empty_errors_is_success() {
        let response: graphql_client::Response<serde_json::Value> =
            serde_json::from_str(r#"{"data":{"a":1},"errors":[]}"#).unwrap();
        let data = split_response(response).unwrap();
        assert_eq!(data, Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let result = GraphQLClient::new(
            "http://localhost/graphql",
            [("bad header".to_string(), "v".to_string())],
        );
        assert!(matches!(result, Err(GraphQLClientError::InvalidHeader(_))));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
    }
}
