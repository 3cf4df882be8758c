//! Structured GraphQL error details.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One segment of a GraphQL error path: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(i64),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for PathSegment {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location in a GraphQL document where an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A single entry of a GraphQL response's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLErrorDetail {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    #[serde(default)]
    pub locations: Vec<ErrorLocation>,
    /// Path to the failing field in the response.
    #[serde(default)]
    pub path: Vec<PathSegment>,
    /// Server-specific extensions (e.g. `code`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphQLErrorDetail {
    /// A detail carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }
    }
}

impl From<graphql_client::Error> for GraphQLErrorDetail {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(|l| ErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect(),
            path: error
                .path
                .unwrap_or_default()
                .into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(key) => PathSegment::Key(key),
                    graphql_client::PathFragment::Index(i) => PathSegment::Index(i64::from(i)),
                })
                .collect(),
            extensions: error
                .extensions
                .map(|ext| ext.into_iter().collect::<serde_json::Map<_, _>>()),
        }
    }
}

/// A GraphQL response that carried a non-empty `errors` array.
///
/// Displays as the first error's message; [`messages`](Self::messages)
/// joins all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLQueryError {
    errors: Vec<GraphQLErrorDetail>,
}

impl GraphQLQueryError {
    /// Wrap a list of error details.
    #[must_use]
    pub const fn new(errors: Vec<GraphQLErrorDetail>) -> Self {
        Self { errors }
    }

    /// Every error detail, in response order.
    #[must_use]
    pub fn errors(&self) -> &[GraphQLErrorDetail] {
        &self.errors
    }

    /// The first error's message, if any.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// All messages joined with `"; "`.
    #[must_use]
    pub fn messages(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Whether some error's path is exactly `path`: same length and equal
    /// segment by segment. Prefixes and suffixes do not match.
    #[must_use]
    pub fn has_error_at_path(&self, path: &[PathSegment]) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

impl fmt::Display for GraphQLQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first_message().unwrap_or("GraphQL request failed"))
    }
}

impl std::error::Error for GraphQLQueryError {}
