//! Shopify global ID (`gid://shopify/{Type}/{id}`) helpers.

use core::fmt;

const GID_PREFIX: &str = "gid://shopify/";

/// A parsed Shopify global ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gid {
    /// Resource type, e.g. `Product` or `ProductVariant`.
    pub kind: String,
    /// Resource id. Numeric for most resources; carts use opaque tokens.
    pub id: String,
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GID_PREFIX}{}/{}", self.kind, self.id)
    }
}

/// Parse a Shopify GID into its type and id.
///
/// Returns `None` when the prefix is missing, the type is not alphanumeric,
/// or the id is empty or contains further path segments. A query string on
/// the id (as on cart GIDs) is stripped.
///
/// ```
/// use storefront_sdk_core::parse_gid;
///
/// let gid = parse_gid("gid://shopify/Product/123").unwrap();
/// assert_eq!(gid.kind, "Product");
/// assert_eq!(gid.id, "123");
/// assert!(parse_gid("Product/123").is_none());
/// ```
#[must_use]
pub fn parse_gid(gid: &str) -> Option<Gid> {
    let rest = gid.strip_prefix(GID_PREFIX)?;
    let (kind, id) = rest.split_once('/')?;
    let id = id.split_once('?').map_or(id, |(id, _)| id);

    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    if id.is_empty() || id.contains('/') {
        return None;
    }

    Some(Gid {
        kind: kind.to_string(),
        id: id.to_string(),
    })
}

/// Extract the numeric id from a GID, e.g. `123` from `gid://shopify/Product/123`.
///
/// Returns `None` for malformed GIDs and for non-numeric ids.
#[must_use]
pub fn extract_numeric_id(gid: &str) -> Option<u64> {
    parse_gid(gid)?.id.parse().ok()
}

/// Build a GID from a resource type and id.
#[must_use]
pub fn build_gid(kind: &str, id: impl fmt::Display) -> String {
    format!("{GID_PREFIX}{kind}/{id}")
}
