//! SDK configuration resolved once at the application boundary.
//!
//! Every client, store and widget receives its settings from an explicit
//! [`SdkConfig`]; nothing inside the SDK reads the environment on its own.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BRAND_API_KEY` - Platform API key sent as `x-brand-api-key`
//!
//! ## Optional
//! - `STOREFRONT_PLATFORM_URL` - Platform base URL (default: `https://adsurf.ai`)
//! - `STOREFRONT_BRAND_ID` - Brand id attached to attribution pixel events
//! - `STOREFRONT_DATA_DIR` - Directory for persisted cart/token data (default: `.storefront`)
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (enables the Shopify client)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API access token (required with the domain)
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-01)
//! - `SHOPIFY_CACHE_TTL_SECS` - Product/collection cache TTL, 0 disables (default: 300)
//! - `GA4_MEASUREMENT_ID` - Google Analytics 4 measurement ID
//! - `META_PIXEL_ID` - Meta (Facebook) pixel ID
//! - `CLARITY_PROJECT_ID` - Microsoft Clarity project ID
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Default platform base URL.
pub const DEFAULT_PLATFORM_URL: &str = "https://adsurf.ai";

/// Default Shopify Storefront API version.
pub const DEFAULT_SHOPIFY_API_VERSION: &str = "2025-01";

const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Complete SDK configuration.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Commerce platform API configuration
    pub platform: PlatformConfig,
    /// Shopify Storefront API configuration, when a Shopify store is attached
    pub shopify: Option<ShopifyConfig>,
    /// Third-party analytics configuration
    pub analytics: AnalyticsConfig,
    /// Directory for persisted client-side data
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Commerce platform API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PlatformConfig {
    /// Base URL, without a trailing slash
    pub base_url: String,
    /// Brand API key (`x-brand-api-key`)
    pub api_key: SecretString,
    /// Brand id used by the attribution pixel
    pub brand_id: Option<String>,
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("brand_id", &self.brand_id)
            .finish()
    }
}

impl PlatformConfig {
    /// Create a platform configuration for a base URL and API key.
    #[must_use]
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::from(api_key.into()),
            brand_id: None,
        }
    }
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Shopify API version (e.g., 2025-01)
    pub api_version: String,
    /// Storefront API access token
    pub storefront_access_token: SecretString,
    /// TTL for cached products and collections; zero disables caching
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("api_version", &self.api_version)
            .field("storefront_access_token", &"[REDACTED]")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl ShopifyConfig {
    /// GraphQL endpoint for this store.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store_domain, self.api_version
        )
    }
}

/// Analytics and tracking script configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    /// Google Analytics 4 measurement ID
    pub ga4_measurement_id: Option<String>,
    /// Meta (Facebook) pixel ID
    pub meta_pixel_id: Option<String>,
    /// Microsoft Clarity project ID
    pub clarity_project_id: Option<String>,
}

impl SdkConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let platform = PlatformConfig::from_env()?;
        let shopify = ShopifyConfig::from_env()?;
        let analytics = AnalyticsConfig::from_env();
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", ".storefront"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            platform,
            shopify,
            analytics,
            data_dir,
            sentry_dsn,
        })
    }
}

impl PlatformConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("STOREFRONT_PLATFORM_URL", DEFAULT_PLATFORM_URL);
        validate_base_url(&base_url, "STOREFRONT_PLATFORM_URL")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: get_validated_secret("STOREFRONT_BRAND_API_KEY")?,
            brand_id: get_optional_env("STOREFRONT_BRAND_ID"),
        })
    }
}

impl ShopifyConfig {
    /// The Shopify section is optional as a whole: absent domain means no
    /// Shopify client, but a domain without a token is an error.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(store_domain) = get_optional_env("SHOPIFY_STORE_DOMAIN") else {
            return Ok(None);
        };

        let cache_ttl = get_env_or_default(
            "SHOPIFY_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPIFY_CACHE_TTL_SECS".to_string(), e.to_string()))?;

        Ok(Some(Self {
            store_domain,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_SHOPIFY_API_VERSION),
            storefront_access_token: get_validated_secret("SHOPIFY_STOREFRONT_ACCESS_TOKEN")?,
            cache_ttl: Duration::from_secs(cache_ttl),
        }))
    }
}

impl AnalyticsConfig {
    fn from_env() -> Self {
        Self {
            ga4_measurement_id: get_optional_env("GA4_MEASUREMENT_ID"),
            meta_pixel_id: get_optional_env("META_PIXEL_ID"),
            clarity_project_id: get_optional_env("CLARITY_PROJECT_ID"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn validate_base_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(())
}

/// Validate that a secret is not a placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Expose a secret for header use.
pub(crate) fn expose(secret: &SecretString) -> &str {
    secret.expose_secret()
}
