//! Storefront SDK.
//!
//! Client-side building blocks for e-commerce storefronts:
//!
//! - [`platform`] - REST client for the commerce platform (catalog,
//!   customer accounts, bookings, application forms)
//! - [`shopify`] - Shopify Storefront API client with TTL caching
//! - [`graphql`] - Generic GraphQL client
//! - [`cart`] - Persisted client-side cart store
//! - [`loaders`] - Loading/error/data tracking with stale-response guards
//! - [`widgets`] - Headless storefront widgets
//! - [`analytics`] - Attribution pixel and GA4/Meta/Clarity helpers
//! - [`seo`] - schema.org JSON-LD builders
//!
//! Configuration is resolved once with [`SdkConfig::from_env`] and passed
//! to each client explicitly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod config;
pub mod error;
pub mod graphql;
pub mod loaders;
pub mod platform;
pub mod seo;
pub mod shopify;
pub mod storage;
pub mod types;
pub mod widgets;

pub use cart::{CartItem, CartStore, KeyValueCartPersistence};
pub use config::SdkConfig;
pub use error::{Error, Result};
pub use platform::PlatformClient;
pub use shopify::ShopifyClient;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
