//! Storefront SDK Core - Pure types and formatting helpers.
//!
//! This crate provides the types shared by every storefront SDK component:
//! - `storefront-sdk` - HTTP/GraphQL clients, cart store, widgets
//! - `storefront-cli` - Command-line access to the SDK
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere, including from WASM front-ends.
//!
//! # Modules
//!
//! - [`types`] - Money formatting, Shopify GIDs, CDN image URLs, emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
