//! Core types for the storefront SDK.
//!
//! This module provides type-safe wrappers and pure helpers for common
//! storefront concepts.

pub mod email;
pub mod gid;
pub mod image;
pub mod money;

pub use email::{Email, EmailError};
pub use gid::{Gid, build_gid, extract_numeric_id, parse_gid};
pub use image::{ImageCrop, image_srcset, sized_image_url};
pub use money::{CurrencyCode, Money, calculate_discount, format_money, format_price_range};
