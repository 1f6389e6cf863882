//! Shopfront Core - Shared types and the client-side cart container.
//!
//! This crate provides the pieces used by every Shopfront component:
//! - `storefront` - API client, session storage, and page controllers
//! - `cli` - Terminal front end (`shop`)
//!
//! # Architecture
//!
//! The core crate contains only types and in-memory state - no I/O, no HTTP
//! clients. Everything here is synchronous and can be exercised without a
//! runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and categories
//! - [`cart`] - The cart state container and its entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{CartEntry, CartStore, SubscriptionId};
pub use types::*;
