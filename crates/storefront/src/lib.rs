//! Shopfront Storefront library.
//!
//! Everything a front end needs to talk to the shop API and keep the
//! client-side cart consistent:
//!
//! - [`config`] - Environment-driven configuration
//! - [`api`] - Typed HTTP client for the external shop API
//! - [`session`] - Session key-value storage (`userId`, `username`)
//! - [`state`] - The owned application state handed to every view
//! - [`views`] - Page controllers: catalog, cart, checkout, orders, auth, navbar
//! - [`error`] - View-level errors and Sentry helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_core::Category;
//! use shopfront_storefront::{AppState, StorefrontConfig, views::{CartView, CatalogView}};
//!
//! let config = StorefrontConfig::from_env()?;
//! let mut app = AppState::new(&config)?;
//!
//! let mut catalog = CatalogView::new(Category::Electronics);
//! catalog.load(&app).await?;
//! if let Some(product) = catalog.products().first().cloned() {
//!     catalog.add_to_cart(&mut app, &product).await?;
//! }
//!
//! let mut cart = CartView::default();
//! cart.load(&mut app).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod views;

pub use config::{ConfigError, StorefrontConfig};
pub use error::ClientError;
pub use state::AppState;
