//! Client-side cart state.
//!
//! [`CartStore`] is the single in-memory source of truth for "what is in the
//! cart right now". It mirrors the server-side cart but is mutated locally
//! and synchronously, so every view that reads it sees a change immediately.
//!
//! # Example
//!
//! ```rust
//! use shopfront_core::{CartEntry, CartId, CartStore, CategoryId, Price, ProductId};
//!
//! let mut cart = CartStore::new();
//! let entry = CartEntry {
//!     cart_id: CartId::new(1),
//!     product_id: ProductId::new(10),
//!     name: "Headphones".to_string(),
//!     cost: Price::from_cents(1000),
//!     quantity: 1,
//!     category_id: CategoryId::new(1),
//! };
//!
//! cart.add(entry.clone());
//! cart.add(CartEntry { cart_id: CartId::new(2), quantity: 2, ..entry });
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.item_count(), 3);
//! assert_eq!(cart.total_cost(), Price::from_cents(3000));
//! ```

mod entry;
mod store;

pub use entry::CartEntry;
pub use store::{CartStore, SubscriptionId};
