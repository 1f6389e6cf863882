use serde::{Deserialize, Serialize};

use crate::types::{CartId, CategoryId, Price, ProductId};

/// One product line in the local cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Locally unique line identifier. Not stable across reloads.
    pub cart_id: CartId,
    /// The referenced product. Unique among entries added through
    /// [`CartStore::add`](super::CartStore::add).
    pub product_id: ProductId,
    /// Product name at the time the line was added or fetched.
    pub name: String,
    /// Unit price.
    pub cost: Price,
    /// Number of units. Callers keep this positive.
    pub quantity: u32,
    /// Category of the product, carried for display and for the cart API.
    pub category_id: CategoryId,
}

impl CartEntry {
    /// `cost × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.cost.times(self.quantity)
    }
}
