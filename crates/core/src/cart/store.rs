use core::fmt;

use tracing::trace;

use super::CartEntry;
use crate::types::{CartId, Price};

type Listener = Box<dyn FnMut(&[CartEntry]) + Send + Sync>;

/// Handle returned by [`CartStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The cart state container.
///
/// Entries keep insertion order. Every mutating call notifies all subscribers
/// synchronously with the new contents before returning, whether or not the
/// call changed anything.
///
/// The store never validates its input and never fails: callers are trusted
/// to pass positive quantities and, for [`replace_all`](Self::replace_all),
/// to deduplicate if they need the one-line-per-product invariant.
#[derive(Default)]
pub struct CartStore {
    entries: Vec<CartEntry>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a line by its cart ID.
    #[must_use]
    pub fn get(&self, cart_id: CartId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.cart_id == cart_id)
    }

    /// Sum of quantities across all lines (the navbar badge).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of `cost × quantity` across all lines.
    #[must_use]
    pub fn total_cost(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a line, merging by product.
    ///
    /// If a line for the same product exists, its quantity grows by the
    /// incoming quantity and every other field (including `cart_id`) is kept.
    /// Otherwise the entry is appended.
    pub fn add(&mut self, entry: CartEntry) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.product_id == entry.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(entry.quantity);
            trace!(
                product_id = %entry.product_id,
                quantity = existing.quantity,
                "Merged cart line"
            );
        } else {
            trace!(product_id = %entry.product_id, cart_id = %entry.cart_id, "Appended cart line");
            self.entries.push(entry);
        }
        self.notify();
    }

    /// Remove the line with `cart_id`. Absent IDs are ignored.
    pub fn remove(&mut self, cart_id: CartId) {
        self.entries.retain(|e| e.cart_id != cart_id);
        self.notify();
    }

    /// Overwrite the quantity of the line with `cart_id`, verbatim.
    /// Absent IDs are ignored.
    pub fn set_quantity(&mut self, cart_id: CartId, quantity: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.cart_id == cart_id) {
            entry.quantity = quantity;
        }
        self.notify();
    }

    /// Discard everything and install `entries` as given.
    pub fn replace_all(&mut self, entries: Vec<CartEntry>) {
        trace!(count = entries.len(), "Replacing cart contents");
        self.entries = entries;
        self.notify();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.notify();
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback that runs after every mutation with the new
    /// contents.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[CartEntry]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        let entries = &self.entries;
        for (_, listener) in &mut self.listeners {
            listener(entries);
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("entries", &self.entries)
            .field("subscribers", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
