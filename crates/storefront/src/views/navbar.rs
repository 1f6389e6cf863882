use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use shopfront_core::{CartEntry, SubscriptionId};

use crate::state::AppState;

/// Greeting and running cart count.
///
/// The count is kept current by a cart subscription, so it follows every
/// mutation without the navbar being asked. Call [`detach`](Self::detach)
/// when the navbar goes away.
#[derive(Debug)]
pub struct Navbar {
    item_count: Arc<AtomicU64>,
    subscription: SubscriptionId,
    username: Option<String>,
}

impl Navbar {
    /// Subscribe to the cart and read the current user.
    pub fn attach(app: &mut AppState) -> Self {
        let item_count = Arc::new(AtomicU64::new(app.cart().item_count()));
        let sink = Arc::clone(&item_count);
        let subscription = app.cart_mut().subscribe(move |entries: &[CartEntry]| {
            let total = entries.iter().map(|e| u64::from(e.quantity)).sum();
            sink.store(total, Ordering::Relaxed);
        });

        let mut navbar = Self {
            item_count,
            subscription,
            username: None,
        };
        navbar.refresh_user(app);
        navbar
    }

    /// Drop the cart subscription.
    pub fn detach(self, app: &mut AppState) {
        app.cart_mut().unsubscribe(self.subscription);
    }

    /// Re-read the session, e.g. after login or logout.
    ///
    /// An unreadable session shows as logged out.
    pub fn refresh_user(&mut self, app: &AppState) {
        self.username = match app.session().current_user() {
            Ok(user) => user.map(|u| u.username),
            Err(err) => {
                warn!(error = %err, "Could not read session for navbar");
                None
            }
        };
    }

    /// Sum of quantities across the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.item_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// One-line rendering, e.g. `Welcome, ada | My Orders | Cart (3) | Logout`.
    #[must_use]
    pub fn render(&self) -> String {
        let count = self.item_count();
        match &self.username {
            Some(name) => format!("Welcome, {name} | My Orders | Cart ({count}) | Logout"),
            None => format!("Login | Sign Up | Cart ({count})"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{CartId, CategoryId, Price, ProductId, UserId};
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::session::{CurrentUser, Session};

    fn app() -> AppState {
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();
        AppState::with_parts(api, Session::in_memory())
    }

    fn entry(cart_id: i64, product_id: i32, quantity: u32) -> CartEntry {
        CartEntry {
            cart_id: CartId::new(cart_id),
            product_id: ProductId::new(product_id),
            name: format!("Product {product_id}"),
            cost: Price::from_cents(100),
            quantity,
            category_id: CategoryId::new(1),
        }
    }

    #[test]
    fn test_count_follows_cart() {
        let mut app = app();
        let navbar = Navbar::attach(&mut app);
        assert_eq!(navbar.render(), "Login | Sign Up | Cart (0)");

        app.cart_mut().add(entry(1, 1, 2));
        app.cart_mut().add(entry(2, 2, 1));
        assert_eq!(navbar.item_count(), 3);

        app.cart_mut().remove(CartId::new(1));
        assert_eq!(navbar.item_count(), 1);

        app.cart_mut().clear();
        assert_eq!(navbar.item_count(), 0);
    }

    #[test]
    fn test_greets_logged_in_user() {
        let mut app = app();
        app.cart_mut().add(entry(1, 1, 4));
        app.session_mut()
            .store_user(&CurrentUser {
                user_id: UserId::new(1),
                username: "ada".to_string(),
            })
            .unwrap();

        let navbar = Navbar::attach(&mut app);

        assert_eq!(navbar.username(), Some("ada"));
        assert_eq!(
            navbar.render(),
            "Welcome, ada | My Orders | Cart (4) | Logout"
        );
    }

    #[test]
    fn test_detach_stops_updates() {
        let mut app = app();
        let navbar = Navbar::attach(&mut app);
        let count = Arc::clone(&navbar.item_count);
        navbar.detach(&mut app);

        app.cart_mut().add(entry(1, 1, 5));
        assert_eq!(count.load(Ordering::Relaxed), 0);
    }
}
