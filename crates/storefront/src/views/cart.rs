use std::collections::HashSet;

use tracing::{debug, warn};

use shopfront_core::CartEntry;

use super::ViewState;
use crate::api::CartRow;
use crate::error::ClientError;
use crate::state::AppState;

/// The cart page: mirrors the server-side cart into the local one.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    state: ViewState,
}

impl CartView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Replace the local cart with the user's server-side cart.
    ///
    /// Every row becomes one entry with quantity 1. Rows are installed as
    /// returned, so the same product may appear on several lines.
    ///
    /// # Errors
    ///
    /// Refuses when nobody is logged in. Any API failure reads
    /// "Failed to fetch cart items. Please try again." and leaves the local
    /// cart untouched.
    pub async fn load(&mut self, app: &mut AppState) -> Result<usize, ClientError> {
        self.state.begin();

        match fetch_rows(app).await {
            Ok(rows) => {
                warn_on_duplicates(&rows);
                let entries: Vec<CartEntry> = rows.into_iter().map(CartEntry::from).collect();
                debug!(lines = entries.len(), "Cart hydrated");
                app.cart_mut().replace_all(entries);
                self.state.succeed(None);
                Ok(app.cart().len())
            }
            Err(err) => Err(self.state.fail_generic(
                "load_cart",
                err,
                "Failed to fetch cart items. Please try again.",
            )),
        }
    }

    /// Check the cart can go to checkout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::EmptyCart` if there is nothing in the cart.
    pub fn proceed_to_checkout(&mut self, app: &AppState) -> Result<(), ClientError> {
        self.state.begin();
        if app.cart().is_empty() {
            return Err(self
                .state
                .fail("proceed_to_checkout", ClientError::EmptyCart, ""));
        }
        self.state.succeed(None);
        Ok(())
    }
}

async fn fetch_rows(app: &AppState) -> Result<Vec<CartRow>, ClientError> {
    let user = app.require_user("view your cart")?;
    Ok(app.api().cart(user.user_id).await?)
}

fn warn_on_duplicates(rows: &[CartRow]) {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.product_id) {
            warn!(
                product_id = %row.product_id,
                cart_id = %row.cart_id,
                "Server cart has more than one line for a product; lines kept separate"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{CartId, CategoryId, Price, ProductId};
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::session::Session;

    fn app() -> AppState {
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();
        AppState::with_parts(api, Session::in_memory())
    }

    #[tokio::test]
    async fn test_load_requires_login() {
        let mut app = app();
        let mut view = CartView::new();

        let err = view.load(&mut app).await.unwrap_err();

        assert!(matches!(err, ClientError::NotLoggedIn { .. }));
        assert_eq!(view.state().error(), Some("Please login to view your cart."));
    }

    #[test]
    fn test_proceed_refuses_empty_cart() {
        let app = app();
        let mut view = CartView::new();

        assert!(matches!(
            view.proceed_to_checkout(&app),
            Err(ClientError::EmptyCart)
        ));
        assert_eq!(view.state().error(), Some("Your cart is empty."));
    }

    #[test]
    fn test_proceed_with_items() {
        let mut app = app();
        app.cart_mut().add(CartEntry {
            cart_id: CartId::new(1),
            product_id: ProductId::new(1),
            name: "Mug".to_string(),
            cost: Price::from_cents(800),
            quantity: 1,
            category_id: CategoryId::new(3),
        });
        let mut view = CartView::new();

        view.proceed_to_checkout(&app).unwrap();
        assert_eq!(view.state().error(), None);
    }
}
