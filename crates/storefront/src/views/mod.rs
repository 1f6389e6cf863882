//! Page-level controllers.
//!
//! A view owns only what it shows: a loading flag, the last error, the last
//! success message, and whatever it fetched. Shared state (API client,
//! session, cart) is borrowed from [`AppState`](crate::AppState) for the
//! duration of each call.
//!
//! Every operation returns `Result<_, ClientError>` and also records the
//! outcome in the view's [`ViewState`]. A failure never touches what the view
//! previously loaded; it only replaces the error text.
//!
//! - [`CatalogView`] - products in one category, add to cart
//! - [`CartView`] - hydrate the cart from the API, proceed to checkout
//! - [`CheckoutView`] - place one order per cart line
//! - [`OrdersView`] - order history
//! - [`AuthView`] - login, signup, logout
//! - [`Navbar`] - greeting and running cart count

mod auth;
mod cart;
mod catalog;
mod checkout;
mod navbar;
mod orders;

pub use auth::AuthView;
pub use cart::CartView;
pub use catalog::CatalogView;
pub use checkout::{CheckoutView, OrderReceipt};
pub use navbar::Navbar;
pub use orders::OrdersView;

use crate::error::{ClientError, report};

/// Loading / error / message state common to every view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    loading: bool,
    error: Option<String>,
    message: Option<String>,
}

impl ViewState {
    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last failure, as shown to the user.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last success message, as shown to the user.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.message = None;
    }

    fn succeed(&mut self, message: Option<String>) {
        self.loading = false;
        self.message = message;
    }

    /// Record a failure, preferring the API's own message over `fallback`.
    fn fail(&mut self, context: &str, err: ClientError, fallback: &str) -> ClientError {
        let text = err.user_message(fallback);
        self.record(context, err, text)
    }

    /// Record a failure, showing `fallback` for any API error body.
    fn fail_generic(&mut self, context: &str, err: ClientError, fallback: &str) -> ClientError {
        let text = err.generic_message(fallback);
        self.record(context, err, text)
    }

    fn record(&mut self, context: &str, err: ClientError, text: String) -> ClientError {
        report(context, &err);
        self.loading = false;
        self.error = Some(text);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clears_previous_outcome() {
        let mut state = ViewState::default();
        state.succeed(Some("done".to_string()));
        state.begin();

        assert!(state.is_loading());
        assert_eq!(state.message(), None);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_fail_records_user_text() {
        let mut state = ViewState::default();
        state.begin();
        let err = state.fail("test", ClientError::EmptyCart, "fallback");

        assert!(matches!(err, ClientError::EmptyCart));
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("Your cart is empty."));
    }
}
