use tracing::info;

use shopfront_core::{Price, ProductId};

use super::ViewState;
use crate::api::OrderRequest;
use crate::error::{ClientError, add_breadcrumb};
use crate::state::AppState;

/// What a completed checkout placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    /// One order per cart line, in cart order.
    pub products: Vec<ProductId>,
    /// Cart total at the time of checkout.
    pub total: Price,
}

/// The checkout page.
///
/// The API takes one product per order, so checkout posts one order per cart
/// line, in order, and stops at the first failure. Orders already accepted
/// stay placed; the cart is only cleared once every line went through.
#[derive(Debug, Clone, Default)]
pub struct CheckoutView {
    state: ViewState,
    placed: Vec<ProductId>,
}

impl CheckoutView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Products the last attempt placed before it finished or failed.
    #[must_use]
    pub fn placed(&self) -> &[ProductId] {
        &self.placed
    }

    /// Place the cart.
    ///
    /// # Errors
    ///
    /// Refuses when nobody is logged in or the cart is empty. If any order
    /// fails, returns that error with the text
    /// "Failed to place order. Please try again." and leaves the cart as it
    /// was.
    pub async fn place_order(
        &mut self,
        app: &mut AppState,
        address: Option<&str>,
    ) -> Result<OrderReceipt, ClientError> {
        self.state.begin();
        self.placed.clear();

        match self.place_lines(app, address).await {
            Ok(()) => {
                let receipt = OrderReceipt {
                    products: self.placed.clone(),
                    total: app.cart().total_cost(),
                };
                app.cart_mut().clear();
                add_breadcrumb("checkout", "Order placed", None);
                self.state
                    .succeed(Some("Order placed successfully!".to_string()));
                Ok(receipt)
            }
            Err(err) => Err(self.state.fail_generic(
                "place_order",
                err,
                "Failed to place order. Please try again.",
            )),
        }
    }

    async fn place_lines(
        &mut self,
        app: &AppState,
        address: Option<&str>,
    ) -> Result<(), ClientError> {
        let user = app.require_user("place an order")?;
        if app.cart().is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let lines = app.cart().len();
        for entry in app.cart().entries() {
            let request = OrderRequest {
                user_id: user.user_id,
                product_id: entry.product_id,
                address: address.map(str::to_owned),
            };
            if let Err(err) = app.api().place_order(&request).await {
                info!(
                    user_id = %user.user_id,
                    product_id = %entry.product_id,
                    placed = self.placed.len(),
                    lines,
                    "Checkout stopped partway; earlier orders remain placed"
                );
                return Err(err.into());
            }
            self.placed.push(entry.product_id);
        }

        info!(user_id = %user.user_id, orders = lines, "Checkout complete");
        Ok(())
    }
}
