use tracing::debug;

use super::ViewState;
use crate::api::Order;
use crate::error::ClientError;
use crate::state::AppState;

/// Order history for the logged-in user.
#[derive(Debug, Clone, Default)]
pub struct OrdersView {
    orders: Vec<Order>,
    loaded: bool,
    state: ViewState,
}

impl OrdersView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders from the last successful load.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// "No orders found." once a load came back empty.
    #[must_use]
    pub fn empty_notice(&self) -> Option<&'static str> {
        (self.loaded && self.orders.is_empty()).then_some("No orders found.")
    }

    /// Fetch the user's orders.
    ///
    /// # Errors
    ///
    /// Refuses when nobody is logged in. When the API answers with a bare
    /// message instead of a list, that message becomes the error text;
    /// other failures read "Failed to fetch orders. Please try again.".
    pub async fn load(&mut self, app: &AppState) -> Result<usize, ClientError> {
        self.state.begin();

        match fetch_orders(app).await {
            Ok(orders) => {
                debug!(count = orders.len(), "Orders loaded");
                self.orders = orders;
                self.loaded = true;
                self.state.succeed(None);
                Ok(self.orders.len())
            }
            Err(err) => Err(self.state.fail_generic(
                "load_orders",
                err,
                "Failed to fetch orders. Please try again.",
            )),
        }
    }
}

async fn fetch_orders(app: &AppState) -> Result<Vec<Order>, ClientError> {
    let user = app.require_user("view your orders")?;
    Ok(app.api().orders(user.user_id).await?)
}
