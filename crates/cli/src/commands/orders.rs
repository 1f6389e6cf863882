//! Order history.

use shopfront_storefront::views::OrdersView;
use shopfront_storefront::{AppState, ClientError};

use super::{say, show};

/// Print the user's orders.
///
/// # Errors
///
/// Returns the view error after printing its message.
pub async fn show_orders(app: &AppState) -> Result<(), ClientError> {
    let mut view = OrdersView::new();
    let result = view.load(app).await;
    show(view.state());
    result?;

    if let Some(notice) = view.empty_notice() {
        say(notice);
    }
    for order in view.orders() {
        let address = order.address.as_deref().unwrap_or("-");
        say(format_args!(
            "#{:<6} {:<30} {address}",
            order.order_id, order.product_name
        ));
    }
    Ok(())
}
