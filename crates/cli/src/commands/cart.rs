//! Cart listing and checkout.

use shopfront_core::CartStore;
use shopfront_storefront::views::{CartView, CheckoutView};
use shopfront_storefront::{AppState, ClientError};

use super::{say, show};

/// Fetch the server-side cart into the local one and print it.
///
/// # Errors
///
/// Returns the view error after printing its message.
pub async fn show_cart(app: &mut AppState) -> Result<(), ClientError> {
    let mut view = CartView::new();
    let result = view.load(app).await;
    show(view.state());
    result?;

    print_lines(app.cart());
    Ok(())
}

/// Print the local cart, one line per entry, with the total.
pub fn print_lines(cart: &CartStore) {
    if cart.is_empty() {
        say("Your cart is empty.");
        return;
    }
    for entry in cart.entries() {
        say(format_args!(
            "{:>15}  {:<30} {:>10} x {:<3} {:>10}",
            entry.cart_id,
            entry.name,
            entry.cost.to_string(),
            entry.quantity,
            entry.line_total().to_string()
        ));
    }
    say(format_args!(
        "{} item(s), total {}",
        cart.item_count(),
        cart.total_cost()
    ));
}

/// Place the cart.
///
/// With `hydrate`, the local cart is first replaced by the server-side one;
/// a one-shot run has no other way to know what is in it.
///
/// # Errors
///
/// Returns the view error after printing its message.
pub async fn checkout(
    app: &mut AppState,
    address: Option<&str>,
    hydrate: bool,
) -> Result<(), ClientError> {
    let mut cart = CartView::new();
    if hydrate {
        let loaded = cart.load(app).await;
        show(cart.state());
        loaded?;
    }
    let proceed = cart.proceed_to_checkout(app);
    show(cart.state());
    proceed?;

    let mut view = CheckoutView::new();
    let result = view.place_order(app, address).await;
    show(view.state());

    match result {
        Ok(receipt) => {
            say(format_args!(
                "{} order(s) placed, total {}",
                receipt.products.len(),
                receipt.total
            ));
            Ok(())
        }
        Err(err) => {
            if !view.placed().is_empty() {
                say(format_args!(
                    "{} order(s) were placed before the failure.",
                    view.placed().len()
                ));
            }
            Err(err)
        }
    }
}
