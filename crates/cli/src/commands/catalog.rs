//! Categories, product listings, and add-to-cart.

use shopfront_core::{Category, ProductId};
use shopfront_storefront::api::Product;
use shopfront_storefront::views::CatalogView;
use shopfront_storefront::{AppState, ClientError};

use super::{CommandError, complain, say, show};

/// List the fixed categories.
pub fn categories() {
    for category in Category::ALL {
        say(format_args!("{:>3}  {}", category.id(), category.title()));
    }
}

/// List the products in a category.
///
/// # Errors
///
/// Returns the view error after printing its message.
pub async fn products(app: &AppState, category: Category) -> Result<(), ClientError> {
    let mut view = CatalogView::new(category);
    let result = view.load(app).await;
    show(view.state());
    result?;

    say(format_args!("{category}"));
    if let Some(notice) = view.empty_notice() {
        say(notice);
    }
    for product in view.products() {
        say(product_line(product));
    }
    Ok(())
}

/// Add one unit of a listed product to the cart.
///
/// The category listing is fetched first so the cart line carries the
/// product's current name and price.
///
/// # Errors
///
/// Returns the view error after printing its message, or
/// `CommandError::UnknownProduct` if the product is not listed in `category`.
pub async fn add(
    app: &mut AppState,
    category: Category,
    product_id: ProductId,
) -> Result<(), CommandError> {
    let mut view = CatalogView::new(category);
    let loaded = view.load(app).await;
    show(view.state());
    loaded?;

    let Some(product) = view.products().iter().find(|p| p.id == product_id).cloned() else {
        let err = CommandError::UnknownProduct {
            product_id,
            category,
        };
        complain(&err);
        return Err(err);
    };

    let result = view.add_to_cart(app, &product).await;
    show(view.state());
    result?;
    Ok(())
}

fn product_line(product: &Product) -> String {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "Out of stock".to_string()
    };
    format!(
        "{:>5}  {:<30} {:>10}  {stock}",
        product.id,
        product.name,
        product.amount.to_string()
    )
}
