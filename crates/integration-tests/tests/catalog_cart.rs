//! Browsing, add-to-cart, and cart hydration against the mock shop API.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use shopfront_core::{Category, CategoryId, Price, ProductId};
use shopfront_integration_tests::{MockShop, product_json};
use shopfront_storefront::ClientError;
use shopfront_storefront::views::{CartView, CatalogView, Navbar};

fn stock_electronics(shop: &MockShop) {
    shop.set_products(
        1,
        json!([
            product_json(10, "Laptop", 999.99, 5),
            product_json(11, "Headphones", 49.5, 0),
        ]),
    );
}

#[tokio::test]
async fn test_load_lists_category_products() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let app = shop.app();
    let mut view = CatalogView::new(Category::Electronics);

    assert_eq!(view.load(&app).await.unwrap(), 2);

    let laptop = &view.products()[0];
    assert_eq!(laptop.name, "Laptop");
    assert_eq!(laptop.amount, Price::from_cents(99_999));
    assert!(laptop.in_stock());
    assert!(!view.products()[1].in_stock());
    assert_eq!(view.empty_notice(), None);
    assert_eq!(shop.requests(), vec!["GET /catwiseproducts/1".to_string()]);
}

#[tokio::test]
async fn test_empty_category_and_message_payload() {
    let shop = MockShop::start().await.unwrap();
    shop.set_products(2, json!("No products in this category"));
    let app = shop.app();

    let mut food = CatalogView::new(Category::Food);
    assert_eq!(food.load(&app).await.unwrap(), 0);
    assert_eq!(
        food.empty_notice().as_deref(),
        Some("No food products available.")
    );

    let mut clothes = CatalogView::new(Category::Clothes);
    assert_eq!(clothes.load(&app).await.unwrap(), 0);
    assert_eq!(clothes.state().error(), None);
}

#[tokio::test]
async fn test_malformed_listing_keeps_previous_products() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let app = shop.app();
    let mut view = CatalogView::new(Category::Electronics);
    view.load(&app).await.unwrap();

    shop.set_products(1, json!([{ "id": "not-a-number" }]));
    view.load(&app).await.unwrap_err();

    assert_eq!(
        view.state().error(),
        Some("Failed to fetch electronics products. Please try again.")
    );
    assert_eq!(view.products().len(), 2);
}

#[tokio::test]
async fn test_add_to_cart_posts_then_merges_locally() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let mut app = shop.logged_in_app("ada").await;
    let navbar = Navbar::attach(&mut app);

    let mut view = CatalogView::new(Category::Electronics);
    view.load(&app).await.unwrap();
    let laptop = view.products()[0].clone();

    let first = view.add_to_cart(&mut app, &laptop).await.unwrap();
    assert_eq!(view.state().message(), Some("Laptop added to cart!"));
    view.add_to_cart(&mut app, &laptop).await.unwrap();

    assert_eq!(app.cart().len(), 1);
    let entry = &app.cart().entries()[0];
    assert_eq!(entry.cart_id, first);
    assert_eq!(entry.product_id, ProductId::new(10));
    assert_eq!(entry.quantity, 2);
    assert_eq!(entry.category_id, CategoryId::new(1));
    assert_eq!(navbar.item_count(), 2);

    let rows = shop.cart_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        json!({
            "cartId": 1,
            "userId": 1,
            "userName": "mock",
            "productId": 10,
            "productName": "Laptop",
            "categoryId": 1,
            "categoryName": "mock",
            "amount": 999.99
        })
    );
}

#[tokio::test]
async fn test_rejected_add_shows_api_message() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    shop.reject_add_to_cart("Product is no longer available");
    let mut app = shop.logged_in_app("ada").await;

    let mut view = CatalogView::new(Category::Electronics);
    view.load(&app).await.unwrap();
    let laptop = view.products()[0].clone();

    let err = view.add_to_cart(&mut app, &laptop).await.unwrap_err();

    assert!(matches!(err, ClientError::Api(_)));
    assert_eq!(view.state().error(), Some("Product is no longer available"));
    assert!(app.cart().is_empty());
}

#[tokio::test]
async fn test_add_out_of_stock_makes_no_request() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let mut app = shop.logged_in_app("ada").await;

    let mut view = CatalogView::new(Category::Electronics);
    view.load(&app).await.unwrap();
    let headphones = view.products()[1].clone();

    let err = view.add_to_cart(&mut app, &headphones).await.unwrap_err();

    assert!(matches!(err, ClientError::OutOfStock(_)));
    assert!(!shop.requests().contains(&"POST /cart".to_string()));
}

#[tokio::test]
async fn test_cart_hydration_is_one_entry_per_row() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let mut app = shop.logged_in_app("ada").await;

    let mut catalog = CatalogView::new(Category::Electronics);
    catalog.load(&app).await.unwrap();
    let laptop = catalog.products()[0].clone();
    catalog.add_to_cart(&mut app, &laptop).await.unwrap();
    catalog.add_to_cart(&mut app, &laptop).await.unwrap();

    let mut view = CartView::new();
    assert_eq!(view.load(&mut app).await.unwrap(), 2);

    let entries = app.cart().entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.quantity == 1));
    assert!(entries.iter().all(|e| e.product_id == ProductId::new(10)));
    assert_eq!(app.cart().item_count(), 2);
    assert_eq!(app.cart().total_cost(), Price::from_cents(199_998));
}

#[tokio::test]
async fn test_cart_message_payload_empties_cart() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let mut app = shop.logged_in_app("ada").await;

    let mut catalog = CatalogView::new(Category::Electronics);
    catalog.load(&app).await.unwrap();
    let laptop = catalog.products()[0].clone();
    catalog.add_to_cart(&mut app, &laptop).await.unwrap();
    assert_eq!(app.cart().len(), 1);

    shop.set_cart_response(json!("Cart is empty"));
    let mut view = CartView::new();
    assert_eq!(view.load(&mut app).await.unwrap(), 0);

    assert!(app.cart().is_empty());
    assert_eq!(view.state().error(), None);
    assert!(matches!(
        view.proceed_to_checkout(&app),
        Err(ClientError::EmptyCart)
    ));
}

#[tokio::test]
async fn test_cart_requires_login() {
    let shop = MockShop::start().await.unwrap();
    let mut app = shop.app();
    let mut view = CartView::new();

    view.load(&mut app).await.unwrap_err();

    assert_eq!(view.state().error(), Some("Please login to view your cart."));
    assert!(shop.requests().is_empty());
}

#[tokio::test]
async fn test_failed_cart_load_keeps_local_cart() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let mut app = shop.logged_in_app("ada").await;

    let mut catalog = CatalogView::new(Category::Electronics);
    catalog.load(&app).await.unwrap();
    let laptop = catalog.products()[0].clone();
    catalog.add_to_cart(&mut app, &laptop).await.unwrap();
    catalog.add_to_cart(&mut app, &laptop).await.unwrap();
    assert_eq!(app.cart().item_count(), 2);

    shop.set_cart_response(json!({ "broken": true }));
    let mut view = CartView::new();
    let err = view.load(&mut app).await.unwrap_err();

    assert!(matches!(err, ClientError::Api(_)));
    assert_eq!(
        view.state().error(),
        Some("Failed to fetch cart items. Please try again.")
    );
    assert_eq!(app.cart().len(), 1);
    assert_eq!(app.cart().entries()[0].quantity, 2);
}

#[tokio::test]
async fn test_cart_server_error_keeps_local_cart() {
    let shop = MockShop::start().await.unwrap();
    stock_electronics(&shop);
    let mut app = shop.logged_in_app("ada").await;

    let mut catalog = CatalogView::new(Category::Electronics);
    catalog.load(&app).await.unwrap();
    let laptop = catalog.products()[0].clone();
    catalog.add_to_cart(&mut app, &laptop).await.unwrap();

    shop.fail_route("GET /cart", 500);
    let mut view = CartView::new();
    view.load(&mut app).await.unwrap_err();

    assert_eq!(
        view.state().error(),
        Some("Failed to fetch cart items. Please try again.")
    );
    assert_eq!(app.cart().len(), 1);
    assert_eq!(app.cart().entries()[0].product_id, ProductId::new(10));
    // The add still went through on its own route.
    assert_eq!(shop.cart_rows().len(), 1);
}

#[tokio::test]
async fn test_adds_of_different_products_get_distinct_lines() {
    let shop = MockShop::start().await.unwrap();
    shop.set_products(
        1,
        json!([
            product_json(10, "Laptop", 999.99, 5),
            product_json(12, "Mouse", 19.0, 5),
        ]),
    );
    let mut app = shop.logged_in_app("ada").await;

    let mut view = CatalogView::new(Category::Electronics);
    view.load(&app).await.unwrap();
    let laptop = view.products()[0].clone();
    let mouse = view.products()[1].clone();

    let first = view.add_to_cart(&mut app, &laptop).await.unwrap();
    let second = view.add_to_cart(&mut app, &mouse).await.unwrap();
    assert_ne!(first, second);

    app.cart_mut().remove(first);
    assert_eq!(app.cart().len(), 1);
    assert_eq!(app.cart().entries()[0].product_id, ProductId::new(12));
}
