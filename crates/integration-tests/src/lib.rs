//! Integration tests for Shopfront.
//!
//! The tests drive the real `reqwest` client and storefront views against
//! [`MockShop`], an in-process `axum` stand-in for the external shop API
//! bound to an ephemeral port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Mock behaviour
//!
//! - `POST /login`, `POST /register` - checked against registered users
//! - `GET /catwiseproducts/{id}` - whatever JSON the test installed
//! - `GET /cart/{userId}` - rows added via `POST /cart`; a bare string when
//!   empty
//! - `POST /order` - recorded; can be told to fail on the Nth call
//! - `GET /orders/{userId}` - recorded orders; a bare string when empty
//!
//! Any route can be made to fail with a given status and an empty `{}` body.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use shopfront_storefront::AppState;
use shopfront_storefront::api::ApiClient;
use shopfront_storefront::session::Session;
use shopfront_storefront::views::AuthView;

/// Password given to every user created by [`MockShop::logged_in_app`].
pub const TEST_PASSWORD: &str = "hunter2";

/// A product as the listing endpoint returns it.
#[must_use]
pub fn product_json(id: i32, name: &str, amount: f64, stock: i32) -> Value {
    json!({ "id": id, "name": name, "amount": amount, "stock": stock })
}

type Reply = (StatusCode, Json<Value>);

#[derive(Debug, Clone)]
struct MockUser {
    user_id: i32,
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Default)]
struct ShopState {
    users: Vec<MockUser>,
    products: BTreeMap<i32, Value>,
    cart_rows: Vec<Value>,
    next_cart_id: i64,
    cart_override: Option<Value>,
    reject_add_to_cart: Option<String>,
    orders: Vec<Value>,
    order_calls: usize,
    fail_order_at: Option<usize>,
    orders_override: Option<Value>,
    failing_routes: BTreeMap<String, StatusCode>,
    requests: Vec<String>,
}

impl ShopState {
    /// Record `request` and return the injected failure for its route, if any.
    fn enter(&mut self, request: String) -> Option<Reply> {
        let failure = self
            .failing_routes
            .iter()
            .find(|(route, _)| {
                request == **route
                    || request
                        .strip_prefix(route.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .map(|(_, status)| *status);
        self.requests.push(request);
        failure.map(|status| (status, Json(json!({}))))
    }
}

type Shared = Arc<Mutex<ShopState>>;

fn lock(shop: &Shared) -> MutexGuard<'_, ShopState> {
    shop.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running mock of the shop API. Stops when dropped.
pub struct MockShop {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockShop {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Shared::default();

        let app = Router::new()
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/catwiseproducts/{category_id}", get(products))
            .route("/cart", post(add_to_cart))
            .route("/cart/{user_id}", get(cart))
            .route("/order", post(place_order))
            .route("/orders/{user_id}", get(orders))
            .with_state(Arc::clone(&state));

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL of the mock, with a trailing slash.
    ///
    /// # Panics
    ///
    /// Never in practice: the address is always a valid URL host.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).unwrap()
    }

    /// Fresh application state pointed at this mock, with an in-memory
    /// session and an empty cart.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn app(&self) -> AppState {
        AppState::with_parts(ApiClient::new(self.url()).unwrap(), Session::in_memory())
    }

    /// Register `name` with the mock and log in through the auth view.
    ///
    /// # Panics
    ///
    /// Panics if the login fails.
    #[allow(clippy::unwrap_used)]
    pub async fn logged_in_app(&self, name: &str) -> AppState {
        let email = format!("{name}@example.com");
        self.add_user(name, &email, TEST_PASSWORD);

        let mut app = self.app();
        AuthView::new()
            .login(&mut app, &email, &SecretString::from(TEST_PASSWORD.to_string()))
            .await
            .unwrap();
        app
    }

    /// Register an account the mock will accept; returns its user ID.
    pub fn add_user(&self, name: &str, email: &str, password: &str) -> i32 {
        let mut shop = lock(&self.state);
        let user_id = i32::try_from(shop.users.len()).unwrap_or(i32::MAX - 1) + 1;
        shop.users.push(MockUser {
            user_id,
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        });
        user_id
    }

    /// Install the body returned for `GET /catwiseproducts/{category_id}`.
    pub fn set_products(&self, category_id: i32, body: Value) {
        lock(&self.state).products.insert(category_id, body);
    }

    /// Answer `GET /cart/{userId}` with `body` regardless of stored rows.
    pub fn set_cart_response(&self, body: Value) {
        lock(&self.state).cart_override = Some(body);
    }

    /// Reject every `POST /cart` with a 400 carrying `message`.
    pub fn reject_add_to_cart(&self, message: &str) {
        lock(&self.state).reject_add_to_cart = Some(message.to_owned());
    }

    /// Make the `n`th `POST /order` (1-based) fail with a 500.
    pub fn fail_order_at(&self, n: usize) {
        lock(&self.state).fail_order_at = Some(n);
    }

    /// Answer `GET /orders/{userId}` with `body` regardless of stored orders.
    pub fn set_orders_response(&self, body: Value) {
        lock(&self.state).orders_override = Some(body);
    }

    /// Answer every request to `route` (e.g. `"GET /cart"`, `"POST /login"`)
    /// with `status` and an empty `{}` body.
    ///
    /// # Panics
    ///
    /// Panics if `status` is not a valid HTTP status code.
    #[allow(clippy::unwrap_used)]
    pub fn fail_route(&self, route: &str, status: u16) {
        let status = StatusCode::from_u16(status).unwrap();
        lock(&self.state)
            .failing_routes
            .insert(route.to_owned(), status);
    }

    /// Orders accepted so far, in arrival order.
    #[must_use]
    pub fn placed_orders(&self) -> Vec<Value> {
        lock(&self.state).orders.clone()
    }

    /// Number of `POST /order` calls received, successful or not.
    #[must_use]
    pub fn order_calls(&self) -> usize {
        lock(&self.state).order_calls
    }

    /// Server-side cart rows.
    #[must_use]
    pub fn cart_rows(&self) -> Vec<Value> {
        lock(&self.state).cart_rows.clone()
    }

    /// `"METHOD /path"` for every request received.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }
}

impl Drop for MockShop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn message(status: StatusCode, text: &str) -> Reply {
    (status, Json(json!({ "message": text })))
}

fn field_i64(body: &Value, key: &str) -> Option<i64> {
    body.get(key).and_then(Value::as_i64)
}

async fn login(State(shop): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut shop = lock(&shop);
    if let Some(reply) = shop.enter("POST /login".to_owned()) {
        return reply;
    }

    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    shop.users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .map_or_else(
            || message(StatusCode::UNAUTHORIZED, "Invalid email or password"),
            |user| {
                (
                    StatusCode::OK,
                    Json(json!({
                        "userId": user.user_id,
                        "username": user.name,
                        "message": "Login successful"
                    })),
                )
            },
        )
}

async fn register(State(shop): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut shop = lock(&shop);
    if let Some(reply) = shop.enter("POST /register".to_owned()) {
        return reply;
    }

    let field = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let (name, email, password) = (field("name"), field("email"), field("password"));

    if shop.users.iter().any(|u| u.email == email) {
        return message(StatusCode::CONFLICT, "Email already registered");
    }

    let user_id = i32::try_from(shop.users.len()).unwrap_or(i32::MAX - 1) + 1;
    shop.users.push(MockUser {
        user_id,
        name: name.clone(),
        email,
        password,
    });

    (
        StatusCode::CREATED,
        Json(json!({
            "userId": user_id,
            "username": name,
            "message": "Registration successful"
        })),
    )
}

async fn products(State(shop): State<Shared>, Path(category_id): Path<i32>) -> Reply {
    let mut shop = lock(&shop);
    if let Some(reply) = shop.enter(format!("GET /catwiseproducts/{category_id}")) {
        return reply;
    }

    let body = shop
        .products
        .get(&category_id)
        .cloned()
        .unwrap_or_else(|| json!([]));
    (StatusCode::OK, Json(body))
}

async fn add_to_cart(State(shop): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut shop = lock(&shop);
    if let Some(reply) = shop.enter("POST /cart".to_owned()) {
        return reply;
    }

    if let Some(text) = shop.reject_add_to_cart.clone() {
        return message(StatusCode::BAD_REQUEST, &text);
    }

    let (Some(user_id), Some(category_id), Some(product_id)) = (
        field_i64(&body, "userId"),
        field_i64(&body, "categoryId"),
        field_i64(&body, "productId"),
    ) else {
        return message(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    // Name the row after the listed product, as the real API joins it in.
    let product_name = i32::try_from(category_id)
        .ok()
        .and_then(|id| shop.products.get(&id))
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .find(|p| field_i64(p, "id") == Some(product_id))
        })
        .and_then(|p| p.get("name").and_then(Value::as_str))
        .unwrap_or("Unknown")
        .to_owned();

    shop.next_cart_id += 1;
    let row = json!({
        "cartId": shop.next_cart_id,
        "userId": user_id,
        "userName": "mock",
        "productId": product_id,
        "productName": product_name,
        "categoryId": category_id,
        "categoryName": "mock",
        "amount": body.get("amount").cloned().unwrap_or(Value::Null),
    });
    shop.cart_rows.push(row);

    message(StatusCode::CREATED, "Item added to cart")
}

async fn cart(State(shop): State<Shared>, Path(user_id): Path<i64>) -> Reply {
    let mut shop = lock(&shop);
    if let Some(reply) = shop.enter(format!("GET /cart/{user_id}")) {
        return reply;
    }

    if let Some(body) = shop.cart_override.clone() {
        return (StatusCode::OK, Json(body));
    }

    let rows: Vec<Value> = shop
        .cart_rows
        .iter()
        .filter(|row| field_i64(row, "userId") == Some(user_id))
        .cloned()
        .collect();
    if rows.is_empty() {
        return (StatusCode::OK, Json(json!("Cart is empty")));
    }
    (StatusCode::OK, Json(Value::Array(rows)))
}

async fn place_order(State(shop): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut shop = lock(&shop);
    shop.order_calls += 1;
    if let Some(reply) = shop.enter("POST /order".to_owned()) {
        return reply;
    }

    if shop.fail_order_at == Some(shop.order_calls) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }

    let order_id = shop.orders.len() + 1;
    let mut order = body;
    if let Some(fields) = order.as_object_mut() {
        fields.insert("orderId".to_owned(), json!(order_id));
        fields.insert("productName".to_owned(), json!("Ordered product"));
    }
    shop.orders.push(order);

    message(StatusCode::CREATED, "Order placed successfully")
}

async fn orders(State(shop): State<Shared>, Path(user_id): Path<i64>) -> Reply {
    let mut shop = lock(&shop);
    if let Some(reply) = shop.enter(format!("GET /orders/{user_id}")) {
        return reply;
    }

    if let Some(body) = shop.orders_override.clone() {
        return (StatusCode::OK, Json(body));
    }

    let orders: Vec<Value> = shop
        .orders
        .iter()
        .filter(|order| field_i64(order, "userId") == Some(user_id))
        .cloned()
        .collect();
    if orders.is_empty() {
        return (StatusCode::OK, Json(json!("No orders found")));
    }
    (StatusCode::OK, Json(Value::Array(orders)))
}
