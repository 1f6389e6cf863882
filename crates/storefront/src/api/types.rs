//! Wire types for the shop API.
//!
//! Field names follow the API's camelCase JSON. Responses are parsed
//! leniently: fields the client never displays default when absent.

use serde::{Deserialize, Serialize};

use shopfront_core::{CartEntry, CartId, CategoryId, OrderId, Price, ProductId, UserId};

// =============================================================================
// Responses
// =============================================================================

/// A product from `GET /catwiseproducts/{categoryId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price.
    pub amount: Price,
    /// Units available. Zero or less means out of stock.
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A server-side cart row from `GET /cart/{userId}`.
///
/// The API has no quantity column: each row is one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRow {
    pub cart_id: CartId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub product_id: ProductId,
    pub product_name: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub category_name: Option<String>,
    /// Unit price.
    pub amount: Price,
}

impl From<CartRow> for CartEntry {
    fn from(row: CartRow) -> Self {
        Self {
            cart_id: row.cart_id,
            product_id: row.product_id,
            name: row.product_name,
            cost: row.amount,
            quantity: 1,
            category_id: row.category_id,
        }
    }
}

/// A past order from `GET /orders/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Successful `POST /login` or `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub message: String,
}

/// Body of a failed request, when the API sends one.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Listing endpoints answer either with a JSON array or with a bare message
/// (e.g. when the cart is empty or the user has no orders).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Message(String),
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /cart` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub product_id: ProductId,
    pub amount: Price,
}

/// `POST /order` payload. One per cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
