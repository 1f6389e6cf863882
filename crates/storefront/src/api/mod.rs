//! Client for the external shop API.
//!
//! Plain JSON over HTTP via `reqwest`. The API owns all business rules
//! (pricing, stock, order creation); this client only moves data.
//!
//! # Endpoints
//!
//! ```text
//! POST /login                         - Log in, returns userId + username
//! POST /register                      - Sign up, returns userId + username
//! GET  /catwiseproducts/{categoryId}  - Products in a category
//! GET  /cart/{userId}                 - Server-side cart rows
//! POST /cart                          - Add one unit of a product
//! POST /order                         - Place an order for one product
//! GET  /orders/{userId}               - Order history
//! ```
//!
//! There is no retry, no cancellation, and no timeout beyond `reqwest`'s
//! defaults.

pub mod types;

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use shopfront_core::{CategoryId, Email, UserId};

pub use types::{
    AddToCartRequest, AuthResponse, CartRow, Listing, Order, OrderRequest, Product,
};
use types::{ErrorBody, LoginRequest, RegisterRequest};

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status}{}", message_suffix(.message))]
    Api {
        status: u16,
        /// `message` from the JSON error body, if any.
        message: Option<String>,
    },

    /// The API answered with a bare message where data was expected.
    #[error("{0}")]
    Message(String),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

#[allow(clippy::ref_option)]
fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default()
}

impl ApiError {
    /// The message the API itself supplied, suitable for showing to a user.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Transport failures and 5xx responses; worth reporting to Sentry.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Message(_) | Self::Url(_) => false,
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the shop API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the API's message on bad credentials, or
    /// a transport error.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let request = self.inner.client.post(self.endpoint("login")?).json(&body);
        self.fetch_json(request).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the API's message (e.g. email taken), or
    /// a transport error.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest {
            name,
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let request = self.inner.client.post(self.endpoint("register")?).json(&body);
        self.fetch_json(request).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List the products in a category.
    ///
    /// A bare message instead of a list is treated as "no products".
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&format!("catwiseproducts/{category_id}"))?;
        match self.fetch_listing(self.inner.client.get(url)).await? {
            Listing::Items(products) => Ok(products),
            Listing::Message(message) => {
                debug!(%message, "Product listing returned a message");
                Ok(Vec::new())
            }
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the server-side cart rows for a user.
    ///
    /// A bare message instead of a list means the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn cart(&self, user_id: UserId) -> Result<Vec<CartRow>, ApiError> {
        let url = self.endpoint(&format!("cart/{user_id}"))?;
        match self.fetch_listing(self.inner.client.get(url)).await? {
            Listing::Items(rows) => Ok(rows),
            Listing::Message(message) => {
                debug!(%message, "Cart listing returned a message, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Add a product line to the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` if the API rejects the line, or a transport
    /// error.
    #[instrument(skip(self), fields(user_id = %request.user_id, product_id = %request.product_id))]
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<(), ApiError> {
        let request = self.inner.client.post(self.endpoint("cart")?).json(request);
        self.send(request).await.map(drop)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` if the API rejects the order, or a transport
    /// error.
    #[instrument(skip(self), fields(user_id = %request.user_id, product_id = %request.product_id))]
    pub async fn place_order(&self, request: &OrderRequest) -> Result<(), ApiError> {
        let request = self.inner.client.post(self.endpoint("order")?).json(request);
        self.send(request).await.map(drop)
    }

    /// Fetch a user's order history.
    ///
    /// # Errors
    ///
    /// A bare message instead of a list comes back as `ApiError::Message`
    /// so it can be shown to the user. Transport and parse failures are
    /// returned as-is.
    #[instrument(skip(self))]
    pub async fn orders(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&format!("orders/{user_id}"))?;
        match self.fetch_listing(self.inner.client.get(url)).await? {
            Listing::Items(orders) => Ok(orders),
            Listing::Message(message) => Err(ApiError::Message(message)),
        }
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn fetch_listing<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Listing<T>, ApiError> {
        let body = self.send(request).await?;
        parse_listing(&body)
    }
}

/// Build an `ApiError::Api`, pulling `message` out of a JSON body if present.
fn api_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty());

    let err = ApiError::Api {
        status: status.as_u16(),
        message,
    };

    // Client errors are the API refusing the user; the view reports them.
    if err.is_server_side() {
        warn!(
            status = %status,
            body = %truncate(body),
            "Shop API returned non-success status"
        );
    } else {
        debug!(status = %status, body = %truncate(body), "Shop API refused request");
    }

    err
}

/// Parse a listing body. Non-JSON text is taken as a bare message; an empty
/// body or blank message is an empty list.
fn parse_listing<T: DeserializeOwned>(body: &str) -> Result<Listing<T>, ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Listing::Items(Vec::new()));
    }
    match serde_json::from_str::<Listing<T>>(trimmed) {
        Ok(Listing::Message(message)) if message.trim().is_empty() => {
            Ok(Listing::Items(Vec::new()))
        }
        Ok(listing) => Ok(listing),
        Err(e) => {
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                warn!(error = %e, body = %truncate(body), "Failed to parse API listing");
                Err(ApiError::Parse(e))
            } else {
                Ok(Listing::Message(trimmed.to_owned()))
            }
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}
