use tracing::{debug, info};

use shopfront_core::{CartEntry, CartId, Category};

use super::ViewState;
use crate::api::{AddToCartRequest, Product};
use crate::error::{ClientError, add_breadcrumb};
use crate::state::AppState;

/// Products in one category, with add-to-cart.
#[derive(Debug, Clone)]
pub struct CatalogView {
    category: Category,
    products: Vec<Product>,
    loaded: bool,
    state: ViewState,
}

impl CatalogView {
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            category,
            products: Vec::new(),
            loaded: false,
            state: ViewState::default(),
        }
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Products from the last successful load.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// "No {category} products available." once a load came back empty.
    #[must_use]
    pub fn empty_notice(&self) -> Option<String> {
        (self.loaded && self.products.is_empty())
            .then(|| format!("No {} products available.", self.category.slug()))
    }

    /// Fetch the category's products.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the error text is always
    /// "Failed to fetch {category} products. Please try again.".
    pub async fn load(&mut self, app: &AppState) -> Result<usize, ClientError> {
        self.state.begin();

        match app.api().products_by_category(self.category.id()).await {
            Ok(products) => {
                debug!(category = %self.category, count = products.len(), "Products loaded");
                self.products = products;
                self.loaded = true;
                self.state.succeed(None);
                Ok(self.products.len())
            }
            Err(err) => {
                let fallback = format!(
                    "Failed to fetch {} products. Please try again.",
                    self.category.slug()
                );
                Err(self.state.fail_generic("load_products", err.into(), &fallback))
            }
        }
    }

    /// Add one unit of `product` to the server-side cart, then to the local
    /// cart.
    ///
    /// The local entry gets a fresh millisecond-timestamp `cart_id` and this
    /// view's category. If the product is already in the local cart the
    /// quantities merge.
    ///
    /// # Errors
    ///
    /// Refuses when nobody is logged in or the product is out of stock.
    /// API failures show the API's message, or "Failed to add to cart.".
    pub async fn add_to_cart(
        &mut self,
        app: &mut AppState,
        product: &Product,
    ) -> Result<CartId, ClientError> {
        self.state.begin();

        match self.try_add_to_cart(app, product).await {
            Ok(cart_id) => {
                self.state
                    .succeed(Some(format!("{} added to cart!", product.name)));
                Ok(cart_id)
            }
            Err(err) => Err(self
                .state
                .fail("add_to_cart", err, "Failed to add to cart.")),
        }
    }

    async fn try_add_to_cart(
        &self,
        app: &mut AppState,
        product: &Product,
    ) -> Result<CartId, ClientError> {
        let user = app.require_user("add items to cart")?;
        if !product.in_stock() {
            return Err(ClientError::OutOfStock(product.name.clone()));
        }

        let request = AddToCartRequest {
            user_id: user.user_id,
            category_id: self.category.id(),
            product_id: product.id,
            amount: product.amount,
        };
        app.api().add_to_cart(&request).await?;

        let cart_id = app.next_cart_id();
        app.cart_mut().add(CartEntry {
            cart_id,
            product_id: product.id,
            name: product.name.clone(),
            cost: product.amount,
            quantity: 1,
            category_id: self.category.id(),
        });

        let product_id = product.id.to_string();
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product_id.as_str())]),
        );
        info!(user_id = %user.user_id, product_id = %product.id, "Product added to cart");

        Ok(cart_id)
    }
}
