//! Application state handed to every view.

use chrono::Utc;

use shopfront_core::{CartId, CartStore};

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::error::ClientError;
use crate::session::{CurrentUser, FileStorage, Session};

/// Everything a view needs for one client session.
///
/// Owned by the front end and borrowed by views for the duration of a single
/// operation. The cart lives here and nowhere else, so a view that wants to
/// mutate it asks for `&mut AppState`.
#[derive(Debug)]
pub struct AppState {
    api: ApiClient,
    session: Session,
    cart: CartStore,
    last_cart_id: i64,
}

impl AppState {
    /// Create state from configuration, with the session persisted to
    /// `config.session_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(config.api_url.clone())?;
        let session = Session::new(FileStorage::new(&config.session_file));
        Ok(Self::with_parts(api, session))
    }

    /// Assemble state from an existing client and session, with an empty cart.
    #[must_use]
    pub fn with_parts(api: ApiClient, session: Session) -> Self {
        Self {
            api,
            session,
            cart: CartStore::new(),
            last_cart_id: 0,
        }
    }

    /// Get a reference to the shop API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Get a reference to the cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// A fresh `cart_id` for a locally added line.
    ///
    /// The current time in milliseconds, bumped past the last issued ID so two
    /// adds within the same millisecond still get distinct lines.
    pub fn next_cart_id(&mut self) -> CartId {
        let id = Utc::now()
            .timestamp_millis()
            .max(self.last_cart_id.saturating_add(1));
        self.last_cart_id = id;
        CartId::new(id)
    }

    /// The logged-in user, or `NotLoggedIn` naming what the user was trying
    /// to do (e.g. `"view your cart"`).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotLoggedIn` if nobody is logged in, or a
    /// session error if the stored user ID is unusable.
    pub fn require_user(&self, action: &'static str) -> Result<CurrentUser, ClientError> {
        self.session
            .current_user()?
            .ok_or(ClientError::NotLoggedIn { action })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::UserId;
    use url::Url;

    use super::*;

    fn state() -> AppState {
        let api = ApiClient::new(Url::parse("http://localhost:9/").unwrap()).unwrap();
        AppState::with_parts(api, Session::in_memory())
    }

    #[test]
    fn test_require_user_when_logged_out() {
        let err = state().require_user("view your orders").unwrap_err();
        assert_eq!(err.to_string(), "Please login to view your orders.");
    }

    #[test]
    fn test_cart_ids_are_unique_within_a_millisecond() {
        let mut app = state();
        let before = Utc::now().timestamp_millis();

        let ids: Vec<i64> = (0..50).map(|_| app.next_cart_id().get()).collect();

        assert!(ids[0] >= before);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "{ids:?}");
    }

    #[test]
    fn test_require_user_when_logged_in() {
        let mut app = state();
        let user = CurrentUser {
            user_id: UserId::new(3),
            username: "ada".to_string(),
        };
        app.session_mut().store_user(&user).unwrap();

        assert_eq!(app.require_user("place an order").unwrap(), user);
        assert!(app.cart().is_empty());
    }
}
