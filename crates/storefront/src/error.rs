//! View-level error handling with Sentry integration.
//!
//! Every view operation returns `Result<T, ClientError>`. Views never let an
//! error escape silently: they turn it into the text shown to the user with
//! [`ClientError::user_message`] and leave their previous state in place.

use thiserror::Error;

use shopfront_core::EmailError;

use crate::api::ApiError;
use crate::session::SessionError;

/// Errors surfaced to the user by a view.
///
/// The `Display` text of the client-side variants is the exact message shown
/// to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No `userId` in the session. `action` completes "Please login to ...".
    #[error("Please login to {action}.")]
    NotLoggedIn { action: &'static str },

    /// Session storage failed or holds an unusable user ID.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The cart has no lines.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// The product has no stock left.
    #[error("{0} is out of stock.")]
    OutOfStock(String),

    /// Signup password and confirmation differ.
    #[error("Passwords do not match. Please try again.")]
    PasswordMismatch,

    /// A required form field was left blank.
    #[error("Please enter your {0}.")]
    MissingField(&'static str),

    /// Email address is malformed.
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The shop API failed or refused the request.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// Text to show the user.
    ///
    /// Client-side problems use their own wording. API failures use the
    /// message the API supplied, or `fallback` when there is none (transport
    /// errors, bare status codes, storage failures).
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err
                .api_message()
                .map_or_else(|| fallback.to_owned(), str::to_owned),
            Self::Session(SessionError::InvalidUserId(_))
            | Self::NotLoggedIn { .. }
            | Self::EmptyCart
            | Self::OutOfStock(_)
            | Self::PasswordMismatch
            | Self::MissingField(_)
            | Self::InvalidEmail(_) => self.to_string(),
            Self::Session(_) => fallback.to_owned(),
        }
    }

    /// Like [`user_message`](Self::user_message), but an API error body is
    /// never shown: failed requests always read as `fallback`. A bare message
    /// the API returned in place of data is still shown.
    #[must_use]
    pub fn generic_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(ApiError::Message(message)) => message.clone(),
            Self::Api(_) => fallback.to_owned(),
            _ => self.user_message(fallback),
        }
    }

    /// Whether this failure is worth capturing to Sentry.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_side(),
            Self::Session(SessionError::Io { .. } | SessionError::Corrupt { .. }) => true,
            _ => false,
        }
    }
}

/// Log a view failure and capture it to Sentry when it is reportable.
///
/// `context` names the operation, e.g. `"place_order"`.
pub fn report(context: &str, err: &ClientError) {
    if err.is_reportable() {
        let event_id = sentry::capture_error(err);
        tracing::error!(
            error = %err,
            context,
            sentry_event_id = %event_id,
            "Storefront operation failed"
        );
    } else {
        tracing::info!(error = %err, context, "Storefront operation refused");
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_side_messages() {
        let err = ClientError::NotLoggedIn {
            action: "view your cart",
        };
        assert_eq!(err.user_message("unused"), "Please login to view your cart.");
        assert_eq!(
            ClientError::EmptyCart.user_message("unused"),
            "Your cart is empty."
        );
        assert_eq!(
            ClientError::PasswordMismatch.user_message("unused"),
            "Passwords do not match. Please try again."
        );
        assert_eq!(
            ClientError::Session(SessionError::InvalidUserId("x".to_string()))
                .user_message("unused"),
            "Invalid user ID. Please login again."
        );
    }

    #[test]
    fn test_api_message_wins_over_fallback() {
        let err = ClientError::Api(ApiError::Api {
            status: 409,
            message: Some("Email already registered".to_string()),
        });
        assert_eq!(
            err.user_message("Failed to sign up. Please try again."),
            "Email already registered"
        );
    }

    #[test]
    fn test_fallback_without_api_message() {
        let err = ClientError::Api(ApiError::Api {
            status: 502,
            message: None,
        });
        assert_eq!(
            err.user_message("Failed to place order. Please try again."),
            "Failed to place order. Please try again."
        );
        assert!(err.is_reportable());
    }

    #[test]
    fn test_generic_message_hides_error_body() {
        let err = ClientError::Api(ApiError::Api {
            status: 400,
            message: Some("Product not found".to_string()),
        });
        assert_eq!(
            err.generic_message("Failed to place order. Please try again."),
            "Failed to place order. Please try again."
        );

        let listing = ClientError::Api(ApiError::Message("No orders yet".to_string()));
        assert_eq!(
            listing.generic_message("Failed to fetch orders. Please try again."),
            "No orders yet"
        );
    }

    #[test]
    fn test_refusals_are_not_reportable() {
        assert!(!ClientError::EmptyCart.is_reportable());
        assert!(!ClientError::OutOfStock("Socks".to_string()).is_reportable());
        assert!(
            !ClientError::Api(ApiError::Api {
                status: 400,
                message: None
            })
            .is_reportable()
        );
    }
}
