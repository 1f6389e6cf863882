use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use shopfront_core::Email;

use super::ViewState;
use crate::api::AuthResponse;
use crate::error::{ClientError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::session::CurrentUser;
use crate::state::AppState;

/// Login, signup, and logout.
#[derive(Debug, Clone, Default)]
pub struct AuthView {
    state: ViewState,
}

impl AuthView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Log in and remember the user in the session.
    ///
    /// On success the view's message is the API's greeting.
    ///
    /// # Errors
    ///
    /// Refuses a malformed email before calling the API. API failures show
    /// the API's message, or "Failed to login. Please try again.".
    pub async fn login(
        &mut self,
        app: &mut AppState,
        email: &str,
        password: &SecretString,
    ) -> Result<CurrentUser, ClientError> {
        self.state.begin();

        let result = async {
            let email = Email::parse(email)?;
            require_password(password)?;
            let response = app.api().login(&email, password).await?;
            remember(app, response)
        }
        .await;

        self.finish("login", result, "Failed to login. Please try again.")
    }

    /// Create an account and log straight in.
    ///
    /// # Errors
    ///
    /// Refuses mismatched passwords, a blank name, or a malformed email
    /// before calling the API. API failures show the API's message, or
    /// "Failed to sign up. Please try again.".
    pub async fn signup(
        &mut self,
        app: &mut AppState,
        name: &str,
        email: &str,
        password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<CurrentUser, ClientError> {
        self.state.begin();

        let result = async {
            if password.expose_secret() != confirm_password.expose_secret() {
                return Err(ClientError::PasswordMismatch);
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(ClientError::MissingField("name"));
            }
            let email = Email::parse(email)?;
            require_password(password)?;
            let response = app.api().register(name, &email, password).await?;
            remember(app, response)
        }
        .await;

        self.finish("signup", result, "Failed to sign up. Please try again.")
    }

    /// Forget the logged-in user.
    ///
    /// The local cart is left as it is.
    ///
    /// # Errors
    ///
    /// Returns an error if the session storage cannot be written.
    pub fn logout(&mut self, app: &mut AppState) -> Result<(), ClientError> {
        self.state.begin();

        match app.session_mut().clear() {
            Ok(()) => {
                clear_sentry_user();
                add_breadcrumb("auth", "Logged out", None);
                info!("User logged out");
                self.state.succeed(Some("Logged out.".to_string()));
                Ok(())
            }
            Err(err) => Err(self.state.fail(
                "logout",
                err.into(),
                "Failed to logout. Please try again.",
            )),
        }
    }

    fn finish(
        &mut self,
        context: &str,
        result: Result<(CurrentUser, String), ClientError>,
        fallback: &str,
    ) -> Result<CurrentUser, ClientError> {
        match result {
            Ok((user, message)) => {
                set_sentry_user(&user.user_id, &user.username);
                add_breadcrumb("auth", context, None);
                info!(user_id = %user.user_id, context, "User authenticated");
                self.state.succeed((!message.is_empty()).then_some(message));
                Ok(user)
            }
            Err(err) => Err(self.state.fail(context, err, fallback)),
        }
    }
}

fn require_password(password: &SecretString) -> Result<(), ClientError> {
    if password.expose_secret().is_empty() {
        return Err(ClientError::MissingField("password"));
    }
    Ok(())
}

/// Store the authenticated user; hand back the API's greeting.
fn remember(
    app: &mut AppState,
    response: AuthResponse,
) -> Result<(CurrentUser, String), ClientError> {
    let user = CurrentUser {
        user_id: response.user_id,
        username: response.username,
    };
    app.session_mut().store_user(&user)?;
    Ok((user, response.message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{EmailError, UserId};
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::session::Session;

    fn app() -> AppState {
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();
        AppState::with_parts(api, Session::in_memory())
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn test_signup_refuses_mismatched_passwords() {
        let mut app = app();
        let mut view = AuthView::new();

        let err = view
            .signup(&mut app, "Ada", "ada@example.com", &secret("a"), &secret("b"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::PasswordMismatch));
        assert_eq!(
            view.state().error(),
            Some("Passwords do not match. Please try again.")
        );
        assert_eq!(app.session().current_user().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_refuses_malformed_email() {
        let mut app = app();
        let mut view = AuthView::new();

        let err = view
            .login(&mut app, "not-an-email", &secret("pw"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::InvalidEmail(EmailError::BadAtSymbol)
        ));
    }

    #[test]
    fn test_logout_clears_session() {
        let mut app = app();
        app.session_mut()
            .store_user(&CurrentUser {
                user_id: UserId::new(5),
                username: "eve".to_string(),
            })
            .unwrap();
        let mut view = AuthView::new();

        view.logout(&mut app).unwrap();

        assert_eq!(app.session().current_user().unwrap(), None);
        assert_eq!(view.state().message(), Some("Logged out."));
    }
}
