//! Login, signup, logout, and whoami.

use secrecy::SecretString;

use shopfront_storefront::views::{AuthView, Navbar};
use shopfront_storefront::{AppState, ClientError};

use super::{say, show};

/// Log in and store the session.
///
/// # Errors
///
/// Returns the view error after printing its message.
pub async fn login(
    app: &mut AppState,
    email: &str,
    password: &SecretString,
) -> Result<(), ClientError> {
    let mut view = AuthView::new();
    let result = view.login(app, email, password).await;
    show(view.state());
    result.map(drop)
}

/// Create an account and store the session.
///
/// # Errors
///
/// Returns the view error after printing its message.
pub async fn signup(
    app: &mut AppState,
    name: &str,
    email: &str,
    password: &SecretString,
    confirm_password: &SecretString,
) -> Result<(), ClientError> {
    let mut view = AuthView::new();
    let result = view
        .signup(app, name, email, password, confirm_password)
        .await;
    show(view.state());
    result.map(drop)
}

/// Forget the session.
///
/// # Errors
///
/// Returns the view error after printing its message.
pub fn logout(app: &mut AppState) -> Result<(), ClientError> {
    let mut view = AuthView::new();
    let result = view.logout(app);
    show(view.state());
    result
}

/// Print the navbar line.
pub fn whoami(app: &mut AppState) {
    let navbar = Navbar::attach(app);
    say(navbar.render());
    navbar.detach(app);
}
