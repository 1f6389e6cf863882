//! Subcommand implementations.
//!
//! Each command drives one storefront view and prints what the view would
//! show: its message on stdout, its error on stderr.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod shell;

use std::fmt::Display;

use thiserror::Error;

use shopfront_core::{Category, ProductId};
use shopfront_storefront::ClientError;
use shopfront_storefront::views::ViewState;

/// Errors from running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A view refused or failed; its message has already been printed.
    #[error(transparent)]
    View(#[from] ClientError),

    /// The product is not listed in the category.
    #[error("No product {product_id} in {category}.")]
    UnknownProduct {
        product_id: ProductId,
        category: Category,
    },

    /// Reading interactive input failed.
    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

impl CommandError {
    /// Whether the user has already been shown this failure.
    #[must_use]
    pub const fn already_shown(&self) -> bool {
        matches!(self, Self::View(_) | Self::UnknownProduct { .. })
    }
}

/// Whether a failed command already told the user what went wrong.
///
/// View failures print their own message and are captured to Sentry by the
/// view when reportable, so they are not logged again as errors.
pub fn already_shown(err: &(dyn std::error::Error + 'static)) -> bool {
    err.is::<ClientError>()
        || err
            .downcast_ref::<CommandError>()
            .is_some_and(CommandError::already_shown)
}

/// Print a line of command output.
#[allow(clippy::print_stdout)]
pub fn say(text: impl Display) {
    println!("{text}");
}

/// Print a line the user should notice.
#[allow(clippy::print_stderr)]
pub fn complain(text: impl Display) {
    eprintln!("{text}");
}

/// Print a view's outcome.
pub fn show(state: &ViewState) {
    if let Some(message) = state.message() {
        say(message);
    }
    if let Some(error) = state.error() {
        complain(error);
    }
}
