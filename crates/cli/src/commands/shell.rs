//! Interactive session.
//!
//! One `AppState`, and so one cart, lives for the whole shell. Adding to the
//! cart updates it in place, the navbar line is reprinted whenever the cart
//! count or the logged-in user changes, and `checkout` places exactly what is
//! in the local cart.

use std::io::Write;

use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use shopfront_core::{CartId, Category, ProductId};
use shopfront_storefront::AppState;
use shopfront_storefront::views::Navbar;

use super::{CommandError, account, cart, catalog, complain, orders, say};

const HELP: &str = "\
Commands:
  login <email> <password>
  signup <name> <email> <password> <confirm-password>
  logout | whoami
  categories
  products <category>
  add <category> <product-id>
  cart                      fetch the cart from the server
  local                     show the cart held in this session
  remove <cart-id>
  qty <cart-id> <quantity>
  checkout [address]
  orders
  help | quit";

/// A parsed shell line.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Help,
    Quit,
    Login {
        email: String,
        password: String,
    },
    Signup {
        name: String,
        email: String,
        password: String,
        confirm_password: String,
    },
    Logout,
    Whoami,
    Categories,
    Products(Category),
    Add(Category, ProductId),
    Cart,
    Local,
    Remove(CartId),
    Quantity(CartId, u32),
    Checkout(Option<String>),
    Orders,
}

/// Parse one line. Blank lines parse to `None`.
fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name, args) {
        ("help" | "?", []) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        ("login", [email, password]) => ShellCommand::Login {
            email: (*email).to_owned(),
            password: (*password).to_owned(),
        },
        ("signup", [name, email, password, confirm]) => ShellCommand::Signup {
            name: (*name).to_owned(),
            email: (*email).to_owned(),
            password: (*password).to_owned(),
            confirm_password: (*confirm).to_owned(),
        },
        ("logout", []) => ShellCommand::Logout,
        ("whoami", []) => ShellCommand::Whoami,
        ("categories", []) => ShellCommand::Categories,
        ("products", [category]) => ShellCommand::Products(parse_arg(category)?),
        ("add", [category, product_id]) => {
            ShellCommand::Add(parse_arg(category)?, parse_arg(product_id)?)
        }
        ("cart", []) => ShellCommand::Cart,
        ("local", []) => ShellCommand::Local,
        ("remove", [cart_id]) => ShellCommand::Remove(parse_arg(cart_id)?),
        ("qty", [cart_id, quantity]) => {
            ShellCommand::Quantity(parse_arg(cart_id)?, parse_arg(quantity)?)
        }
        ("checkout", address) => {
            ShellCommand::Checkout((!address.is_empty()).then(|| address.join(" ")))
        }
        ("orders", []) => ShellCommand::Orders,
        _ => return Err(format!("Unknown command: {line}. Type 'help' for a list.")),
    };
    Ok(Some(command))
}

fn parse_arg<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| format!("Invalid argument '{raw}': {e}"))
}

#[allow(clippy::print_stdout)]
fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if stdin cannot be read; command failures are
/// printed and the shell carries on.
pub async fn run(app: &mut AppState) -> Result<(), CommandError> {
    let mut navbar = Navbar::attach(app);
    say(navbar.render());
    say("Type 'help' for a list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                complain(message);
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }

        let count = navbar.item_count();
        let user = navbar.username().map(str::to_owned);

        if let Err(err) = execute(app, command).await {
            debug!(error = %err, "Shell command failed");
        }

        navbar.refresh_user(app);
        if navbar.item_count() != count || navbar.username() != user.as_deref() {
            say(navbar.render());
        }
    }

    navbar.detach(app);
    Ok(())
}

async fn execute(app: &mut AppState, command: ShellCommand) -> Result<(), CommandError> {
    match command {
        ShellCommand::Help => say(HELP),
        ShellCommand::Quit => {}
        ShellCommand::Login { email, password } => {
            account::login(app, &email, &SecretString::from(password)).await?;
        }
        ShellCommand::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            account::signup(
                app,
                &name,
                &email,
                &SecretString::from(password),
                &SecretString::from(confirm_password),
            )
            .await?;
        }
        ShellCommand::Logout => account::logout(app)?,
        ShellCommand::Whoami => account::whoami(app),
        ShellCommand::Categories => catalog::categories(),
        ShellCommand::Products(category) => catalog::products(app, category).await?,
        ShellCommand::Add(category, product_id) => {
            catalog::add(app, category, product_id).await?;
        }
        ShellCommand::Cart => cart::show_cart(app).await?,
        ShellCommand::Local => cart::print_lines(app.cart()),
        ShellCommand::Remove(cart_id) => {
            if app.cart().get(cart_id).is_none() {
                complain(format_args!("No cart line {cart_id}."));
            }
            app.cart_mut().remove(cart_id);
        }
        ShellCommand::Quantity(cart_id, quantity) => {
            if app.cart().get(cart_id).is_none() {
                complain(format_args!("No cart line {cart_id}."));
            }
            app.cart_mut().set_quantity(cart_id, quantity);
        }
        ShellCommand::Checkout(address) => {
            cart::checkout(app, address.as_deref(), false).await?;
        }
        ShellCommand::Orders => orders::show_orders(app).await?,
    }
    Ok(())
}
