//! Shopfront CLI - browse, fill a cart, and check out from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in a file between runs)
//! shop login -e ada@example.com -p secret
//!
//! # Browse and add to the server-side cart
//! shop products electronics
//! shop add electronics 12
//!
//! # Review and place the cart
//! shop cart
//! shop checkout --address "1 Main St"
//!
//! # Everything above, in one process with one in-memory cart
//! shop shell
//! ```
//!
//! # Commands
//!
//! - `login` / `signup` / `logout` / `whoami` - Session management
//! - `categories` / `products` / `add` - Catalog
//! - `cart` / `checkout` / `orders` - Cart and order history
//! - `shell` - Interactive session

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_core::{Category, ProductId};
use shopfront_storefront::{AppState, ConfigError, StorefrontConfig};

mod commands;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    /// Base URL of the shop API
    #[arg(long, global = true, env = "SHOPFRONT_API_URL")]
    api_url: Option<String>,

    /// File the login session is kept in between runs
    #[arg(long, global = true, env = "SHOPFRONT_SESSION_FILE")]
    session_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(short, long)]
        confirm_password: String,
    },
    /// Forget the logged-in user
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List the product categories
    Categories,
    /// List the products in a category
    Products {
        /// Category name or ID (electronics, clothes, food)
        category: Category,
    },
    /// Add one unit of a product to the cart
    Add {
        /// Category name or ID the product is listed under
        category: Category,

        /// Product ID from `shop products`
        product_id: ProductId,
    },
    /// Show the cart
    Cart,
    /// Place one order per cart line
    Checkout {
        /// Delivery address sent with each order
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Show order history
    Orders,
    /// Interactive session with a live cart
    Shell,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Environment configuration with command-line flags taking precedence.
fn load_config(cli: &Cli) -> Result<StorefrontConfig, ConfigError> {
    StorefrontConfig::from_lookup(|key| match key {
        "SHOPFRONT_API_URL" => cli.api_url.clone(),
        "SHOPFRONT_SESSION_FILE" => cli.session_file.clone(),
        _ => std::env::var(key).ok(),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env before clap so flag defaults can come from it
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            commands::complain(format_args!("Configuration error: {e}"));
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,shopfront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config).await;

    if let Err(e) = result {
        if commands::already_shown(e.as_ref()) {
            tracing::debug!(error = %e, "Command failed");
        } else {
            tracing::error!("Command failed: {e}");
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(command: Commands, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = AppState::new(config)?;

    match command {
        Commands::Login { email, password } => {
            commands::account::login(&mut app, &email, &SecretString::from(password)).await?;
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            commands::account::signup(
                &mut app,
                &name,
                &email,
                &SecretString::from(password),
                &SecretString::from(confirm_password),
            )
            .await?;
        }
        Commands::Logout => commands::account::logout(&mut app)?,
        Commands::Whoami => commands::account::whoami(&mut app),
        Commands::Categories => commands::catalog::categories(),
        Commands::Products { category } => {
            commands::catalog::products(&app, category).await?;
        }
        Commands::Add {
            category,
            product_id,
        } => {
            commands::catalog::add(&mut app, category, product_id).await?;
        }
        Commands::Cart => commands::cart::show_cart(&mut app).await?,
        Commands::Checkout { address } => {
            commands::cart::checkout(&mut app, address.as_deref(), true).await?;
        }
        Commands::Orders => commands::orders::show_orders(&app).await?,
        Commands::Shell => commands::shell::run(&mut app).await?,
    }
    Ok(())
}
