//! Shopfront CLI - Storefront and admin client for the shop backend.
//!
//! # Usage
//!
//! ```bash
//! # Browse and buy
//! shop products list --category shirts --sort price-low
//! shop cart add 64f1c0a2 --quantity 2 --size M
//! shop cart promo SAVE10
//! shop checkout --firstname Ada --lastname Lovelace --address "1 Main St" \
//!     --city Springfield --zip 12345 --state IL --phone 5551234 \
//!     --email ada@example.com --payment card
//!
//! # Manage the shop
//! shop auth admin-login -u root
//! shop admin orders set-status 64f1c0a2 shipped
//! shop admin analytics
//! ```
//!
//! # Environment Variables
//!
//! See `shopfront_client::config` for the backend URL and storage settings.
//! `SHOPFRONT_PASSWORD` supplies the password for the auth commands, and
//! `RUST_LOG` overrides the default `shopfront=info` log filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_client::{ClientConfig, Shopfront};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod notifier;
mod render;

use commands::CommandError;
use notifier::TerminalNotifier;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Shopfront storefront and admin client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, register, or sign out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Browse the catalogue
    Products {
        #[command(subcommand)]
        action: commands::catalog::ProductsAction,
    },
    /// View and change the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Place an order for the current cart
    Checkout(commands::orders::CheckoutArgs),
    /// Order history
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrdersAction,
    },
    /// Favourite products
    Favourites {
        #[command(subcommand)]
        action: commands::favourites::FavouritesAction,
    },
    /// Admin tools (requires `shop auth admin-login`)
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events; info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_error() => {
            tracing::warn!("Command rejected: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CommandError> {
    let shop = Shopfront::open(config, Arc::new(TerminalNotifier)).await?;

    match cli.command {
        Commands::Auth { action } => commands::auth::run(&shop, action).await,
        Commands::Products { action } => commands::catalog::run(&shop, action).await,
        Commands::Cart { action } => commands::cart::run(&shop, action).await,
        Commands::Checkout(args) => commands::orders::checkout(&shop, args).await,
        Commands::Orders { action } => commands::orders::run(&shop, action).await,
        Commands::Favourites { action } => commands::favourites::run(&shop, action).await,
        Commands::Admin { action } => commands::admin::run(&shop, action).await,
    }
}
