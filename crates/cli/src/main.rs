//! Storefront CLI - Browse the catalog, manage a local cart, print JSON-LD.
//!
//! # Usage
//!
//! ```bash
//! # List platform products
//! sf-cli products --limit 5
//!
//! # Show one product from Shopify
//! sf-cli product cold-brew --source shopify
//!
//! # Add to the file-persisted cart and show it
//! sf-cli cart add cold-brew --quantity 2
//! sf-cli cart show
//!
//! # Print product JSON-LD
//! sf-cli seo product cold-brew --base-url https://shop.example.com
//! ```
//!
//! # Commands
//!
//! - `products`, `product`, `collections`, `collection` - Catalog browsing
//! - `cart` - Local cart (`show`, `add`, `remove`, `set`, `clear`)
//! - `seo` - schema.org JSON-LD output

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use storefront_sdk::SdkConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Source;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Storefront SDK command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        #[arg(short, long, value_enum, default_value_t = Source::Platform)]
        source: Source,

        /// Maximum number of products
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Show one product by handle
    Product {
        handle: String,

        #[arg(short, long, value_enum, default_value_t = Source::Platform)]
        source: Source,
    },
    /// List collections
    Collections {
        #[arg(short, long, value_enum, default_value_t = Source::Platform)]
        source: Source,

        /// Maximum number of collections
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Show one collection and its products
    Collection {
        handle: String,

        #[arg(short, long, value_enum, default_value_t = Source::Platform)]
        source: Source,

        /// Maximum number of products
        #[arg(short, long, default_value_t = 12)]
        limit: u32,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Print schema.org JSON-LD
    Seo {
        #[command(subcommand)]
        action: SeoAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show {
        /// Currency used to format amounts
        #[arg(long, default_value = "USD")]
        currency: String,
    },
    /// Add a product variant
    Add {
        /// Product handle
        handle: String,

        /// Variant id (defaults to the first available variant)
        #[arg(long)]
        variant: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(short, long, value_enum, default_value_t = Source::Platform)]
        source: Source,
    },
    /// Remove a line by variant id
    Remove { variant_id: String },
    /// Set a line's quantity (0 or less removes it)
    Set {
        variant_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum SeoAction {
    /// Product JSON-LD
    Product {
        handle: String,

        /// Public store URL used for page links
        #[arg(long)]
        base_url: String,

        #[arg(short, long, value_enum, default_value_t = Source::Platform)]
        source: Source,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SdkConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
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
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_sdk=info,storefront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match SdkConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &SdkConfig) -> storefront_sdk::Result<()> {
    match cli.command {
        Commands::Products { source, limit } => {
            commands::catalog::products(config, source, limit).await?;
        }
        Commands::Product { handle, source } => {
            commands::catalog::product(config, source, &handle).await?;
        }
        Commands::Collections { source, limit } => {
            commands::catalog::collections(config, source, limit).await?;
        }
        Commands::Collection {
            handle,
            source,
            limit,
        } => commands::catalog::collection(config, source, &handle, limit).await?,
        Commands::Cart { action } => match action {
            CartAction::Show { currency } => commands::cart::show(config, &currency)?,
            CartAction::Add {
                handle,
                variant,
                quantity,
                source,
            } => {
                commands::cart::add(config, source, &handle, variant.as_deref(), quantity)
                    .await?;
            }
            CartAction::Remove { variant_id } => commands::cart::remove(config, &variant_id)?,
            CartAction::Set {
                variant_id,
                quantity,
            } => commands::cart::set(config, &variant_id, quantity)?,
            CartAction::Clear => commands::cart::clear(config)?,
        },
        Commands::Seo { action } => match action {
            SeoAction::Product {
                handle,
                base_url,
                source,
            } => commands::seo::product(config, source, &handle, &base_url).await?,
        },
    }
    Ok(())
}
