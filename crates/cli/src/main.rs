//! Sanekey CLI - Drive a local, file-backed shopping cart.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! sanekey catalog
//!
//! # Add two units of a product, then show the cart
//! sanekey add women-1 -q 2
//! sanekey show
//!
//! # Change or drop a line (a quantity of 0 removes it)
//! sanekey update women-1 3
//! sanekey remove women-1
//!
//! # Pay for the cart
//! sanekey checkout --user u-42 --method paypal
//! ```
//!
//! Configuration comes from `SANEKEY_*` environment variables (see
//! `sanekey_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sanekey_cart::CartConfig;
use sanekey_core::PaymentMethod;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "sanekey")]
#[command(author, version, about = "Sanekey cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog,
    /// Show the cart and order summary
    Show {
        /// Print the raw snapshot and summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product to the cart
    Add {
        /// Product reference
        product: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product reference
        product: String,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product reference
        product: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Pay for the cart and clear it on success
    Checkout {
        /// Signed-in user ID
        #[arg(short, long)]
        user: Option<String>,

        /// Payment provider (`stripe`, `paypal`)
        #[arg(short, long, default_value = "stripe")]
        method: PaymentMethod,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sanekey=info,sanekey_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog => commands::catalog::list(config).await?,
        Commands::Show { json } => commands::cart::show(config, json).await?,
        Commands::Add { product, quantity } => {
            commands::cart::add(config, &product, quantity).await?;
        }
        Commands::Remove { product } => commands::cart::remove(config, &product).await?,
        Commands::Update { product, quantity } => {
            commands::cart::update(config, &product, quantity).await?;
        }
        Commands::Clear => commands::cart::clear(config).await?,
        Commands::Checkout { user, method } => {
            commands::checkout::run(config, user.as_deref(), method).await?;
        }
    }
    Ok(())
}
