//! Queledoy CLI - Browse the catalog and manage wishlists from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! queledoy products --search taza --sort price-asc
//! queledoy categories
//!
//! # Manage lists (credentials from flags or QUELEDOY_EMAIL / QUELEDOY_PASSWORD)
//! queledoy lists
//! queledoy show 7
//! queledoy create "Birthday" --description "Ideas for Ana"
//! queledoy rename 7 "Cumpleaños"
//! queledoy add 7 42
//! queledoy remove 7 42
//! queledoy containing 42
//! queledoy delete 7
//! ```
//!
//! # Environment Variables
//!
//! - `QUELEDOY_API_URL` - Backend base URL (default: `http://localhost:4000`)
//! - `QUELEDOY_HTTP_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `QUELEDOY_EMAIL` / `QUELEDOY_PASSWORD` - Account for list commands
//! - `SENTRY_DSN` - Report warnings and errors to Sentry
//! - `RUST_LOG` - Log filter (default: `queledoy=info,queledoy_client=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use queledoy_client::{CatalogQuery, ClientConfig, SortOrder, Storefront};
use queledoy_core::{ListId, ProductId};

mod commands;

use commands::{CommandError, catalog, lists};

#[derive(Parser)]
#[command(name = "queledoy")]
#[command(author, version, about = "Queledoy storefront: catalog and wishlists")]
struct Cli {
    /// Account email for list commands
    #[arg(long, env = "QUELEDOY_EMAIL", global = true)]
    email: Option<String>,

    /// Account password for list commands
    #[arg(long, env = "QUELEDOY_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Case-insensitive text matched against name and category
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category name
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum price (ignored unless positive)
        #[arg(long)]
        max_price: Option<Decimal>,

        /// `featured`, `price-asc`, `price-desc`, `name-asc` or `name-desc`
        #[arg(long, default_value_t = SortOrder::Featured)]
        sort: SortOrder,
    },
    /// List catalog categories
    Categories,
    /// Show your lists
    Lists,
    /// Show one list and its products
    Show {
        list: ListId,
    },
    /// Create a list
    Create {
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Rename a list (and optionally change its description)
    Rename {
        list: ListId,
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a list
    Delete {
        list: ListId,
    },
    /// Add a catalog product to a list
    Add {
        list: ListId,
        product: ProductId,
    },
    /// Remove a product from a list
    Remove {
        list: ListId,
        product: ProductId,
    },
    /// Show the lists containing a product
    Containing {
        product: ProductId,
    },
}

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
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "queledoy=info,queledoy_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = ClientConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let cli = Cli::parse();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CommandError> {
    let storefront = Storefront::new(config)?;
    let credentials = lists::Credentials {
        email: cli.email,
        password: cli.password.map(SecretString::from),
    };

    match cli.command {
        Commands::Products {
            search,
            category,
            max_price,
            sort,
        } => {
            let query = CatalogQuery {
                search,
                category,
                max_price,
                sort,
            };
            catalog::products(&storefront, &query).await?;
        }
        Commands::Categories => catalog::list_categories(&storefront).await?,
        command => {
            lists::sign_in(&storefront, &credentials).await?;
            run_list_command(&storefront, command).await?;
            storefront.auth.logout();
        }
    }
    Ok(())
}

async fn run_list_command(storefront: &Storefront, command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Lists => lists::list_all(storefront),
        Commands::Show { list } => lists::show(storefront, list).await?,
        Commands::Create { name, description } => {
            lists::create(storefront, &name, &description).await?;
        }
        Commands::Rename {
            list,
            name,
            description,
        } => lists::rename(storefront, list, &name, description.as_deref()).await?,
        Commands::Delete { list } => lists::delete(storefront, list).await?,
        Commands::Add { list, product } => lists::add(storefront, list, product).await?,
        Commands::Remove { list, product } => lists::remove(storefront, list, product).await?,
        Commands::Containing { product } => lists::containing(storefront, product),
        Commands::Products { .. } | Commands::Categories => {}
    }
    Ok(())
}
