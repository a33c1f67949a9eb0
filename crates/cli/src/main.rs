//! RocketCart CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rc-cli show
//!
//! # Show the raw snapshot
//! rc-cli show --json
//!
//! # Add one unit of product 7
//! rc-cli add 7
//!
//! # Set product 7 to three units
//! rc-cli set 7 3
//!
//! # Remove product 7
//! rc-cli remove 7
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart and its subtotal
//! - `add` - Add one unit of a product (checked against stock)
//! - `remove` - Remove a product's line item
//! - `set` - Set a product's exact quantity (checked against stock)
//!
//! Configuration comes from the environment; see `rocketcart_cart::config`.
//! Set `LOG_FORMAT=json` for JSON log lines on stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketcart_core::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::cart::{self, CommandError, Mutation};

#[derive(Parser)]
#[command(name = "rc-cli")]
#[command(author, version, about = "RocketCart cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current cart
    Show {
        /// Print the persisted snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set a product's exact quantity
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity (zero or negative is ignored; use `remove` instead)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketcart_cart=info,rocketcart_cli=info".into());

    // JSON lines for log shipping, text otherwise; both on stderr
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let store = cart::open_store().await?;

    match cli.command {
        Commands::Show { json } => cart::show(&store, json).await?,
        Commands::Add { id } => cart::apply(&store, Mutation::Add(id)).await?,
        Commands::Remove { id } => cart::apply(&store, Mutation::Remove(id)).await?,
        Commands::Set { id, amount } => cart::apply(&store, Mutation::Set(id, amount)).await?,
    }
    Ok(())
}
