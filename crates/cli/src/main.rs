//! `gridbase-connector` CLI entry-point.
//!
//! Read-side spot checks against a live deployment:
//! - `bases`   — list bases.
//! - `tables`  — list tables of a base.
//! - `fields`  — list a table's fields.
//! - `search`  — list records of a table.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use client::{pacing, Credentials, FixedInterval, HttpTransport, DEFAULT_API_ENDPOINT};
use node::list::{base_search, field_options, table_search, ViewCache};
use node::record::{search_records, SearchOptions, TableScope};

#[derive(Parser)]
#[command(
    name = "gridbase-connector",
    about = "Gridbase tabular API connector",
    version
)]
struct Cli {
    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct AuthArgs {
    /// API key used as the bearer token.
    #[arg(long, env = "GRIDBASE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// API base URL.
    #[arg(long, env = "GRIDBASE_API_URL", default_value = DEFAULT_API_ENDPOINT)]
    api_url: String,
}

#[derive(Subcommand)]
enum Command {
    /// List bases.
    Bases,
    /// List tables of a base.
    Tables {
        #[arg(long)]
        base: String,
    },
    /// List a table's fields.
    Fields {
        #[arg(long)]
        base: String,
        #[arg(long)]
        table: String,
    },
    /// List records of a table.
    Search {
        #[arg(long)]
        base: String,
        #[arg(long)]
        table: String,
        /// Restrict to a saved view.
        #[arg(long)]
        view: Option<String>,
        /// Stop after this many records.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let transport = HttpTransport::new(Credentials::new(cli.auth.api_key, cli.auth.api_url));

    match cli.command {
        Command::Bases => {
            let page = base_search(&transport, None, None).await?;
            for item in page.results {
                println!("{}\t{}", item.value, item.name);
            }
        }
        Command::Tables { base } => {
            let cache = ViewCache::new();
            let page = table_search(&transport, &cache, &base, None, None).await?;
            for item in page.results {
                println!("{}\t{}", item.value, item.name);
            }
        }
        Command::Fields { base, table } => {
            for option in field_options(&transport, &base, &table).await? {
                println!("{}\t{}\t{}", option.value, option.name, option.description);
            }
        }
        Command::Search {
            base,
            table,
            view,
            limit,
        } => {
            let scope = TableScope::new(base, table)?;
            let options = SearchOptions {
                view_id: view,
                limit,
                ..SearchOptions::default()
            };
            let pacing = FixedInterval(pacing::PAGE_PAUSE);

            let rows = search_records(&transport, &pacing, &scope, &options).await?;
            info!(count = rows.len(), "search complete");

            for row in rows {
                println!(
                    "{}",
                    serde_json::to_string(&row.json).context("serialize record")?
                );
            }
        }
    }

    Ok(())
}
