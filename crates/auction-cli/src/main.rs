//! Auctions console client.
//!
//! Thin caller around the service proxy. Tokens are printed, never stored:
//! pass them back with `--token` or `AUCTIONS_TOKEN`.

mod demo;

use anyhow::{Context, Result};
use auction_client::{ClientConfig, Credentials, ServiceProxy, SessionToken};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "auctions")]
#[command(version, about = "Auctions service command line client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Auctions service URL (overrides config file and environment)
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Config file (TOML, JSON or YAML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit only JSON on stdout
    #[arg(short, long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the session token
    Login {
        #[arg(long, env = "AUCTIONS_EMAIL")]
        email: String,

        #[arg(long, env = "AUCTIONS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Invalidate a session token
    Logout {
        #[arg(long, env = "AUCTIONS_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// List all categories
    Categories,
    /// List the articles of a category
    Articles {
        /// Category name
        category: String,

        /// Currency for prices (default: from config)
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Show one article
    Article {
        /// Article ID
        id: i64,

        /// Currency for prices (default: from config)
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Place a bid on an article
    Bid {
        /// Article ID
        id: i64,

        /// Bid amount, in the given currency
        amount: f64,

        #[arg(long, env = "AUCTIONS_TOKEN", hide_env_values = true)]
        token: String,

        /// Currency of the amount (default: from config)
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Log in, browse the first category, bid on its first article, log out
    Demo {
        #[arg(long, env = "AUCTIONS_EMAIL")]
        email: String,

        #[arg(long, env = "AUCTIONS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Currency for prices and the bid (default: from config)
        #[arg(short, long)]
        currency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.server_url)?;
    tracing::debug!(base_url = %config.base_url, "Client configuration loaded");

    let proxy = ServiceProxy::new(&config).context("Failed to create service proxy")?;
    let pick_currency = |requested: Option<String>| requested.unwrap_or_else(|| config.default_currency.clone());

    match cli.command {
        Commands::Login { email, password } => {
            let token = proxy
                .login(&Credentials::new(email, password))
                .await
                .context("Login failed")?;
            if cli.json {
                println!("{}", json!({ "token": token.as_str() }));
            } else {
                println!("{}", token.as_str());
            }
        }
        Commands::Logout { token } => {
            proxy
                .logout(&SessionToken::new(token))
                .await
                .context("Logout failed")?;
        }
        Commands::Categories => {
            let categories = proxy
                .list_categories()
                .await
                .context("Failed to load categories")?;
            if cli.json {
                println!("{}", serde_json::to_string(&categories)?);
            } else {
                for category in &categories {
                    println!("{}", category.name);
                }
            }
        }
        Commands::Articles { category, currency: requested } => {
            let currency = pick_currency(requested);
            let articles = proxy
                .list_articles_by_category(&category, &currency)
                .await
                .with_context(|| format!("Failed to load articles of category: {}", category))?;
            if cli.json {
                println!("{}", serde_json::to_string(&articles)?);
            } else {
                for article in &articles {
                    println!(
                        "{:>6}  {}  {:.2} {}  ({} bids)",
                        article.id, article.title, article.current_price, article.currency, article.bids
                    );
                }
            }
        }
        Commands::Article { id, currency: requested } => {
            let currency = pick_currency(requested);
            let article = proxy
                .get_article_details(id, &currency)
                .await
                .with_context(|| format!("Failed to load article {}", id))?;
            if cli.json {
                println!("{}", serde_json::to_string(&article)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&article)?);
            }
        }
        Commands::Bid { id, amount, token, currency: requested } => {
            let currency = pick_currency(requested);
            proxy
                .place_bid(id, amount, &currency, &SessionToken::new(token))
                .await
                .with_context(|| format!("Failed to place bid on article {}", id))?;
            if cli.json {
                println!("{}", json!({ "article_id": id, "amount": amount, "currency": currency }));
            }
        }
        Commands::Demo { email, password, currency: requested } => {
            let currency = pick_currency(requested);
            demo::run(&proxy, Credentials::new(email, password), &currency).await?;
        }
    }

    Ok(())
}

/// Config file from `--config` (or `AUCTIONS_CONFIG`), then environment, then `--server-url`.
fn load_config(path: Option<&PathBuf>, server_url: Option<String>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => {
            let mut config = ClientConfig::from_file(path)?;
            config.apply_env_overrides();
            config
        }
        None => ClientConfig::load()?,
    };

    if let Some(url) = server_url {
        config.base_url = url;
    }

    Ok(config)
}
