//! Scripted console walkthrough.
//!
//! Log in, list categories, open the first category, load its first article,
//! outbid it by one unit and log out again.

use anyhow::{Context, Result};
use auction_client::{Article, Credentials, ServiceProxy, Session};

pub async fn run(proxy: &ServiceProxy, credentials: Credentials, currency: &str) -> Result<()> {
    let session = Session::login(proxy, &credentials)
        .await
        .context("Login failed")?;
    tracing::info!(email = %credentials.email, "Login successful");

    let outcome = browse_and_bid(&session, currency).await;
    if let Err(e) = &outcome {
        tracing::error!(error = %format!("{:#}", e), "Exiting due to failure in one of the steps");
    }

    // Log out even when a step failed; the first error wins.
    let logout = session.logout().await.context("Logout failed");
    outcome?;
    logout
}

async fn browse_and_bid(session: &Session<'_>, currency: &str) -> Result<()> {
    let proxy = session.proxy();

    let categories = proxy
        .list_categories()
        .await
        .context("Failed to load categories")?;
    for category in &categories {
        tracing::info!(category = %category.name, "Category");
    }
    let category = categories.first().context("No categories found")?;

    tracing::info!(category = %category.name, "Fetching articles");
    let articles = proxy
        .list_articles_by_category(&category.name, currency)
        .await
        .context("Failed to fetch articles by category")?;
    let first = articles
        .first()
        .with_context(|| format!("No articles found in category: {}", category.name))?;

    let article = proxy
        .get_article_details(first.id, currency)
        .await
        .context("Failed to load article details")?;
    tracing::info!(
        title = %article.title,
        current_price = article.current_price,
        currency = %article.currency,
        bids = article.bids,
        "Article details"
    );

    let amount = next_bid(&article);
    session
        .place_bid(article.id, amount, &article.currency)
        .await
        .context("Failed to place bid")?;
    tracing::info!(
        article_id = article.id,
        amount,
        currency = %article.currency,
        "Bid placed successfully"
    );

    Ok(())
}

/// Smallest bid the walkthrough tries: one unit above the current price.
fn next_bid(article: &Article) -> f64 {
    article.current_price + 1.0
}
