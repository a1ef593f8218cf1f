//! Settings Example
//!
//! Overwrites, reads back and resets list-valued settings.
//!
//! Run with: cargo run --example settings_roundtrip

use sift_rs::{Client, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sift_rs=info")),
        )
        .init();

    let api_key = std::env::var("SIFT_API_KEY").ok();
    let client = Client::new("http://localhost:7700", api_key.as_deref())?;
    let movies = client.index("movies");

    // PUT replaces the whole list
    let words = vec!["a".to_string(), "an".to_string(), "the".to_string()];
    let task = movies.stop_words().update(&words).await?;
    client.wait_for_task(&task, None).await?;
    println!("Stop words: {:?}", movies.stop_words().get().await?);

    let task = movies.stop_words().reset().await?;
    client.wait_for_task(&task, None).await?;
    println!("Stop words after reset: {:?}", movies.stop_words().get().await?);

    // Several settings at once, only the given fields change
    let task = movies
        .update_settings(
            &Settings::new()
                .with_filterable_attributes(["genre", "year"])
                .with_sortable_attributes(["year"]),
        )
        .await?;
    let task = client.wait_for_task(&task, None).await?;
    println!("Settings update finished: {}", task.status);

    let settings = movies.get_settings().await?;
    println!("Ranking rules: {:?}", settings.ranking_rules.unwrap_or_default());

    Ok(())
}
