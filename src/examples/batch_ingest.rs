//! Batch Ingestion Example
//!
//! Sends a large document set in fixed-size chunks and waits for every chunk.
//! Each chunk is its own task: a failure in one chunk does not roll back the
//! chunks that already succeeded.
//!
//! Run with: cargo run --example batch_ingest

use serde::Serialize;
use sift_rs::{Client, ClientError, TaskStatus, WaitOptions};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Product {
    id: u32,
    name: String,
    price_cents: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sift_rs=debug")),
        )
        .init();

    let api_key = std::env::var("SIFT_API_KEY").ok();
    let client = Client::new("http://localhost:7700", api_key.as_deref())?;
    let products = client.index("products");

    let docs: Vec<Product> = (1..=2_500)
        .map(|id| Product {
            id,
            name: format!("Product #{}", id),
            price_cents: id * 7 % 10_000,
        })
        .collect();

    let tasks = products
        .add_documents_in_batches(&docs, Some(1_000), Some("id"))
        .await?;
    println!("📦 Enqueued {} batches", tasks.len());

    let options = WaitOptions::default()
        .with_timeout(Duration::from_secs(60))
        .with_interval(Duration::from_millis(250));

    match client.wait_for_tasks(&tasks, Some(options)).await {
        Ok(finished) => {
            for task in finished {
                let marker = if task.status == TaskStatus::Succeeded { "✓" } else { "✗" };
                println!("   {} task {} {}", marker, task.uid, task.status);
            }
        }
        Err(ClientError::TaskTimeout { task, elapsed, .. }) => {
            println!(
                "⚠ Stopped waiting after {:?}; task {} was still {}",
                elapsed, task.uid, task.status
            );
        }
        Err(e) => return Err(e.into()),
    }

    let stats = products.get_stats().await?;
    println!("\n📊 {} documents indexed", stats.number_of_documents);

    Ok(())
}
