//! Quickstart Example
//!
//! Creates an index, adds a few documents, waits for indexing and searches.
//!
//! Run with: cargo run --example quickstart
//! (expects a server on http://localhost:7700, key in SIFT_API_KEY)

use serde_json::{json, Value};
use sift_rs::{Client, SearchParams, TaskStatus};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sift_rs=info")),
        )
        .with_target(false)
        .init();

    let api_key = std::env::var("SIFT_API_KEY").ok();
    let client = Client::new("http://localhost:7700", api_key.as_deref())?;

    if !client.is_healthy().await {
        anyhow::bail!("server is not available");
    }
    println!("✅ Server available\n");

    let task = client.create_index("movies", Some("id")).await?;
    let task = client.wait_for_task(&task, None).await?;
    if task.status == TaskStatus::Failed {
        // Usually index_already_exists; keep going
        println!("⚠ Index creation failed: {:?}\n", task.error.map(|e| e.code));
    }

    let movies = client.index("movies");
    let docs = vec![
        json!({ "id": 1, "title": "Carol", "genre": "romance" }),
        json!({ "id": 2, "title": "Wonder Woman", "genre": "action" }),
        json!({ "id": 3, "title": "Life of Pi", "genre": "adventure" }),
    ];
    let task = movies.add_documents(&docs, None).await?;
    println!("📝 Enqueued document addition as task {}", task.task_uid);

    let task = movies.wait_for_task(&task, None).await?;
    println!("   Finished with status {}\n", task.status);

    let results = movies
        .search::<Value>(&SearchParams::new("wonder").with_limit(5))
        .await?;
    println!("🔍 Search results for 'wonder':");
    for (i, hit) in results.hits.iter().enumerate() {
        println!("   {}. {}", i + 1, hit["title"]);
    }

    Ok(())
}
