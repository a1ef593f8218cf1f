use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::client::UpdateIndexRequest;
use crate::request::Requester;
use crate::tasks::TaskClient;
use crate::Result;
use sift_core::{
    AsTaskUid, EnqueuedTask, IndexInfo, IndexStats, QueryPairs, Task, TasksQuery, TasksResults,
    WaitOptions,
};

/// Handle on one index.
///
/// `primary_key`, `created_at` and `updated_at` are the last known snapshot.
/// They change only through [`fetch_info`](Self::fetch_info) or
/// [`fetch_primary_key`](Self::fetch_primary_key); clones refresh
/// independently and nothing synchronizes them.
#[derive(Clone)]
pub struct Index {
    uid: String,
    primary_key: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    pub(crate) http: Arc<Requester>,
    pub(crate) tasks: TaskClient,
    pub(crate) batch_size: usize,
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("uid", &self.uid)
            .field("primary_key", &self.primary_key)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl Index {
    pub(crate) fn new(
        uid: String,
        http: Arc<Requester>,
        tasks: TaskClient,
        batch_size: usize,
    ) -> Self {
        Self {
            uid,
            primary_key: None,
            created_at: None,
            updated_at: None,
            http,
            tasks,
            batch_size,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub(crate) fn path(&self, resource: &str) -> String {
        if resource.is_empty() {
            format!("indexes/{}", self.uid)
        } else {
            format!("indexes/{}/{}", self.uid, resource)
        }
    }

    pub(crate) fn apply_info(&mut self, info: IndexInfo) {
        self.primary_key = info.primary_key;
        self.created_at = Some(info.created_at);
        self.updated_at = Some(info.updated_at);
    }

    pub async fn get_raw_info(&self) -> Result<IndexInfo> {
        self.http.get(&self.path(""), &QueryPairs::new()).await
    }

    /// Refresh the cached snapshot from the server
    pub async fn fetch_info(&mut self) -> Result<&Self> {
        let info = self.get_raw_info().await?;
        self.apply_info(info);
        Ok(self)
    }

    pub async fn fetch_primary_key(&mut self) -> Result<Option<&str>> {
        self.fetch_info().await?;
        Ok(self.primary_key.as_deref())
    }

    /// Set the primary key. The cached snapshot is not touched until the
    /// next refresh.
    pub async fn update(&self, primary_key: &str) -> Result<EnqueuedTask> {
        let body = UpdateIndexRequest { primary_key };
        self.http
            .patch(&self.path(""), &QueryPairs::new(), &body)
            .await
    }

    pub async fn delete(&self) -> Result<EnqueuedTask> {
        self.http.delete(&self.path(""), &QueryPairs::new()).await
    }

    pub async fn get_stats(&self) -> Result<IndexStats> {
        self.http.get(&self.path("stats"), &QueryPairs::new()).await
    }

    /// Tasks of this index only; any `index_uids` in the query is replaced
    pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksResults> {
        let query = query.clone().with_index_uids([self.uid.as_str()]);
        self.tasks.get_tasks(&query).await
    }

    pub async fn get_task(&self, task: impl AsTaskUid) -> Result<Task> {
        self.tasks.get_task(task).await
    }

    pub async fn wait_for_task(
        &self,
        task: impl AsTaskUid,
        options: Option<WaitOptions>,
    ) -> Result<Task> {
        self.tasks.wait_for_task(task, options).await
    }

    pub async fn wait_for_tasks<I>(&self, tasks: I, options: Option<WaitOptions>) -> Result<Vec<Task>>
    where
        I: IntoIterator,
        I::Item: AsTaskUid,
    {
        self.tasks.wait_for_tasks(tasks, options).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{client, enqueued_json, json_response, MockTransport};
    use reqwest::Method;
    use serde_json::{json, Value};
    use sift_core::TasksQuery;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_handle_makes_no_request() {
        let transport = MockTransport::new(|_| Ok(json_response(200, json!({}))));
        let index = client(transport.clone()).index("movies");

        assert_eq!(index.uid(), "movies");
        assert_eq!(index.primary_key(), None);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_info_refreshes_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let transport = MockTransport::new(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let primary_key = if n == 0 { Value::Null } else { json!("isbn") };
            Ok(json_response(
                200,
                json!({
                    "uid": "books",
                    "primaryKey": primary_key,
                    "createdAt": "2024-01-01T00:00:00Z",
                    "updatedAt": format!("2024-01-0{}T00:00:00Z", n + 1)
                }),
            ))
        });
        let mut index = client(transport).index("books");

        index.fetch_info().await.unwrap();
        assert_eq!(index.primary_key(), None);
        let first_update = index.updated_at().unwrap();

        assert_eq!(index.fetch_primary_key().await.unwrap(), Some("isbn"));
        assert!(index.updated_at().unwrap() > first_update);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_leaves_snapshot_alone() {
        let transport =
            MockTransport::new(|_| Ok(json_response(202, enqueued_json(2, "indexUpdate"))));
        let index = client(transport.clone()).index("movies");

        index.update("movie_id").await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.body.as_deref(), Some(r#"{"primaryKey":"movie_id"}"#));
        assert_eq!(index.primary_key(), None);
    }

    #[tokio::test]
    async fn test_index_tasks_are_scoped() {
        let transport = MockTransport::new(|_| {
            Ok(json_response(200, json!({ "results": [], "limit": 20, "from": null, "next": null })))
        });
        let index = client(transport.clone()).index("movies");

        index
            .get_tasks(&TasksQuery::new().with_index_uids(["books"]))
            .await
            .unwrap();

        assert_eq!(transport.last_request().url.query(), Some("indexUids=movies"));
    }

    #[tokio::test]
    async fn test_stats_path() {
        let transport = MockTransport::new(|_| {
            Ok(json_response(
                200,
                json!({ "numberOfDocuments": 3, "isIndexing": false, "fieldDistribution": {} }),
            ))
        });
        let index = client(transport.clone()).index("movies");

        let stats = index.get_stats().await.unwrap();
        assert_eq!(stats.number_of_documents, 3);
        assert_eq!(transport.last_request().url.path(), "/indexes/movies/stats");
    }
}
