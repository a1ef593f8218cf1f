use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::index::Index;
use crate::request::{ReqwestTransport, Requester, Transport};
use crate::tasks::TaskClient;
use crate::{ClientError, Result};
use sift_core::{
    AsTaskUid, ClientConfig, EnqueuedTask, Health, IndexInfo, IndexSwap, IndexesQuery,
    IndexesResults, MultiSearchQuery, MultiSearchResponse, QueryPairs, Stats, Task, TasksQuery,
    TasksResults, ToQuery, Version, WaitOptions,
};

/// Search engine REST API client.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Clone)]
pub struct Client {
    http: Arc<Requester>,
    tasks: TaskClient,
    config: Arc<ClientConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndexRequest<'a> {
    uid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_key: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateIndexRequest<'a> {
    pub primary_key: &'a str,
}

impl Client {
    /// Create a new client connected to the given host
    pub fn new(host: impl Into<String>, api_key: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::new(host);
        config.api_key = api_key.map(str::to_string);
        Self::from_config(config)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends its requests through a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let http = Arc::new(Requester::new(&config, transport)?);
        let tasks = TaskClient::new(http.clone(), config.wait.options());

        tracing::debug!(host = %config.host, "Client created");

        Ok(Self {
            http,
            tasks,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tasks(&self) -> &TaskClient {
        &self.tasks
    }

    pub(crate) fn http(&self) -> &Requester {
        &self.http
    }

    /// Local handle on an index. No request is made and the index may not
    /// exist yet.
    pub fn index(&self, uid: impl Into<String>) -> Index {
        Index::new(
            uid.into(),
            self.http.clone(),
            self.tasks.clone(),
            self.config.batch_size,
        )
    }

    /// Fetch an index and return a handle with its info already loaded
    pub async fn get_index(&self, uid: impl Into<String>) -> Result<Index> {
        let mut index = self.index(uid);
        index.fetch_info().await?;
        Ok(index)
    }

    pub async fn get_raw_index(&self, uid: &str) -> Result<IndexInfo> {
        self.http
            .get(&format!("indexes/{}", uid), &QueryPairs::new())
            .await
    }

    pub async fn get_indexes(&self, query: &IndexesQuery) -> Result<IndexesResults<Index>> {
        let raw = self.get_raw_indexes(query).await?;
        let results = raw
            .results
            .into_iter()
            .map(|info| {
                let mut index = self.index(info.uid.clone());
                index.apply_info(info);
                index
            })
            .collect();

        Ok(IndexesResults {
            results,
            offset: raw.offset,
            limit: raw.limit,
            total: raw.total,
        })
    }

    pub async fn get_raw_indexes(&self, query: &IndexesQuery) -> Result<IndexesResults<IndexInfo>> {
        self.http.get("indexes", &query.to_query()).await
    }

    pub async fn create_index(&self, uid: &str, primary_key: Option<&str>) -> Result<EnqueuedTask> {
        let body = CreateIndexRequest { uid, primary_key };
        self.http.post("indexes", &QueryPairs::new(), &body).await
    }

    pub async fn update_index(&self, uid: &str, primary_key: &str) -> Result<EnqueuedTask> {
        let body = UpdateIndexRequest { primary_key };
        self.http
            .patch(&format!("indexes/{}", uid), &QueryPairs::new(), &body)
            .await
    }

    pub async fn delete_index(&self, uid: &str) -> Result<EnqueuedTask> {
        self.http
            .delete(&format!("indexes/{}", uid), &QueryPairs::new())
            .await
    }

    /// Delete an index and wait for the deletion to finish.
    ///
    /// Returns `false` when the index did not exist.
    pub async fn delete_index_if_exists(&self, uid: &str) -> Result<bool> {
        match self.get_raw_index(uid).await {
            Ok(_) => {}
            Err(ClientError::Api(err)) if err.code == "index_not_found" => return Ok(false),
            Err(err) => return Err(err),
        }

        let task = self.delete_index(uid).await?;
        let task = self.tasks.wait_for_task(&task, None).await?;
        Ok(task.is_success())
    }

    pub async fn swap_indexes(&self, swaps: &[IndexSwap]) -> Result<EnqueuedTask> {
        self.http.post("swap-indexes", &QueryPairs::new(), swaps).await
    }

    /// Run several searches, possibly on different indexes, in one request
    pub async fn multi_search<T: DeserializeOwned>(
        &self,
        query: &MultiSearchQuery,
    ) -> Result<MultiSearchResponse<T>> {
        self.http.post("multi-search", &QueryPairs::new(), query).await
    }

    pub async fn get_task(&self, task: impl AsTaskUid) -> Result<Task> {
        self.tasks.get_task(task).await
    }

    pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksResults> {
        self.tasks.get_tasks(query).await
    }

    pub async fn cancel_tasks(&self, query: &TasksQuery) -> Result<EnqueuedTask> {
        self.tasks.cancel_tasks(query).await
    }

    pub async fn delete_tasks(&self, query: &TasksQuery) -> Result<EnqueuedTask> {
        self.tasks.delete_tasks(query).await
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

    /// Health check
    pub async fn health(&self) -> Result<Health> {
        self.http.get("health", &QueryPairs::new()).await
    }

    /// `true` when the server answers and reports itself available
    pub async fn is_healthy(&self) -> bool {
        match self.health().await {
            Ok(health) => health.is_available(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        self.http.get("stats", &QueryPairs::new()).await
    }

    pub async fn get_version(&self) -> Result<Version> {
        self.http.get("version", &QueryPairs::new()).await
    }

    pub async fn create_dump(&self) -> Result<EnqueuedTask> {
        self.http.post_empty("dumps", &QueryPairs::new()).await
    }

    pub async fn create_snapshot(&self) -> Result<EnqueuedTask> {
        self.http.post_empty("snapshots", &QueryPairs::new()).await
    }
}
