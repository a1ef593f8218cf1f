use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::index::Index;
use crate::{ClientError, Result};
use sift_core::{
    DocumentFormat, DocumentOptions, DocumentsQuery, DocumentsResults, EnqueuedTask, Filter,
    QueryPairs, ToQuery,
};

#[derive(Serialize)]
struct DeleteByFilterRequest<'a> {
    filter: &'a Filter,
}

fn primary_key_query(primary_key: Option<&str>) -> QueryPairs {
    let mut query = QueryPairs::new();
    query.push_opt("primaryKey", primary_key);
    query
}

impl Index {
    pub async fn get_documents<T: DeserializeOwned>(
        &self,
        query: &DocumentsQuery,
    ) -> Result<DocumentsResults<T>> {
        self.http
            .get(&self.path("documents"), &query.to_query())
            .await
    }

    /// Get one document, optionally restricted to `fields`
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        id: &str,
        fields: Option<&[&str]>,
    ) -> Result<T> {
        let mut query = QueryPairs::new();
        query.push_list("fields", fields);
        self.http
            .get(&self.path(&format!("documents/{}", id)), &query)
            .await
    }

    /// Add documents, replacing any existing document with the same id
    pub async fn add_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<EnqueuedTask> {
        self.http
            .post(
                &self.path("documents"),
                &primary_key_query(primary_key),
                documents,
            )
            .await
    }

    /// Add or update documents, merging fields into existing documents
    pub async fn update_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<EnqueuedTask> {
        self.http
            .put(
                &self.path("documents"),
                &primary_key_query(primary_key),
                documents,
            )
            .await
    }

    /// Add documents from an already encoded JSON, NDJSON or CSV payload.
    /// The payload is sent as-is.
    pub async fn add_documents_from_str(
        &self,
        payload: impl Into<String>,
        format: DocumentFormat,
        options: &DocumentOptions,
    ) -> Result<EnqueuedTask> {
        self.http
            .send_raw(
                Method::POST,
                &self.path("documents"),
                &options.to_query(),
                payload.into(),
                format.content_type(),
            )
            .await
    }

    pub async fn update_documents_from_str(
        &self,
        payload: impl Into<String>,
        format: DocumentFormat,
        options: &DocumentOptions,
    ) -> Result<EnqueuedTask> {
        self.http
            .send_raw(
                Method::PUT,
                &self.path("documents"),
                &options.to_query(),
                payload.into(),
                format.content_type(),
            )
            .await
    }

    /// Add documents in chunks of `batch_size` (the configured batch size
    /// when `None`), one request per chunk, sent one after another.
    ///
    /// Returns one task per chunk, in chunk order. Chunks are independent
    /// tasks: if a later chunk fails, earlier chunks stay ingested.
    pub async fn add_documents_in_batches<T: Serialize>(
        &self,
        documents: &[T],
        batch_size: Option<usize>,
        primary_key: Option<&str>,
    ) -> Result<Vec<EnqueuedTask>> {
        let batch_size = self.resolve_batch_size(batch_size)?;
        let mut tasks = Vec::with_capacity(documents.len().div_ceil(batch_size));

        for chunk in documents.chunks(batch_size) {
            tasks.push(self.add_documents(chunk, primary_key).await?);
        }

        tracing::debug!(index = %self.uid(), batches = tasks.len(), "Documents enqueued in batches");
        Ok(tasks)
    }

    /// Batched form of [`update_documents`](Self::update_documents), with the
    /// same ordering and partial-ingestion semantics as
    /// [`add_documents_in_batches`](Self::add_documents_in_batches).
    pub async fn update_documents_in_batches<T: Serialize>(
        &self,
        documents: &[T],
        batch_size: Option<usize>,
        primary_key: Option<&str>,
    ) -> Result<Vec<EnqueuedTask>> {
        let batch_size = self.resolve_batch_size(batch_size)?;
        let mut tasks = Vec::with_capacity(documents.len().div_ceil(batch_size));

        for chunk in documents.chunks(batch_size) {
            tasks.push(self.update_documents(chunk, primary_key).await?);
        }

        tracing::debug!(index = %self.uid(), batches = tasks.len(), "Documents updated in batches");
        Ok(tasks)
    }

    fn resolve_batch_size(&self, batch_size: Option<usize>) -> Result<usize> {
        match batch_size.unwrap_or(self.batch_size) {
            0 => Err(ClientError::Validation(
                "batch size must be greater than zero".to_string(),
            )),
            size => Ok(size),
        }
    }

    pub async fn delete_document(&self, id: &str) -> Result<EnqueuedTask> {
        self.http
            .delete(&self.path(&format!("documents/{}", id)), &QueryPairs::new())
            .await
    }

    pub async fn delete_documents<I: Serialize>(&self, ids: &[I]) -> Result<EnqueuedTask> {
        self.http
            .post(&self.path("documents/delete-batch"), &QueryPairs::new(), ids)
            .await
    }

    pub async fn delete_documents_by_filter(&self, filter: impl Into<Filter>) -> Result<EnqueuedTask> {
        let filter = filter.into();
        self.http
            .post(
                &self.path("documents/delete"),
                &QueryPairs::new(),
                &DeleteByFilterRequest { filter: &filter },
            )
            .await
    }

    pub async fn delete_all_documents(&self) -> Result<EnqueuedTask> {
        self.http
            .delete(&self.path("documents"), &QueryPairs::new())
            .await
    }
}
