//! Sift Client Library
//!
//! Async HTTP client for a remote search engine. Every mutating call returns
//! an [`EnqueuedTask`] immediately; [`TaskClient::wait_for_task`] polls the
//! server until that task reaches a terminal status.
//!
//! ```rust,no_run
//! use sift_rs::{Client, SearchParams};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new("http://localhost:7700", Some("masterKey"))?;
//!     let movies = client.index("movies");
//!
//!     let task = movies
//!         .add_documents(&[json!({ "id": 1, "title": "Carol" })], Some("id"))
//!         .await?;
//!     client.wait_for_task(&task, None).await?;
//!
//!     let results = movies.search::<serde_json::Value>(&SearchParams::new("carol")).await?;
//!     println!("{} hits", results.hits.len());
//!     Ok(())
//! }
//! ```

mod client;
mod documents;
mod index;
mod keys;
mod request;
mod search;
mod settings;
mod tasks;

#[cfg(test)]
mod test_support;

use std::time::Duration;

pub use client::Client;
pub use index::Index;
pub use request::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use settings::{
    Dictionary, DistinctAttribute, DisplayedAttributes, FacetingSetting, FilterableAttributes,
    NonSeparatorTokens, PaginationSetting, ProximityPrecisionSetting, RankingRules,
    SearchCutoffMs, SearchableAttributes, SeparatorTokens, Setting, SettingKind,
    SortableAttributes, StopWords, Synonyms, TypoToleranceSetting, UpdateVerb,
};
pub use sift_core::*;
pub use tasks::TaskClient;

/// ApiError is a rejection reported by the server, surfaced verbatim
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (status {status}, code {code})")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
    pub error_type: String,
    pub link: Option<String>,
}

impl ApiError {
    pub(crate) fn from_response(status: u16, body: ErrorResponse) -> Self {
        Self {
            status,
            code: body.code,
            message: body.message,
            error_type: body.error_type,
            link: body.link,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("HTTP request failed: {message}")]
    Transport { message: String },

    #[error("Server error: {0}")]
    Api(#[from] ApiError),

    /// The request was rejected before anything was sent
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(
        "Task {} still {} after {:?} (timeout {:?})",
        .task.uid, .task.status, .elapsed, .timeout
    )]
    TaskTimeout {
        task: Box<Task>,
        elapsed: Duration,
        timeout: Duration,
    },

    /// A request body could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A successful response whose body does not have the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Server error code, when the server rejected the request
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api(err) => Some(&err.code),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::TaskTimeout { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
