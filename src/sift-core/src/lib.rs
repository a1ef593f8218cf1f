//! Sift Core Library
//!
//! Wire models shared by the sift client crate:
//! - Task handles, task snapshots and task filters
//! - Index, document and search payloads
//! - Index settings and API keys
//! - Query-string encoding for GET requests
//! - Client configuration

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod key;
pub mod query;
pub mod search;
pub mod settings;
pub mod task;

// Re-export commonly used types
pub use config::{ClientConfig, WaitConfig};
pub use document::{DocumentFormat, DocumentOptions, DocumentsQuery, DocumentsResults};
pub use error::ErrorResponse;
pub use index::{Health, IndexInfo, IndexStats, IndexSwap, IndexesQuery, IndexesResults, Stats, Version};
pub use key::{Key, KeyCreation, KeyUpdate, KeysQuery, KeysResults};
pub use query::{QueryPairs, ToQuery};
pub use search::{
    FacetStats, Filter, FilterClause, IndexSearchQuery, IndexSearchResponse, MatchingStrategy,
    MultiSearchQuery, MultiSearchResponse, SearchParams, SearchResponse,
};
pub use settings::{
    Faceting, MinWordSizeForTypos, PaginationSettings, ProximityPrecision, Settings, TypoTolerance,
};
pub use task::{
    AsTaskUid, EnqueuedTask, Task, TaskStatus, TaskType, TasksQuery, TasksResults, WaitOptions,
};
