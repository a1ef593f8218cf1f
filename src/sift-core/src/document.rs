use serde::{Deserialize, Serialize};

use crate::query::{QueryPairs, ToQuery};

/// Default number of documents per request for batched ingestion
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// DocumentFormat selects the content type of a raw ingestion payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A JSON array of objects
    Json,
    /// Newline-delimited JSON objects
    Ndjson,
    /// A header row followed by delimited records
    Csv,
}

impl DocumentFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            DocumentFormat::Json => "application/json",
            DocumentFormat::Ndjson => "application/x-ndjson",
            DocumentFormat::Csv => "text/csv",
        }
    }
}

/// Query options for document additions and updates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    pub primary_key: Option<String>,
    /// Only meaningful for CSV payloads
    pub csv_delimiter: Option<char>,
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn with_csv_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = Some(delimiter);
        self
    }
}

impl ToQuery for DocumentOptions {
    fn to_query(&self) -> QueryPairs {
        let mut query = QueryPairs::new();
        query
            .push_opt("primaryKey", self.primary_key.as_deref())
            .push_opt("csvDelimiter", self.csv_delimiter);
        query
    }
}

/// DocumentsQuery paginates and projects a document listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentsQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub fields: Option<Vec<String>>,
    pub filter: Option<String>,
}

impl DocumentsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

impl ToQuery for DocumentsQuery {
    fn to_query(&self) -> QueryPairs {
        let mut query = QueryPairs::new();
        query
            .push_opt("offset", self.offset)
            .push_opt("limit", self.limit)
            .push_list("fields", self.fields.as_deref())
            .push_opt("filter", self.filter.as_deref());
        query
    }
}

/// One page of a document listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResults<T> {
    pub results: Vec<T>,
    pub offset: u32,
    pub limit: u32,
    pub total: u64,
}
