use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Filter accepted by search and document deletion.
///
/// The array form combines clauses with AND; a nested array combines its
/// expressions with OR. Only the expression form can travel on a query string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Filter {
    Expression(String),
    Array(Vec<FilterClause>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FilterClause {
    Expression(String),
    AnyOf(Vec<String>),
}

impl Filter {
    pub fn as_expression(&self) -> Option<&str> {
        match self {
            Filter::Expression(expr) => Some(expr),
            Filter::Array(_) => None,
        }
    }
}

impl From<&str> for Filter {
    fn from(expr: &str) -> Self {
        Filter::Expression(expr.to_string())
    }
}

impl From<String> for Filter {
    fn from(expr: String) -> Self {
        Filter::Expression(expr)
    }
}

impl From<Vec<FilterClause>> for Filter {
    fn from(clauses: Vec<FilterClause>) -> Self {
        Filter::Array(clauses)
    }
}

impl From<Vec<&str>> for Filter {
    fn from(clauses: Vec<&str>) -> Self {
        Filter::Array(clauses.into_iter().map(FilterClause::from).collect())
    }
}

impl From<&str> for FilterClause {
    fn from(expr: &str) -> Self {
        FilterClause::Expression(expr.to_string())
    }
}

impl From<Vec<&str>> for FilterClause {
    fn from(exprs: Vec<&str>) -> Self {
        FilterClause::AnyOf(exprs.into_iter().map(str::to_string).collect())
    }
}

/// MatchingStrategy controls which query terms a document must contain
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchingStrategy {
    All,
    Last,
    Frequency,
}

impl MatchingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchingStrategy::All => "all",
            MatchingStrategy::Last => "last",
            MatchingStrategy::Frequency => "frequency",
        }
    }
}

/// SearchParams represents a search query against one index
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits_per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_retrieve: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_crop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_highlight: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_pre_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_post_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_matches_position: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_ranking_score: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_strategy: Option<MatchingStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_search_on: Option<Vec<String>>,
}

fn to_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Option<Vec<String>> {
    Some(values.into_iter().map(Into::into).collect())
}

impl SearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_hits_per_page(mut self, hits_per_page: u32) -> Self {
        self.hits_per_page = Some(hits_per_page);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort<S: Into<String>>(mut self, sort: impl IntoIterator<Item = S>) -> Self {
        self.sort = to_strings(sort);
        self
    }

    pub fn with_facets<S: Into<String>>(mut self, facets: impl IntoIterator<Item = S>) -> Self {
        self.facets = to_strings(facets);
        self
    }

    pub fn with_attributes_to_retrieve<S: Into<String>>(
        mut self,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.attributes_to_retrieve = to_strings(attributes);
        self
    }

    pub fn with_attributes_to_crop<S: Into<String>>(
        mut self,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.attributes_to_crop = to_strings(attributes);
        self
    }

    pub fn with_crop_length(mut self, crop_length: u32) -> Self {
        self.crop_length = Some(crop_length);
        self
    }

    pub fn with_crop_marker(mut self, marker: impl Into<String>) -> Self {
        self.crop_marker = Some(marker.into());
        self
    }

    pub fn with_attributes_to_highlight<S: Into<String>>(
        mut self,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.attributes_to_highlight = to_strings(attributes);
        self
    }

    pub fn with_highlight_tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.highlight_pre_tag = Some(pre.into());
        self.highlight_post_tag = Some(post.into());
        self
    }

    pub fn with_show_matches_position(mut self, show: bool) -> Self {
        self.show_matches_position = Some(show);
        self
    }

    pub fn with_show_ranking_score(mut self, show: bool) -> Self {
        self.show_ranking_score = Some(show);
        self
    }

    pub fn with_matching_strategy(mut self, strategy: MatchingStrategy) -> Self {
        self.matching_strategy = Some(strategy);
        self
    }

    /// Restrict matching to these attributes instead of every searchable one
    pub fn with_attributes_to_search_on<S: Into<String>>(
        mut self,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.attributes_to_search_on = to_strings(attributes);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FacetStats {
    pub min: f64,
    pub max: f64,
}

/// SearchResponse represents the search results.
///
/// Offset-based queries fill `offset`, `limit` and `estimated_total_hits`;
/// page-based queries fill `page`, `hits_per_page`, `total_hits` and
/// `total_pages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T = serde_json::Value> {
    pub hits: Vec<T>,
    #[serde(default)]
    pub query: String,
    pub processing_time_ms: u64,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub estimated_total_hits: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub hits_per_page: Option<u32>,
    #[serde(default)]
    pub total_hits: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub facet_distribution: Option<HashMap<String, HashMap<String, u64>>>,
    #[serde(default)]
    pub facet_stats: Option<HashMap<String, FacetStats>>,
}

/// One query of a multi-search request
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexSearchQuery {
    pub index_uid: String,
    #[serde(flatten)]
    pub params: SearchParams,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MultiSearchQuery {
    pub queries: Vec<IndexSearchQuery>,
}

impl MultiSearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, index_uid: impl Into<String>, params: SearchParams) -> Self {
        self.queries.push(IndexSearchQuery {
            index_uid: index_uid.into(),
            params,
        });
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSearchResponse<T = serde_json::Value> {
    pub index_uid: String,
    #[serde(flatten)]
    pub response: SearchResponse<T>,
}

/// Results are in the same order as the submitted queries
#[derive(Debug, Clone, Deserialize)]
pub struct MultiSearchResponse<T = serde_json::Value> {
    pub results: Vec<IndexSearchResponse<T>>,
}
