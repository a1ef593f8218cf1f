use serde::de::DeserializeOwned;

use crate::index::Index;
use crate::{ClientError, Result};
use sift_core::{QueryPairs, SearchParams, SearchResponse};

/// Encode search parameters for a GET request.
///
/// Array parameters are comma-joined. The query string can only carry a
/// filter expression, so an array filter is rejected here, before any request
/// is built.
pub(crate) fn search_get_query(params: &SearchParams) -> Result<QueryPairs> {
    let filter = match &params.filter {
        Some(filter) => Some(filter.as_expression().ok_or_else(|| {
            ClientError::Validation(
                "GET search only accepts a string filter; use POST search for array filters"
                    .to_string(),
            )
        })?),
        None => None,
    };

    let mut query = QueryPairs::new();
    query
        .push_opt("q", params.q.as_deref())
        .push_opt("offset", params.offset)
        .push_opt("limit", params.limit)
        .push_opt("page", params.page)
        .push_opt("hitsPerPage", params.hits_per_page)
        .push_opt("filter", filter)
        .push_list("sort", params.sort.as_deref())
        .push_list("facets", params.facets.as_deref())
        .push_list("attributesToRetrieve", params.attributes_to_retrieve.as_deref())
        .push_list("attributesToCrop", params.attributes_to_crop.as_deref())
        .push_opt("cropLength", params.crop_length)
        .push_opt("cropMarker", params.crop_marker.as_deref())
        .push_list("attributesToHighlight", params.attributes_to_highlight.as_deref())
        .push_opt("highlightPreTag", params.highlight_pre_tag.as_deref())
        .push_opt("highlightPostTag", params.highlight_post_tag.as_deref())
        .push_opt("showMatchesPosition", params.show_matches_position)
        .push_opt("showRankingScore", params.show_ranking_score)
        .push_opt("matchingStrategy", params.matching_strategy.map(|s| s.as_str()))
        .push_list("attributesToSearchOn", params.attributes_to_search_on.as_deref());

    Ok(query)
}

impl Index {
    /// Search with a POST request; every parameter travels as native JSON
    pub async fn search<T: DeserializeOwned>(&self, params: &SearchParams) -> Result<SearchResponse<T>> {
        self.http
            .post(&self.path("search"), &QueryPairs::new(), params)
            .await
    }

    /// Search with a GET request. Fails with [`ClientError::Validation`]
    /// when `params.filter` is an array.
    pub async fn search_get<T: DeserializeOwned>(
        &self,
        params: &SearchParams,
    ) -> Result<SearchResponse<T>> {
        let query = search_get_query(params)?;
        self.http.get(&self.path("search"), &query).await
    }
}
