use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Settings is the full settings object of an index.
///
/// Every field is optional so the same type serves as a partial update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_rules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable_attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayed_attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable_attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable_attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typo_tolerance: Option<TypoTolerance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faceting: Option<Faceting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_tokens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_separator_tokens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity_precision: Option<ProximityPrecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_cutoff_ms: Option<u64>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ranking_rules<S: Into<String>>(mut self, rules: impl IntoIterator<Item = S>) -> Self {
        self.ranking_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_distinct_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.distinct_attribute = Some(attribute.into());
        self
    }

    pub fn with_searchable_attributes<S: Into<String>>(
        mut self,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.searchable_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filterable_attributes<S: Into<String>>(
        mut self,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.filterable_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sortable_attributes<S: Into<String>>(
        mut self,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.sortable_attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_stop_words<S: Into<String>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.stop_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_synonyms(mut self, synonyms: HashMap<String, Vec<String>>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypoTolerance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_word_size_for_typos: Option<MinWordSizeForTypos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_on_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_on_attributes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MinWordSizeForTypos {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_typo: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_typos: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Faceting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_values_per_facet: Option<u64>,
    /// Facet name (or `*`) to `alpha` or `count`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_facet_values_by: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_hits: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProximityPrecision {
    ByWord,
    ByAttribute,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_update_omits_unset_fields() {
        let settings = Settings::new()
            .with_stop_words(["a", "the"])
            .with_filterable_attributes(["genre"]);
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({ "stopWords": ["a", "the"], "filterableAttributes": ["genre"] })
        );
    }

    #[test]
    fn test_parse_server_settings() {
        let settings: Settings = serde_json::from_value(json!({
            "displayedAttributes": ["*"],
            "searchableAttributes": ["*"],
            "filterableAttributes": [],
            "sortableAttributes": [],
            "rankingRules": ["words", "typo", "proximity", "attribute", "sort", "exactness"],
            "stopWords": [],
            "nonSeparatorTokens": [],
            "separatorTokens": [],
            "dictionary": [],
            "synonyms": {},
            "distinctAttribute": null,
            "proximityPrecision": "byWord",
            "typoTolerance": {
                "enabled": true,
                "minWordSizeForTypos": { "oneTypo": 5, "twoTypos": 9 },
                "disableOnWords": [],
                "disableOnAttributes": []
            },
            "faceting": { "maxValuesPerFacet": 100, "sortFacetValuesBy": { "*": "alpha" } },
            "pagination": { "maxTotalHits": 1000 },
            "searchCutoffMs": null
        }))
        .unwrap();

        assert_eq!(settings.distinct_attribute, None);
        assert_eq!(settings.proximity_precision, Some(ProximityPrecision::ByWord));
        assert_eq!(
            settings.typo_tolerance.unwrap().min_word_size_for_typos.unwrap().two_typos,
            Some(9)
        );
        assert_eq!(settings.pagination.unwrap().max_total_hits, Some(1000));
        assert_eq!(settings.stop_words, Some(vec![]));
    }
}
