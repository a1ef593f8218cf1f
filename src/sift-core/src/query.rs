use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Display;

/// Ordered query-string pairs for a GET or DELETE request.
///
/// Unset values are skipped and list values are joined with commas, which is
/// how the server expects array parameters on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn push_opt<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push_list<T: Display>(&mut self, key: &str, values: Option<&[T]>) -> &mut Self {
        if let Some(values) = values {
            let joined = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            self.push(key, joined);
        }
        self
    }

    pub fn push_date(&mut self, key: &str, value: Option<DateTime<Utc>>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Types that encode themselves as query-string parameters.
pub trait ToQuery {
    fn to_query(&self) -> QueryPairs;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unset_values_are_skipped() {
        let mut query = QueryPairs::new();
        query
            .push_opt::<u32>("limit", None)
            .push_list::<String>("fields", None)
            .push_date("beforeEnqueuedAt", None);
        assert!(query.is_empty());
    }

    #[test]
    fn test_lists_are_comma_joined() {
        let mut query = QueryPairs::new();
        query.push_list("fields", Some(&["title", "genre", "year"][..]));
        assert_eq!(query.get("fields"), Some("title,genre,year"));
    }

    #[test]
    fn test_dates_use_rfc3339() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let mut query = QueryPairs::new();
        query.push_date("afterFinishedAt", Some(date));
        assert_eq!(query.get("afterFinishedAt"), Some("2024-03-01T12:30:00Z"));
    }

    #[test]
    fn test_order_is_preserved() {
        let mut query = QueryPairs::new();
        query.push("b", 2).push("a", 1);
        let keys: Vec<_> = query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
