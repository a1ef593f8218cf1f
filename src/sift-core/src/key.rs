use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::{QueryPairs, ToQuery};

/// Key is an API key with its permissions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub uid: Uuid,
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub actions: Vec<String>,
    pub indexes: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// KeyCreation is the body of a key creation request.
///
/// `expires_at` is always sent; `None` means the key never expires.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyCreation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub actions: Vec<String>,
    pub indexes: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl KeyCreation {
    pub fn new<A, I>(actions: A, indexes: I) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            uid: None,
            name: None,
            description: None,
            actions: actions.into_iter().map(Into::into).collect(),
            indexes: indexes.into_iter().map(Into::into).collect(),
            expires_at: None,
        }
    }

    pub fn with_uid(mut self, uid: Uuid) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// KeyUpdate only touches the mutable, descriptive fields of a key
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeysQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl ToQuery for KeysQuery {
    fn to_query(&self) -> QueryPairs {
        let mut query = QueryPairs::new();
        query
            .push_opt("offset", self.offset)
            .push_opt("limit", self.limit);
        query
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysResults {
    pub results: Vec<Key>,
    pub offset: u32,
    pub limit: u32,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_creation_always_sends_expiry() {
        let body = serde_json::to_value(
            KeyCreation::new(["search"], ["movies"]).with_name("search-only"),
        )
        .unwrap();
        assert_eq!(
            body,
            json!({
                "name": "search-only",
                "actions": ["search"],
                "indexes": ["movies"],
                "expiresAt": null
            })
        );
    }

    #[test]
    fn test_parse_key() {
        let key: Key = serde_json::from_value(json!({
            "name": null,
            "description": "Manage documents",
            "key": "d0552b41536279a0ad88bd595327b96f01176a60c2243e906c52ac02375f9bc4",
            "uid": "6062abda-a5aa-4414-ac91-ecd7944c0f8d",
            "actions": ["documents.add", "documents.delete"],
            "indexes": ["*"],
            "expiresAt": null,
            "createdAt": "2021-08-12T10:00:00Z",
            "updatedAt": "2021-08-12T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(key.uid.to_string(), "6062abda-a5aa-4414-ac91-ecd7944c0f8d");
        assert_eq!(key.name, None);
        assert_eq!(key.actions.len(), 2);
    }
}
