use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::index::Index;
use crate::Result;
use sift_core::{
    EnqueuedTask, Faceting, PaginationSettings, ProximityPrecision, QueryPairs, Settings,
    TypoTolerance,
};

/// How an update replaces the stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    /// Overwrite the whole value (lists are never appended to)
    Put,
    /// Merge the given fields into the stored object
    Patch,
}

/// One entry of the settings table: where a setting lives, how it is
/// updated and what it holds.
pub trait SettingKind {
    const PATH: &'static str;
    const UPDATE: UpdateVerb;
    type Value: Serialize + DeserializeOwned + Send + Sync;
}

/// Read, overwrite and restore-default access to one setting of an index
pub struct Setting<'a, S: SettingKind> {
    index: &'a Index,
    _kind: PhantomData<S>,
}

impl<'a, S: SettingKind> Setting<'a, S> {
    fn path(&self) -> String {
        self.index.path(&format!("settings/{}", S::PATH))
    }

    pub async fn get(&self) -> Result<S::Value> {
        self.index.http.get(&self.path(), &QueryPairs::new()).await
    }

    pub async fn update(&self, value: &S::Value) -> Result<EnqueuedTask> {
        let path = self.path();
        match S::UPDATE {
            UpdateVerb::Put => self.index.http.put(&path, &QueryPairs::new(), value).await,
            UpdateVerb::Patch => self.index.http.patch(&path, &QueryPairs::new(), value).await,
        }
    }

    /// Restore the server default, which is not always empty
    pub async fn reset(&self) -> Result<EnqueuedTask> {
        self.index.http.delete(&self.path(), &QueryPairs::new()).await
    }
}

macro_rules! settings_table {
    ($($marker:ident, $accessor:ident => $path:literal, $verb:ident, $value:ty;)*) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub enum $marker {}

            impl SettingKind for $marker {
                const PATH: &'static str = $path;
                const UPDATE: UpdateVerb = UpdateVerb::$verb;
                type Value = $value;
            }
        )*

        impl Index {
            $(
                pub fn $accessor(&self) -> Setting<'_, $marker> {
                    self.setting::<$marker>()
                }
            )*
        }
    };
}

settings_table! {
    RankingRules, ranking_rules => "ranking-rules", Put, Vec<String>;
    DistinctAttribute, distinct_attribute => "distinct-attribute", Put, Option<String>;
    SearchableAttributes, searchable_attributes => "searchable-attributes", Put, Vec<String>;
    DisplayedAttributes, displayed_attributes => "displayed-attributes", Put, Vec<String>;
    FilterableAttributes, filterable_attributes => "filterable-attributes", Put, Vec<String>;
    SortableAttributes, sortable_attributes => "sortable-attributes", Put, Vec<String>;
    StopWords, stop_words => "stop-words", Put, Vec<String>;
    Synonyms, synonyms => "synonyms", Put, HashMap<String, Vec<String>>;
    SeparatorTokens, separator_tokens => "separator-tokens", Put, Vec<String>;
    NonSeparatorTokens, non_separator_tokens => "non-separator-tokens", Put, Vec<String>;
    Dictionary, dictionary => "dictionary", Put, Vec<String>;
    ProximityPrecisionSetting, proximity_precision => "proximity-precision", Put, ProximityPrecision;
    SearchCutoffMs, search_cutoff_ms => "search-cutoff-ms", Put, Option<u64>;
    TypoToleranceSetting, typo_tolerance => "typo-tolerance", Patch, TypoTolerance;
    FacetingSetting, faceting => "faceting", Patch, Faceting;
    PaginationSetting, pagination => "pagination", Patch, PaginationSettings;
}

impl Index {
    /// Generic access to any setting in the table
    pub fn setting<S: SettingKind>(&self) -> Setting<'_, S> {
        Setting {
            index: self,
            _kind: PhantomData,
        }
    }

    pub async fn get_settings(&self) -> Result<Settings> {
        self.http.get(&self.path("settings"), &QueryPairs::new()).await
    }

    /// Partial update: only the fields set in `settings` change
    pub async fn update_settings(&self, settings: &Settings) -> Result<EnqueuedTask> {
        self.http
            .patch(&self.path("settings"), &QueryPairs::new(), settings)
            .await
    }

    pub async fn reset_settings(&self) -> Result<EnqueuedTask> {
        self.http
            .delete(&self.path("settings"), &QueryPairs::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        client, enqueued_json, json_response, task_json, task_uid_from_path, MockTransport,
    };
    use reqwest::Method;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Keeps one stored stop-word list and applies updates when their task
    /// is looked up, like the server does asynchronously.
    fn stop_words_server() -> std::sync::Arc<MockTransport> {
        let stored: Mutex<Value> = Mutex::new(json!([]));
        let pending: Mutex<Option<Value>> = Mutex::new(None);

        MockTransport::new(move |request| {
            if task_uid_from_path(request).is_some() {
                if let Some(value) = pending.lock().unwrap().take() {
                    *stored.lock().unwrap() = value;
                }
                return Ok(json_response(200, task_json(1, "succeeded")));
            }

            assert_eq!(request.url.path(), "/indexes/movies/settings/stop-words");
            let body = match request.method.as_str() {
                "GET" => stored.lock().unwrap().clone(),
                "PUT" => {
                    let value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                    *pending.lock().unwrap() = Some(value);
                    enqueued_json(1, "settingsUpdate")
                }
                "DELETE" => {
                    *pending.lock().unwrap() = Some(json!([]));
                    enqueued_json(1, "settingsUpdate")
                }
                other => panic!("unexpected method {}", other),
            };
            Ok(json_response(200, body))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_words_round_trip() {
        let transport = stop_words_server();
        let client = client(transport.clone());
        let index = client.index("movies");

        let words = vec!["a".to_string(), "the".to_string()];
        let task = index.stop_words().update(&words).await.unwrap();
        client.wait_for_task(&task, None).await.unwrap();
        assert_eq!(index.stop_words().get().await.unwrap(), words);

        let task = index.stop_words().reset().await.unwrap();
        client.wait_for_task(&task, None).await.unwrap();
        assert!(index.stop_words().get().await.unwrap().is_empty());

        assert_eq!(
            transport.count(Method::PUT, "/indexes/movies/settings/stop-words"),
            1
        );
        assert_eq!(
            transport.count(Method::DELETE, "/indexes/movies/settings/stop-words"),
            1
        );
    }

    #[tokio::test]
    async fn test_list_settings_overwrite_with_put() {
        let transport =
            MockTransport::new(|_| Ok(json_response(202, enqueued_json(2, "settingsUpdate"))));
        let index = client(transport.clone()).index("movies");

        index
            .filterable_attributes()
            .update(&vec!["genre".to_string()])
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(
            request.url.path(),
            "/indexes/movies/settings/filterable-attributes"
        );
        assert_eq!(request.body.as_deref(), Some(r#"["genre"]"#));
    }

    #[tokio::test]
    async fn test_object_settings_patch() {
        let transport =
            MockTransport::new(|_| Ok(json_response(202, enqueued_json(3, "settingsUpdate"))));
        let index = client(transport.clone()).index("movies");

        index
            .typo_tolerance()
            .update(&TypoTolerance {
                enabled: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url.path(), "/indexes/movies/settings/typo-tolerance");
        assert_eq!(request.body.as_deref(), Some(r#"{"enabled":false}"#));
    }

    #[tokio::test]
    async fn test_nullable_setting() {
        let transport = MockTransport::new(|_| Ok(json_response(200, Value::Null)));
        let index = client(transport).index("movies");

        assert_eq!(index.distinct_attribute().get().await.unwrap(), None);
        assert_eq!(index.search_cutoff_ms().get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_generic_accessor_matches_named() {
        let transport = MockTransport::new(|_| {
            Ok(json_response(200, json!({ "wolverine": ["xmen", "logan"] })))
        });
        let index = client(transport.clone()).index("movies");

        let synonyms = index.setting::<Synonyms>().get().await.unwrap();
        assert_eq!(synonyms["wolverine"], vec!["xmen", "logan"]);
        assert_eq!(
            transport.last_request().url.path(),
            "/indexes/movies/settings/synonyms"
        );
    }

    #[tokio::test]
    async fn test_whole_settings_use_patch() {
        let transport =
            MockTransport::new(|_| Ok(json_response(202, enqueued_json(4, "settingsUpdate"))));
        let index = client(transport.clone()).index("movies");

        index
            .update_settings(&Settings::new().with_sortable_attributes(["year"]))
            .await
            .unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.body.as_deref(), Some(r#"{"sortableAttributes":["year"]}"#));

        index.reset_settings().await.unwrap();
        assert_eq!(transport.count(Method::DELETE, "/indexes/movies/settings"), 1);
    }
}
