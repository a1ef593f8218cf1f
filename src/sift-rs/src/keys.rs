use crate::client::Client;
use crate::Result;
use sift_core::{Key, KeyCreation, KeyUpdate, KeysQuery, KeysResults, QueryPairs, ToQuery};

// Key operations are synchronous on the server: no task is involved.
impl Client {
    pub async fn get_keys(&self, query: &KeysQuery) -> Result<KeysResults> {
        self.http().get("keys", &query.to_query()).await
    }

    /// Look a key up by its uid or by the key itself
    pub async fn get_key(&self, uid_or_key: &str) -> Result<Key> {
        self.http()
            .get(&format!("keys/{}", uid_or_key), &QueryPairs::new())
            .await
    }

    pub async fn create_key(&self, key: &KeyCreation) -> Result<Key> {
        self.http().post("keys", &QueryPairs::new(), key).await
    }

    pub async fn update_key(&self, uid_or_key: &str, update: &KeyUpdate) -> Result<Key> {
        self.http()
            .patch(&format!("keys/{}", uid_or_key), &QueryPairs::new(), update)
            .await
    }

    pub async fn delete_key(&self, uid_or_key: &str) -> Result<()> {
        self.http()
            .delete(&format!("keys/{}", uid_or_key), &QueryPairs::new())
            .await
    }
}
