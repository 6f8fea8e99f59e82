use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use hemolink_core::{TokenKey, TokenStore};
use secrecy::Secret;

/// Volatile token storage. The session ends with the process.
#[derive(Default, Clone)]
pub struct HashMapTokenStore {
    entries: Arc<RwLock<HashMap<TokenKey, Secret<String>>>>,
}

impl HashMapTokenStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl TokenStore for HashMapTokenStore {
    async fn set(&self, key: TokenKey, value: Secret<String>) {
        self.entries.write().await.insert(key, value);
    }

    async fn get(&self, key: TokenKey) -> Option<Secret<String>> {
        self.entries.read().await.get(&key).cloned()
    }

    async fn clear(&self, keys: &[TokenKey]) {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
    }
}
