use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use hemolink_core::{TokenKey, TokenStore};
use secrecy::{ExposeSecret, Secret};

/// Token storage that survives restarts: a small JSON document keyed by
/// `accessToken`, `refreshToken` and `userId`.
///
/// Entries are cached in memory; every change rewrites the whole file.
/// Write failures are logged and otherwise ignored.
#[derive(Clone)]
pub struct FileTokenStore {
    path: Arc<PathBuf>,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileTokenStore {
    /// Open the store at `path`. A missing or unreadable file yields an
    /// empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load(&path).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "discarding unreadable token file");
                BTreeMap::new()
            }
        };

        Self {
            path: Arc::new(path),
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) {
        if let Err(error) = save(&self.path, entries).await {
            tracing::warn!(path = %self.path.display(), %error, "failed to persist tokens");
        }
    }
}

async fn load(path: &Path) -> io::Result<BTreeMap<String, String>> {
    let raw = tokio::fs::read(path).await?;
    serde_json::from_slice(&raw).map_err(io::Error::other)
}

async fn save(path: &Path, entries: &BTreeMap<String, String>) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;

    // Replace atomically so a crash never leaves a half-written file.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await?;
    restrict_permissions(&tmp).await?;
    tokio::fs::rename(&tmp, path).await
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn set(&self, key: TokenKey, value: Secret<String>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.as_str().to_string(), value.expose_secret().clone());
        self.persist(&entries).await;
    }

    async fn get(&self, key: TokenKey) -> Option<Secret<String>> {
        self.entries
            .read()
            .await
            .get(key.as_str())
            .map(|value| Secret::new(value.clone()))
    }

    async fn clear(&self, keys: &[TokenKey]) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        for key in keys {
            entries.remove(key.as_str());
        }
        if entries.len() != before {
            self.persist(&entries).await;
        }
    }
}
