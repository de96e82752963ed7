use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::providers::CompletionProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub credentials: CredentialStore,
    pub model: String,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        model: String,
        credential: Option<String>,
    ) -> Self {
        Self {
            provider,
            credentials: CredentialStore::new(credential),
            model,
        }
    }
}

/// Holds the API key reused across submissions
///
/// The recommendation core never touches this; it only reports an
/// authentication failure and the HTTP layer clears the stored key.
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new(credential: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(normalize(credential))),
        }
    }

    /// Returns the stored credential, if any
    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    pub async fn is_configured(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Replaces the stored credential; blank values clear it
    pub async fn set(&self, credential: String) {
        *self.inner.write().await = normalize(Some(credential));
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Clears the stored credential only if it is the one that was rejected
    ///
    /// Returns whether anything was cleared.
    pub async fn invalidate(&self, rejected: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.as_deref() == Some(rejected.trim()) {
            *inner = None;
            true
        } else {
            false
        }
    }
}

fn normalize(credential: Option<String>) -> Option<String> {
    credential
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
