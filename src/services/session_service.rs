use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

/// Supplies the identity that namespaces per-user storage. Never fails;
/// `None` means anonymous.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_user_id(&self) -> Option<String>;
}

/// In-process session holder.
#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    user_id: RwLock<Option<String>>,
}

impl StaticSessionProvider {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id.into())),
        }
    }

    pub async fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        info!(target: "app::session", %user_id, "session started");
        *self.user_id.write().await = Some(user_id);
    }

    pub async fn sign_out(&self) {
        info!(target: "app::session", "session ended");
        *self.user_id.write().await = None;
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_user_id(&self) -> Option<String> {
        self.user_id
            .read()
            .await
            .clone()
            .filter(|id| !id.trim().is_empty())
    }
}
