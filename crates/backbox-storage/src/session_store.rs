//! Session lifecycle on top of a [`SessionBackend`].
//!
//! The store is the single writer of the persisted session. The auth service
//! saves into it; the upload client and the file list only read the token, and
//! clear it when the API answers 401.

use crate::traits::{SessionBackend, StorageResult};
use backbox_core::{Session, User};
use std::sync::Arc;
use tokio::sync::watch;

/// Backend key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Backend key holding the JSON-serialized user.
pub const USER_KEY: &str = "user";

/// Change notifications published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Nothing has been saved or cleared since the store was created.
    Unknown,
    SignedIn(User),
    SignedOut,
}

#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    events: Arc<watch::Sender<SessionEvent>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        let (events, _) = watch::channel(SessionEvent::Unknown);
        Self {
            backend,
            events: Arc::new(events),
        }
    }

    /// Receive every later `save` / `clear`.
    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Current bearer token. An empty stored value counts as absent.
    pub async fn token(&self) -> StorageResult<Option<String>> {
        let token = self.backend.get(TOKEN_KEY).await?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    /// Current user record. A value that does not parse is treated as absent.
    pub async fn user(&self) -> StorageResult<Option<User>> {
        let Some(raw) = self.backend.get(USER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed stored user");
                Ok(None)
            }
        }
    }

    /// Full session, only when both the token and a readable user are present.
    pub async fn load(&self) -> StorageResult<Option<Session>> {
        let Some(token) = self.token().await? else {
            return Ok(None);
        };
        Ok(self.user().await?.map(|user| Session { token, user }))
    }

    /// Persist token and user. If the user cannot be written the token is
    /// removed again and no event is published.
    pub async fn save(&self, session: &Session) -> StorageResult<()> {
        let user_json = serde_json::to_string(&session.user)
            .map_err(|e| crate::StorageError::WriteFailed(e.to_string()))?;

        self.backend.set(TOKEN_KEY, &session.token).await?;
        if let Err(err) = self.backend.set(USER_KEY, &user_json).await {
            // A token without its user would read back as signed out.
            if let Err(rollback) = self.backend.remove(TOKEN_KEY).await {
                tracing::warn!(
                    error = %rollback,
                    backend = self.backend.backend_name(),
                    "Failed to remove token after user write failed"
                );
            }
            return Err(err);
        }

        tracing::info!(
            email = %session.user.email,
            backend = self.backend.backend_name(),
            "Session saved"
        );
        self.events
            .send_replace(SessionEvent::SignedIn(session.user.clone()));
        Ok(())
    }

    /// Remove both keys. Both removals are attempted even if the first fails.
    pub async fn clear(&self) -> StorageResult<()> {
        let token_result = self.backend.remove(TOKEN_KEY).await;
        let user_result = self.backend.remove(USER_KEY).await;

        tracing::info!(backend = self.backend.backend_name(), "Session cleared");
        self.events.send_replace(SessionEvent::SignedOut);

        token_result?;
        user_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySessionBackend;
    use crate::StorageError;
    use async_trait::async_trait;

    /// Accepts everything except the user record.
    struct RejectUserBackend {
        inner: MemorySessionBackend,
    }

    #[async_trait]
    impl SessionBackend for RejectUserBackend {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if key == USER_KEY {
                return Err(StorageError::WriteFailed("disk full".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key).await
        }

        fn backend_name(&self) -> &'static str {
            "reject-user"
        }
    }

    fn session(token: &str, email: &str) -> Session {
        Session {
            token: token.to_string(),
            user: User::new(email),
        }
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = SessionStore::new(Arc::new(MemorySessionBackend::new()));
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&session("t1", "a@b.com")).await.unwrap();

        assert_eq!(store.token().await.unwrap().as_deref(), Some("t1"));
        assert_eq!(store.load().await.unwrap(), Some(session("t1", "a@b.com")));
    }

    #[tokio::test]
    async fn failed_user_write_leaves_no_token_behind() {
        let inner = MemorySessionBackend::new();
        let store = SessionStore::new(Arc::new(RejectUserBackend {
            inner: inner.clone(),
        }));
        let events = store.subscribe();

        let err = store.save(&session("t1", "a@b.com")).await.unwrap_err();

        assert!(matches!(err, StorageError::WriteFailed(_)));
        assert!(inner.is_empty());
        assert_eq!(store.token().await.unwrap(), None);
        assert!(!events.has_changed().unwrap());
        assert_eq!(*events.borrow(), SessionEvent::Unknown);
    }

    #[tokio::test]
    async fn clear_removes_both_keys() {
        let backend = MemorySessionBackend::new();
        let store = SessionStore::new(Arc::new(backend.clone()));
        store.save(&session("t1", "a@b.com")).await.unwrap();

        store.clear().await.unwrap();

        assert!(backend.is_empty());
        assert_eq!(store.token().await.unwrap(), None);
        assert_eq!(store.user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_with_only_token_present() {
        let backend = MemorySessionBackend::new();
        backend.set(TOKEN_KEY, "stale").await.unwrap();
        let store = SessionStore::new(Arc::new(backend.clone()));

        store.clear().await.unwrap();

        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn malformed_user_reads_as_absent() {
        let backend = MemorySessionBackend::new();
        backend.set(TOKEN_KEY, "t1").await.unwrap();
        backend.set(USER_KEY, "{not json").await.unwrap();
        let store = SessionStore::new(Arc::new(backend));

        assert_eq!(store.user().await.unwrap(), None);
        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(store.token().await.unwrap().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn empty_token_reads_as_absent() {
        let backend = MemorySessionBackend::new();
        backend.set(TOKEN_KEY, "").await.unwrap();
        let store = SessionStore::new(Arc::new(backend));
        assert_eq!(store.token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn subscribers_see_sign_in_and_out() {
        let store = SessionStore::new(Arc::new(MemorySessionBackend::new()));
        let mut events = store.subscribe();
        assert_eq!(*events.borrow(), SessionEvent::Unknown);

        store.save(&session("t1", "a@b.com")).await.unwrap();
        events.changed().await.unwrap();
        assert_eq!(
            *events.borrow_and_update(),
            SessionEvent::SignedIn(User::new("a@b.com"))
        );

        store.clear().await.unwrap();
        events.changed().await.unwrap();
        assert_eq!(*events.borrow_and_update(), SessionEvent::SignedOut);
    }
}
