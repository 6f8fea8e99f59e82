use std::sync::Arc;

use hemolink_core::{AuthAction, Session};
use tokio::sync::watch;

/// Process-wide session cell.
///
/// Cloning shares the same session. Every change goes through
/// [`SessionState::dispatch`] and is broadcast to subscribers.
#[derive(Clone)]
pub struct SessionState {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Session::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn dispatch(&self, action: AuthAction) {
        tracing::debug!(action = action.name(), "dispatch");
        self.tx.send_modify(|session| session.reduce(action));
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Read the session without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
