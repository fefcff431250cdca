use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use melodex::Session;

use super::{
    router::{Navigator, Route},
    toast::Notifier,
};

pub const EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// The one place a 401/403 turns into a logout: clear the tokens, tell the
/// user, then go to `/login` after a pause long enough to read the notice.
#[derive(Debug, Clone)]
pub struct SessionExpiry {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    session: Session,
    toasts: Notifier,
    navigator: Navigator,
    delay: Duration,
    // set while a redirect is scheduled
    pending: AtomicBool,
}

impl SessionExpiry {
    pub fn new(session: Session, toasts: Notifier, navigator: Navigator, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                session,
                toasts,
                navigator,
                delay,
                pending: AtomicBool::new(false),
            }),
        }
    }

    /// Returns `false` when a redirect is already on its way; several calls
    /// failing at once log the user out once.
    pub fn handle(&self) -> bool {
        if self.inner.pending.swap(true, Ordering::SeqCst) {
            tracing::debug!("session expiry already in progress");
            return false;
        }

        tracing::info!("session expired, logging out");
        if let Err(e) = self.inner.session.clear_session() {
            tracing::error!(error = %e, "failed to clear session");
        }
        self.inner.toasts.warn(EXPIRED_MESSAGE);

        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            inner.navigator.navigate(Route::Login);
            inner.pending.store(false, Ordering::SeqCst);
        });

        true
    }
}
