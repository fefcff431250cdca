use std::sync::Arc;

use melodex::{Failure, Melodex, MelodexError, Session};

use crate::{
    config::Config,
    shell::{
        expiry::SessionExpiry,
        router::Navigator,
        toast::Notifier,
    },
};

#[derive(Clone)]
pub struct Data {
    pub config: Arc<Config>,
    pub client: Melodex,
    pub toasts: Notifier,
    pub navigator: Navigator,
    pub expiry: SessionExpiry,
}

impl Data {
    pub fn new(
        config: Arc<Config>,
        client: Melodex,
        toasts: Notifier,
        navigator: Navigator,
    ) -> Self {
        let expiry = SessionExpiry::new(
            client.session().clone(),
            toasts.clone(),
            navigator.clone(),
            config.session.redirect_delay(),
        );

        Self {
            config,
            client,
            toasts,
            navigator,
            expiry,
        }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Turns a failed call into what the user sees. `action` reads like
    /// "fetching songs".
    pub fn fail(&self, err: &MelodexError, action: &str) {
        match err.failure() {
            Failure::Unauthorized => {
                self.expiry.handle();
            }
            Failure::Validation => {
                if let MelodexError::Validation(errors) = err {
                    for error in &errors.0 {
                        self.toasts.warn(error.message.clone());
                    }
                }
            }
            Failure::NotFound => {
                tracing::debug!(action, "nothing found");
                self.toasts.warn(format!("Nothing found while {action}."));
            }
            Failure::Other => {
                tracing::error!(error = %err, "error {action}");
                self.toasts.error(format!("Error {action}."));
            }
        }
    }
}
