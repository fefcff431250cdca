use std::{sync::Arc, time::Duration};

use axum::Router;
use melodex::{Melodex, Session};
use tokio::sync::mpsc;

use crate::{
    config::Config,
    shell::{
        data::Data,
        router::{Navigator, Route},
        toast::{Notifier, Toast},
    },
};

pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A [`Data`] wired to channels the test can read, over an in-memory session.
pub struct Harness {
    pub data: Data,
    pub routes: mpsc::UnboundedReceiver<Route>,
    toasts: mpsc::UnboundedReceiver<Toast>,
}

impl Harness {
    pub fn new(base: &str) -> Self {
        Self::with_config(base, Config::default())
    }

    pub fn with_delay(base: &str, delay: Duration) -> Self {
        let mut config = Config::default();
        config.session.redirect_delay_ms = delay.as_millis() as u64;
        Self::with_config(base, config)
    }

    pub fn with_config(base: &str, config: Config) -> Self {
        let (toast_tx, toasts) = mpsc::unbounded_channel();
        let (nav_tx, routes) = mpsc::unbounded_channel();
        let client = Melodex::new(base, Session::in_memory()).unwrap();
        let data = Data::new(
            Arc::new(config),
            client,
            Notifier::new(toast_tx),
            Navigator::new(nav_tx),
        );

        Self {
            data,
            routes,
            toasts,
        }
    }

    pub fn login(&self) {
        self.data.session().set_session("acc", "ref").unwrap();
    }

    /// Everything toasted since the last call.
    pub fn toasts(&mut self) -> Vec<Toast> {
        let mut out = Vec::new();
        while let Ok(toast) = self.toasts.try_recv() {
            out.push(toast);
        }
        out
    }

    pub fn messages(&mut self) -> Vec<String> {
        self.toasts().into_iter().map(|t| t.message).collect()
    }
}
