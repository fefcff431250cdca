use std::fmt;

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Info => "..",
            Level::Success => "ok",
            Level::Warning => "!!",
            Level::Error => "xx",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// Transient operation outcomes. Views push, the [`ToastTask`] prints.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Toast>,
}

impl Notifier {
    pub fn new(tx: mpsc::UnboundedSender<Toast>) -> Self {
        Self { tx }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Level::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Level::Success, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(Level::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&self, level: Level, message: String) {
        // the printer only goes away at shutdown
        self.tx.send(Toast { level, message }).ok();
    }
}

pub struct ToastTask {
    rx: mpsc::UnboundedReceiver<Toast>,
}

impl ToastTask {
    pub fn new(rx: mpsc::UnboundedReceiver<Toast>) -> Self {
        Self { rx }
    }

    pub async fn run(mut self) {
        while let Some(toast) = self.rx.recv().await {
            tracing::debug!(level = ?toast.level, message = %toast.message, "toast");
            println!("{toast}");
        }
    }
}
