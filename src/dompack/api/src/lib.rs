//! Events emitted by dompack pipelines.
//!
//! Engine functions never print: they push `Update`s into an `EventTx`,
//! and the front-end decides how to display them.
pub mod convert_problem;
pub mod scrape_problems;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Contains possible error or success
#[derive(Serialize, Deserialize, Debug)]
#[must_use = "this is Result in fact"]
pub struct SimpleFinish(pub Result<(), StringError>);

impl SimpleFinish {
    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }
}

/// Error is rendered with its whole context chain
impl From<&anyhow::Result<()>> for SimpleFinish {
    fn from(r: &anyhow::Result<()>) -> Self {
        Self(r.as_ref().map(|_| ()).map_err(|e| StringError(format!("{:#}", e))))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringError(pub String);

impl std::fmt::Display for StringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for StringError {}

/// Sending half of an event stream.
///
/// Sending never fails: if receiver is gone, events are dropped.
#[derive(Debug)]
pub struct EventTx<U>(Option<mpsc::UnboundedSender<U>>);

impl<U> Clone for EventTx<U> {
    fn clone(&self) -> Self {
        EventTx(self.0.clone())
    }
}

impl<U> EventTx<U> {
    /// Creates connected sender and receiver.
    pub fn channel() -> (EventTx<U>, mpsc::UnboundedReceiver<U>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventTx(Some(tx)), rx)
    }

    /// Creates sender which discards everything.
    pub fn sink() -> EventTx<U> {
        EventTx(None)
    }

    pub fn send_event(&self, update: U) {
        if let Some(tx) = &self.0 {
            tx.send(update).ok();
        }
    }
}
