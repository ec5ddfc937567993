use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::error::{AppError, Result};
use crate::tree::{Entry, FetchToken};

/// Completion of a spawned listing request.
#[derive(Debug)]
pub struct ListingDone {
    pub token: FetchToken,
    pub result: Result<Vec<Entry>>,
}

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A listing request finished (successfully or not).
    Listing(ListingDone),
    /// Filesystem change detected by watcher.
    FsChange(Vec<PathBuf>),
}

/// Channel through which spawned tasks and the watcher report back to the
/// loop that owns the tree.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Get a sender clone for async tasks to send completion events.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (waits until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| AppError::Channel("Event channel closed".into()))
    }
}
