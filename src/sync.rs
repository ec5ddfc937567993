//! Async driver tying a [`DirectoryTree`] to a [`DirectoryLister`].
//!
//! Requests are spawned as independent tokio tasks and report back through
//! the event channel. Completions are applied one at a time by whoever owns
//! the `TreeSync`, in the order they arrive; the tree's fetch generations
//! discard superseded ones.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Result;
use crate::event::{Event, EventHandler, ListingDone};
use crate::fs::lister::DirectoryLister;
use crate::tree::{ApplyOutcome, DirectoryTree, FetchToken};

pub struct TreeSync<L> {
    tree: DirectoryTree,
    lister: Arc<L>,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl<L: DirectoryLister> TreeSync<L> {
    pub fn new(tree: DirectoryTree, lister: L, event_tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            tree,
            lister: Arc::new(lister),
            event_tx,
        }
    }

    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    /// Re-list a loaded node (or the root). Returns `false` for unknown nodes.
    pub fn refresh(&mut self, identity: &str) -> bool {
        match self.tree.request_fetch(identity) {
            Some(token) => {
                self.spawn_fetch(token);
                true
            }
            None => false,
        }
    }

    /// Expand a node and list its children.
    pub fn expand(&mut self, identity: &str) -> bool {
        match self.tree.expand(identity) {
            Some(token) => {
                self.spawn_fetch(token);
                true
            }
            None => false,
        }
    }

    /// Collapse a node; a listing still in flight for it is discarded.
    pub fn collapse(&mut self, identity: &str) -> bool {
        self.tree.collapse(identity)
    }

    /// Start revealing `target`, expanding ancestors as listings arrive.
    pub fn reveal(&mut self, target: &str) {
        for token in self.tree.reveal(target) {
            self.spawn_fetch(token);
        }
    }

    /// Number of requests whose completion would still change the tree.
    pub fn pending(&self) -> usize {
        self.tree.pending_fetches()
    }

    fn spawn_fetch(&self, token: FetchToken) {
        debug!(identity = %token.identity, generation = token.generation, "listing");
        let fut = self.lister.list_children(&token.identity);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = fut.await;
            let _ = tx.send(Event::Listing(ListingDone { token, result }));
        });
    }

    /// Apply a finished listing and start whatever requests it implies.
    pub fn handle_listing(&mut self, done: ListingDone) -> ApplyOutcome {
        let outcome = self.tree.apply_listing(&done.token, done.result);
        if let ApplyOutcome::Applied(report) = &outcome {
            for token in self.tree.follow_up(report) {
                self.spawn_fetch(token);
            }
        }
        outcome
    }

    /// Refresh the loaded directories affected by changed paths.
    pub fn handle_fs_change(&mut self, paths: &[PathBuf]) -> usize {
        let targets = self.tree.refresh_targets_for(paths);
        for target in &targets {
            self.refresh(target);
        }
        targets.len()
    }

    /// Dispatch one event. Listing failures are returned so the caller can
    /// report them.
    pub fn handle_event(&mut self, event: Event) -> Option<ApplyOutcome> {
        match event {
            Event::Listing(done) => Some(self.handle_listing(done)),
            Event::FsChange(paths) => {
                self.handle_fs_change(&paths);
                None
            }
        }
    }

    /// Process events until no request is pending.
    ///
    /// Failed listings are collected and returned rather than aborting.
    pub async fn settle(&mut self, events: &mut EventHandler) -> Result<Vec<ApplyOutcome>> {
        let mut failures = Vec::new();
        while self.pending() > 0 {
            let event = events.next().await?;
            if let Some(outcome @ ApplyOutcome::Failed(_)) = self.handle_event(event) {
                failures.push(outcome);
            }
        }
        Ok(failures)
    }
}
