use std::collections::HashMap;

use tracing::debug;

/// Ticket for one in-flight listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchToken {
    pub identity: String,
    pub generation: u64,
}

/// Tracks the newest listing request per node.
///
/// Every request gets a fresh generation. A completion is applied only if its
/// generation is still the newest recorded for that node; older completions
/// and completions for cancelled nodes are suppressed.
#[derive(Debug, Default)]
pub struct FetchTracker {
    next_generation: u64,
    latest: HashMap<String, u64>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `identity`, superseding any request still in flight.
    pub fn begin(&mut self, identity: &str) -> FetchToken {
        self.next_generation += 1;
        let generation = self.next_generation;
        if let Some(previous) = self.latest.insert(identity.to_string(), generation) {
            debug!(identity, previous, generation, "superseding in-flight listing");
        }
        FetchToken {
            identity: identity.to_string(),
            generation,
        }
    }

    /// Check a completed request. Returns `true` at most once per token, and
    /// only when no newer request for the same node was started.
    pub fn accept(&mut self, token: &FetchToken) -> bool {
        match self.latest.get(&token.identity) {
            Some(&generation) if generation == token.generation => {
                self.latest.remove(&token.identity);
                true
            }
            _ => false,
        }
    }

    /// Forget the in-flight request for `identity`, if any.
    pub fn cancel(&mut self, identity: &str) -> bool {
        self.latest.remove(identity).is_some()
    }

    /// Cancel requests for every identity in `identities`.
    pub fn cancel_all<'a>(&mut self, identities: impl IntoIterator<Item = &'a String>) {
        for identity in identities {
            if self.cancel(identity) {
                debug!(identity = %identity, "cancelled listing for removed node");
            }
        }
    }

    pub fn is_pending(&self, identity: &str) -> bool {
        self.latest.contains_key(identity)
    }

    /// Number of requests whose completion would still be applied.
    pub fn pending(&self) -> usize {
        self.latest.len()
    }
}
