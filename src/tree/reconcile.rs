//! Incremental reconciliation of a node's displayed children against a fresh,
//! sorted listing.
//!
//! The merge walks the old children and the new entries side by side, both
//! sorted by [`compare_identity`]. Children whose identity survives are moved
//! into the new list as-is, so their expansion state and loaded descendants
//! are kept. Nothing here performs I/O.

use std::borrow::Cow;
use std::cmp::Ordering;

use tracing::{trace, warn};

use super::entry::{compare_identity, is_strictly_sorted, normalize_entries, Entry};
use super::node::{NodeFactory, Subtree};

/// What a reconciliation pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Identities of freshly created children.
    pub inserted: Vec<String>,
    /// Identities dropped from the tree, descendants of dropped children included.
    /// A child replaced because it changed between file and directory is listed
    /// here and in `inserted`.
    pub removed: Vec<String>,
    /// Retained, expanded children whose own listing should be fetched again.
    /// Only filled for recursive passes.
    pub refetch: Vec<String>,
}

impl ReconcileReport {
    /// True when the pass neither created nor removed any child.
    pub fn is_unchanged(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }
}

/// Bring `node`'s children in line with `entries`.
///
/// `entries` must be strictly sorted by [`compare_identity`]. Debug builds
/// assert this; release builds log a warning and merge against a sorted,
/// de-duplicated copy instead.
pub fn reconcile<N, F>(
    node: &mut N,
    entries: &[Entry],
    factory: &mut F,
    recursive: bool,
) -> ReconcileReport
where
    N: Subtree + ?Sized,
    F: NodeFactory + ?Sized,
{
    let entries: Cow<'_, [Entry]> = if is_strictly_sorted(entries) {
        Cow::Borrowed(entries)
    } else {
        debug_assert!(
            false,
            "listing for {} is not strictly sorted by identity",
            node.identity()
        );
        warn!(
            identity = node.identity(),
            "listing not strictly sorted; merging a normalized copy"
        );
        Cow::Owned(normalize_entries(entries))
    };

    let child_depth = node.depth() + 1;
    let mut report = ReconcileReport::default();
    let mut merged = Vec::with_capacity(entries.len());
    let mut old = std::mem::take(node.children_mut()).into_iter().peekable();

    for entry in entries.iter() {
        loop {
            let ordering = old
                .peek()
                .map(|child| compare_identity(&entry.identity, &child.identity));
            match ordering {
                Some(Ordering::Equal) => {
                    let Some(mut child) = old.next() else {
                        break;
                    };
                    if child.is_dir != entry.is_dir {
                        trace!(identity = %child.identity, "entry kind changed; replacing child");
                        child.collect_identities(&mut report.removed);
                        report.inserted.push(entry.identity.clone());
                        merged.push(factory.create_node(entry, child_depth));
                        break;
                    }
                    if child.label != entry.label {
                        child.label = entry.label.clone();
                    }
                    if recursive && child.expanded {
                        report.refetch.push(child.identity.clone());
                    }
                    merged.push(child);
                    break;
                }
                Some(Ordering::Greater) => {
                    // The old child sorts before the entry, so it is gone.
                    if let Some(stale) = old.next() {
                        trace!(identity = %stale.identity, "removing child");
                        stale.collect_identities(&mut report.removed);
                    }
                }
                Some(Ordering::Less) | None => {
                    trace!(identity = %entry.identity, "inserting child");
                    report.inserted.push(entry.identity.clone());
                    merged.push(factory.create_node(entry, child_depth));
                    break;
                }
            }
        }
    }

    for stale in old {
        trace!(identity = %stale.identity, "removing trailing child");
        stale.collect_identities(&mut report.removed);
    }

    let has_children = !merged.is_empty();
    *node.children_mut() = merged;
    node.set_child_state(has_children);
    report
}
