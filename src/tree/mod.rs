pub mod entry;
pub mod fetch;
pub mod node;
pub mod reconcile;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

pub use entry::{compare_identity, sort_entries, Entry};
pub use fetch::{FetchToken, FetchTracker};
pub use node::{NodeFactory, NodeId, RootNode, SerialFactory, Subtree, TreeNode};
pub use reconcile::{reconcile, ReconcileReport};

/// Result of delivering a listing to the tree.
#[derive(Debug)]
pub enum ApplyOutcome {
    /// The listing was merged into the node's children.
    Applied(ReconcileReport),
    /// A newer request superseded this one, or the node was removed or
    /// collapsed meanwhile. Nothing changed.
    Stale,
    /// The token was current but the node is no longer in the tree.
    Detached,
    /// The listing failed. The node keeps its previous children.
    Failed(AppError),
}

/// A flattened representation of a visible tree node for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct FlatItem {
    pub identity: String,
    pub label: String,
    pub depth: usize,
    pub expanded: bool,
    pub has_children: bool,
    pub is_last_sibling: bool,
    pub selected: bool,
}

/// A directory tree kept in sync with asynchronously fetched listings.
///
/// Owns the root, the node factory, the per-node fetch generations and the
/// selection. Listing I/O happens elsewhere; this type only hands out
/// [`FetchToken`]s and applies completions.
#[derive(Debug)]
pub struct DirectoryTree {
    root: RootNode,
    factory: SerialFactory,
    fetches: FetchTracker,
    selected: Option<String>,
    pending_reveal: Option<String>,
    /// Newly listed directories shallower than this are expanded automatically.
    auto_expand_depth: usize,
}

impl DirectoryTree {
    pub fn new(identity: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            root: RootNode::new(identity, label),
            factory: SerialFactory::new(),
            fetches: FetchTracker::new(),
            selected: None,
            pending_reveal: None,
            auto_expand_depth: 1,
        }
    }

    /// Tree rooted at a filesystem directory.
    ///
    /// Identities are UTF-8 strings, so a root path that is not valid UTF-8
    /// is rejected.
    pub fn for_path(path: &Path) -> Result<Self> {
        let identity = path
            .to_str()
            .ok_or_else(|| {
                AppError::InvalidPath(format!("{} is not valid UTF-8", path.display()))
            })?
            .to_string();
        let label = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| identity.clone());
        Ok(Self::new(identity, label))
    }

    /// Expand newly listed directories down to `depth` (root is depth 0).
    pub fn with_auto_expand(mut self, depth: usize) -> Self {
        self.auto_expand_depth = depth;
        self
    }

    pub fn root(&self) -> &RootNode {
        &self.root
    }

    pub fn root_identity(&self) -> &str {
        &self.root.identity
    }

    /// Find a non-root node by identity.
    pub fn find(&self, identity: &str) -> Option<&TreeNode> {
        find_in(&self.root.children, identity)
    }

    /// Whether `identity` is the root or a loaded node.
    pub fn contains(&self, identity: &str) -> bool {
        identity == self.root.identity || self.find(identity).is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a node. Returns `false` if no such node is loaded.
    pub fn select(&mut self, identity: &str) -> bool {
        if !self.contains(identity) {
            return false;
        }
        self.selected = Some(identity.to_string());
        true
    }

    /// Number of requests whose completion will still be applied.
    pub fn pending_fetches(&self) -> usize {
        self.fetches.pending()
    }

    pub fn is_fetch_pending(&self, identity: &str) -> bool {
        self.fetches.is_pending(identity)
    }

    /// Start a listing request for a loaded node or the root.
    ///
    /// Supersedes any request for the same node still in flight.
    pub fn request_fetch(&mut self, identity: &str) -> Option<FetchToken> {
        if !self.contains(identity) {
            return None;
        }
        Some(self.fetches.begin(identity))
    }

    /// Expand a node and request its listing.
    ///
    /// Returns `None` when the node is unknown or has nothing to expand.
    pub fn expand(&mut self, identity: &str) -> Option<FetchToken> {
        if identity != self.root.identity {
            let node = find_in_mut(&mut self.root.children, identity)?;
            if !node.set_expanded(true) {
                return None;
            }
        }
        Some(self.fetches.begin(identity))
    }

    /// Collapse a node, dropping any listing still in flight for it.
    ///
    /// A selection inside the collapsed subtree moves to the node itself.
    pub fn collapse(&mut self, identity: &str) -> bool {
        let Some(node) = find_in_mut(&mut self.root.children, identity) else {
            return false;
        };
        node.expanded = false;
        let hidden_selection = self
            .selected
            .as_deref()
            .is_some_and(|sel| is_ancestor(identity, sel));
        if hidden_selection {
            self.selected = Some(identity.to_string());
        }
        self.fetches.cancel(identity);
        true
    }

    /// Deliver the result of the request identified by `token`.
    pub fn apply_listing(
        &mut self,
        token: &FetchToken,
        result: Result<Vec<Entry>>,
    ) -> ApplyOutcome {
        if !self.fetches.accept(token) {
            debug!(
                identity = %token.identity,
                generation = token.generation,
                "dropping stale listing"
            );
            return ApplyOutcome::Stale;
        }

        let mut entries = match result {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    identity = %token.identity,
                    error = %err,
                    "listing failed; keeping previous children"
                );
                self.abandon_reveal_through(&token.identity);
                return ApplyOutcome::Failed(err);
            }
        };
        sort_entries(&mut entries);

        let report = if token.identity == self.root.identity {
            reconcile(&mut self.root, &entries, &mut self.factory, true)
        } else {
            match find_in_mut(&mut self.root.children, &token.identity) {
                Some(node) => reconcile(node, &entries, &mut self.factory, true),
                None => return ApplyOutcome::Detached,
            }
        };

        debug!(
            identity = %token.identity,
            inserted = report.inserted.len(),
            removed = report.removed.len(),
            refetch = report.refetch.len(),
            "applied listing"
        );

        self.fetches.cancel_all(&report.removed);
        self.repair_selection(&token.identity, &report.removed);
        ApplyOutcome::Applied(report)
    }

    /// Requests that should follow an applied listing: re-listing of retained
    /// expanded children, auto-expansion of shallow new directories, and the
    /// next step of a pending reveal.
    pub fn follow_up(&mut self, report: &ReconcileReport) -> Vec<FetchToken> {
        let mut tokens: Vec<FetchToken> = report
            .refetch
            .iter()
            .filter_map(|identity| self.request_fetch(identity))
            .collect();

        for identity in &report.inserted {
            let shallow = self
                .find(identity)
                .is_some_and(|node| node.has_children && node.depth < self.auto_expand_depth);
            if shallow {
                tokens.extend(self.expand(identity));
            }
        }

        tokens.extend(self.continue_reveal());
        tokens
    }

    /// Expand ancestors of `target` until it is loaded, then select it.
    ///
    /// Returns the requests needed for the next step. Further steps are
    /// produced by [`DirectoryTree::follow_up`] as listings arrive.
    pub fn reveal(&mut self, target: &str) -> Vec<FetchToken> {
        self.pending_reveal = Some(target.to_string());
        self.continue_reveal()
    }

    pub fn pending_reveal(&self) -> Option<&str> {
        self.pending_reveal.as_deref()
    }

    fn continue_reveal(&mut self) -> Vec<FetchToken> {
        let Some(target) = self.pending_reveal.clone() else {
            return Vec::new();
        };

        if self.contains(&target) {
            self.expand_loaded_ancestors(&target);
            self.selected = Some(target);
            self.pending_reveal = None;
            return Vec::new();
        }

        if !is_ancestor(&self.root.identity, &target) {
            debug!(target = %target, "reveal target outside of tree");
            self.pending_reveal = None;
            return Vec::new();
        }

        let deepest = deepest_ancestor(&self.root.children, &target);
        let (identity, loaded, expanded, has_children) = match deepest {
            Some(node) => (
                node.identity.clone(),
                node.loaded,
                node.expanded,
                node.has_children,
            ),
            None => (
                self.root.identity.clone(),
                self.root.loaded,
                true,
                self.root.has_children,
            ),
        };

        if self.fetches.is_pending(&identity) {
            return Vec::new();
        }
        if (loaded && expanded) || !has_children {
            debug!(target = %target, "reveal target not found");
            self.pending_reveal = None;
            return Vec::new();
        }
        self.expand(&identity).into_iter().collect()
    }

    /// Drop a pending reveal that can only proceed through `failed`.
    fn abandon_reveal_through(&mut self, failed: &str) {
        let blocked = self
            .pending_reveal
            .as_deref()
            .is_some_and(|target| target == failed || is_ancestor(failed, target));
        if blocked {
            warn!(
                reveal = ?self.pending_reveal,
                failed,
                "reveal abandoned after failed listing"
            );
            self.pending_reveal = None;
        }
    }

    fn expand_loaded_ancestors(&mut self, target: &str) {
        expand_path(&mut self.root.children, target);
    }

    fn repair_selection(&mut self, reconciled: &str, removed: &[String]) {
        let lost = self
            .selected
            .as_deref()
            .is_some_and(|sel| removed.iter().any(|r| r == sel) && !self.contains(sel));
        if lost {
            debug!(fallback = reconciled, "selected node removed; selecting parent");
            self.selected = Some(reconciled.to_string());
        }
    }

    /// Map changed filesystem paths to the loaded directories whose listings
    /// need refreshing.
    pub fn refresh_targets_for(&self, paths: &[PathBuf]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for path in paths {
            let identity = path.to_string_lossy();
            let candidate = if identity == self.root.identity.as_str() {
                Some(self.root.identity.clone())
            } else {
                path.parent()
                    .map(|p| p.to_string_lossy().to_string())
                    .filter(|parent| self.is_listed(parent))
            };
            if let Some(target) = candidate {
                if seen.insert(target.clone()) {
                    targets.push(target);
                }
            }
        }
        targets
    }

    fn is_listed(&self, identity: &str) -> bool {
        if identity == self.root.identity {
            return true;
        }
        self.find(identity).is_some_and(|node| node.loaded)
    }

    /// Visible nodes in display order, root first.
    pub fn flatten(&self) -> Vec<FlatItem> {
        let mut items = vec![FlatItem {
            identity: self.root.identity.clone(),
            label: self.root.label.clone(),
            depth: 0,
            expanded: self.root.has_children,
            has_children: self.root.has_children,
            is_last_sibling: true,
            selected: self.selected.as_deref() == Some(self.root.identity.as_str()),
        }];
        let count = self.root.children.len();
        for (i, child) in self.root.children.iter().enumerate() {
            self.flatten_node(child, &mut items, i + 1 == count);
        }
        items
    }

    fn flatten_node(&self, node: &TreeNode, items: &mut Vec<FlatItem>, is_last: bool) {
        items.push(FlatItem {
            identity: node.identity.clone(),
            label: node.label.clone(),
            depth: node.depth,
            expanded: node.expanded,
            has_children: node.has_children,
            is_last_sibling: is_last,
            selected: self.selected.as_deref() == Some(node.identity.as_str()),
        });

        if node.expanded {
            let count = node.children.len();
            for (i, child) in node.children.iter().enumerate() {
                self.flatten_node(child, items, i + 1 == count);
            }
        }
    }
}

/// Whether `ancestor` is a strict path prefix of `identity`.
fn is_ancestor(ancestor: &str, identity: &str) -> bool {
    ancestor != identity && Path::new(identity).starts_with(Path::new(ancestor))
}

fn find_in<'a>(children: &'a [TreeNode], identity: &str) -> Option<&'a TreeNode> {
    children.iter().find_map(|child| {
        if child.identity == identity {
            Some(child)
        } else if is_ancestor(&child.identity, identity) {
            find_in(&child.children, identity)
        } else {
            None
        }
    })
}

fn find_in_mut<'a>(children: &'a mut [TreeNode], identity: &str) -> Option<&'a mut TreeNode> {
    for child in children.iter_mut() {
        if child.identity == identity {
            return Some(child);
        }
        if is_ancestor(&child.identity, identity) {
            return find_in_mut(&mut child.children, identity);
        }
    }
    None
}

fn expand_path(children: &mut [TreeNode], target: &str) {
    if let Some(node) = children.iter_mut().find(|c| is_ancestor(&c.identity, target)) {
        node.set_expanded(true);
        expand_path(&mut node.children, target);
    }
}

/// Deepest loaded node that is an ancestor of `target`.
fn deepest_ancestor<'a>(children: &'a [TreeNode], target: &str) -> Option<&'a TreeNode> {
    let node = children.iter().find(|c| is_ancestor(&c.identity, target))?;
    deepest_ancestor(&node.children, target).or(Some(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn dirs(parent: &str, names: &[&str]) -> Vec<Entry> {
        names
            .iter()
            .map(|n| Entry::dir(format!("{parent}/{n}")))
            .collect()
    }

    fn loaded_tree(names: &[&str]) -> DirectoryTree {
        let mut tree = DirectoryTree::new("/r", "r");
        let token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(&token, Ok(dirs("/r", names)));
        tree
    }

    fn labels(tree: &DirectoryTree) -> Vec<String> {
        tree.flatten().into_iter().map(|i| i.label).collect()
    }

    #[test]
    fn apply_sorts_unsorted_listing() {
        let tree = loaded_tree(&["zeta", "Alpha", "mid"]);
        assert_eq!(labels(&tree), vec!["r", "Alpha", "mid", "zeta"]);
    }

    #[test]
    fn later_request_wins_over_earlier() {
        let mut tree = DirectoryTree::new("/r", "r");
        let first = tree.request_fetch("/r").unwrap();
        let second = tree.request_fetch("/r").unwrap();

        assert!(matches!(
            tree.apply_listing(&second, Ok(dirs("/r", &["new"]))),
            ApplyOutcome::Applied(_)
        ));
        assert!(matches!(
            tree.apply_listing(&first, Ok(dirs("/r", &["old"]))),
            ApplyOutcome::Stale
        ));
        assert_eq!(labels(&tree), vec!["r", "new"]);
    }

    #[test]
    fn failed_listing_keeps_children() {
        let mut tree = loaded_tree(&["a", "b"]);
        let token = tree.request_fetch("/r").unwrap();
        let err = AppError::listing("/r", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));

        let outcome = tree.apply_listing(&token, Err(err));

        assert!(matches!(outcome, ApplyOutcome::Failed(AppError::Listing { .. })));
        assert_eq!(labels(&tree), vec!["r", "a", "b"]);
        assert_eq!(tree.pending_fetches(), 0);
    }

    #[test]
    fn expand_requires_children() {
        let mut tree = DirectoryTree::new("/r", "r");
        let token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(
            &token,
            Ok(vec![Entry::new("/r/file.txt", "file.txt", false), Entry::dir("/r/sub")]),
        );

        assert!(tree.expand("/r/file.txt").is_none());
        assert!(tree.expand("/r/sub").is_some());
        assert!(tree.find("/r/sub").unwrap().expanded);
        assert!(tree.expand("/r/missing").is_none());
    }

    #[test]
    fn expanding_into_empty_directory_collapses_it() {
        let mut tree = loaded_tree(&["empty"]);
        let token = tree.expand("/r/empty").unwrap();
        tree.apply_listing(&token, Ok(Vec::new()));

        let node = tree.find("/r/empty").unwrap();
        assert!(!node.expanded);
        assert!(!node.has_children);
    }

    #[test]
    fn removed_node_cancels_its_fetch() {
        let mut tree = loaded_tree(&["a", "b"]);
        let a_token = tree.expand("/r/a").unwrap();

        let root_token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(&root_token, Ok(dirs("/r", &["b"])));

        assert!(!tree.is_fetch_pending("/r/a"));
        assert!(matches!(
            tree.apply_listing(&a_token, Ok(dirs("/r/a", &["x"]))),
            ApplyOutcome::Stale
        ));
        assert!(tree.find("/r/a").is_none());
    }

    #[test]
    fn selection_falls_back_to_reconciled_parent() {
        let mut tree = loaded_tree(&["a", "b"]);
        let token = tree.expand("/r/a").unwrap();
        tree.apply_listing(&token, Ok(dirs("/r/a", &["inner"])));
        assert!(tree.select("/r/a/inner"));

        let token = tree.request_fetch("/r/a").unwrap();
        tree.apply_listing(&token, Ok(Vec::new()));

        assert_eq!(tree.selected(), Some("/r/a"));
    }

    #[test]
    fn selection_of_surviving_node_is_kept() {
        let mut tree = loaded_tree(&["a", "b"]);
        tree.select("/r/b");
        let token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(&token, Ok(dirs("/r", &["b", "c"])));
        assert_eq!(tree.selected(), Some("/r/b"));
    }

    #[test]
    fn collapse_moves_hidden_selection_up() {
        let mut tree = loaded_tree(&["a"]);
        let token = tree.expand("/r/a").unwrap();
        tree.apply_listing(&token, Ok(dirs("/r/a", &["inner"])));
        tree.select("/r/a/inner");

        assert!(tree.collapse("/r/a"));
        assert_eq!(tree.selected(), Some("/r/a"));
        assert_eq!(labels(&tree), vec!["r", "a"]);
    }

    #[test]
    fn collapse_drops_in_flight_listing() {
        let mut tree = loaded_tree(&["a"]);
        let token = tree.expand("/r/a").unwrap();
        tree.collapse("/r/a");
        assert!(matches!(
            tree.apply_listing(&token, Ok(dirs("/r/a", &["x"]))),
            ApplyOutcome::Stale
        ));
    }

    #[test]
    fn follow_up_refetches_expanded_children() {
        let mut tree = loaded_tree(&["a", "b"]);
        let token = tree.expand("/r/b").unwrap();
        tree.apply_listing(&token, Ok(dirs("/r/b", &["x"])));

        let token = tree.request_fetch("/r").unwrap();
        let ApplyOutcome::Applied(report) = tree.apply_listing(&token, Ok(dirs("/r", &["a", "b"]))) else {
            panic!("listing should apply");
        };
        let tokens = tree.follow_up(&report);

        let ids: Vec<&str> = tokens.iter().map(|t| t.identity.as_str()).collect();
        assert_eq!(ids, vec!["/r/b"]);
    }

    #[test]
    fn follow_up_auto_expands_shallow_directories() {
        let mut tree = DirectoryTree::new("/r", "r").with_auto_expand(2);
        let token = tree.request_fetch("/r").unwrap();
        let ApplyOutcome::Applied(report) = tree.apply_listing(
            &token,
            Ok(vec![Entry::dir("/r/a"), Entry::new("/r/f", "f", false)]),
        ) else {
            panic!("listing should apply");
        };

        let tokens = tree.follow_up(&report);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].identity, "/r/a");
        assert!(tree.find("/r/a").unwrap().expanded);
    }

    #[test]
    fn reveal_walks_down_and_selects() {
        let mut tree = DirectoryTree::new("/r", "r");
        let tokens = tree.reveal("/r/a/b");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].identity, "/r");

        let ApplyOutcome::Applied(report) = tree.apply_listing(&tokens[0], Ok(dirs("/r", &["a", "z"]))) else {
            panic!("root listing should apply");
        };
        let tokens = tree.follow_up(&report);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].identity, "/r/a");

        let ApplyOutcome::Applied(report) = tree.apply_listing(&tokens[0], Ok(dirs("/r/a", &["b"]))) else {
            panic!("child listing should apply");
        };
        assert!(tree.follow_up(&report).is_empty());
        assert_eq!(tree.selected(), Some("/r/a/b"));
        assert!(tree.pending_reveal().is_none());
        assert!(tree.find("/r/a").unwrap().expanded);
    }

    #[test]
    fn reveal_of_missing_path_gives_up() {
        let mut tree = loaded_tree(&["a"]);
        let tokens = tree.reveal("/r/nope/deeper");
        assert!(tokens.is_empty());
        assert!(tree.pending_reveal().is_none());
        assert!(tree.selected().is_none());
    }

    #[test]
    fn reveal_outside_root_is_ignored() {
        let mut tree = loaded_tree(&["a"]);
        assert!(tree.reveal("/elsewhere").is_empty());
        assert!(tree.pending_reveal().is_none());
    }

    #[test]
    fn refresh_targets_map_to_loaded_parents() {
        let mut tree = loaded_tree(&["a", "b"]);
        let token = tree.expand("/r/a").unwrap();
        tree.apply_listing(&token, Ok(dirs("/r/a", &["x"])));

        let targets = tree.refresh_targets_for(&[
            PathBuf::from("/r/a/new"),
            PathBuf::from("/r/a/other"),
            PathBuf::from("/r/b/unloaded_child"),
            PathBuf::from("/r/c"),
            PathBuf::from("/r"),
        ]);

        assert_eq!(targets, vec!["/r/a".to_string(), "/r".to_string()]);
    }

    #[test]
    fn flatten_marks_last_siblings_and_selection() {
        let mut tree = loaded_tree(&["a", "b"]);
        tree.select("/r/b");
        let items = tree.flatten();
        assert!(!items[1].is_last_sibling);
        assert!(items[2].is_last_sibling);
        assert!(items[2].selected);
        assert_eq!(items[2].depth, 1);
    }

    #[test]
    fn failed_ancestor_listing_abandons_reveal() {
        let mut tree = loaded_tree(&["a"]);
        let tokens = tree.reveal("/r/a/b");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].identity, "/r/a");

        let err = AppError::listing("/r/a", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let outcome = tree.apply_listing(&tokens[0], Err(err));

        assert!(matches!(outcome, ApplyOutcome::Failed(_)));
        assert!(tree.pending_reveal().is_none());
        assert!(tree.selected().is_none());

        let token = tree.request_fetch("/r").unwrap();
        let ApplyOutcome::Applied(report) = tree.apply_listing(&token, Ok(dirs("/r", &["a"]))) else {
            panic!("root listing should apply");
        };
        let tokens = tree.follow_up(&report);
        let ids: Vec<&str> = tokens.iter().map(|t| t.identity.as_str()).collect();
        assert_eq!(ids, vec!["/r/a"]);
        assert!(tree.pending_reveal().is_none());
    }

    #[test]
    fn unrelated_failure_keeps_reveal_pending() {
        let mut tree = loaded_tree(&["a", "b"]);
        let b_token = tree.expand("/r/b").unwrap();
        tree.reveal("/r/a/x");

        let err = AppError::listing("/r/b", io::Error::new(io::ErrorKind::NotFound, "gone"));
        tree.apply_listing(&b_token, Err(err));

        assert_eq!(tree.pending_reveal(), Some("/r/a/x"));
    }

    #[test]
    fn kind_change_refreshes_expandability() {
        let mut tree = DirectoryTree::new("/r", "r");
        let token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(&token, Ok(vec![Entry::new("/r/x", "x", false)]));
        tree.select("/r/x");
        assert!(tree.expand("/r/x").is_none());

        let token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(&token, Ok(vec![Entry::dir("/r/x")]));

        assert!(tree.expand("/r/x").is_some());
        assert_eq!(tree.selected(), Some("/r/x"));
    }

    #[test]
    fn kind_change_cancels_listing_of_old_directory() {
        let mut tree = loaded_tree(&["x"]);
        let x_token = tree.expand("/r/x").unwrap();

        let token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(&token, Ok(vec![Entry::new("/r/x", "x", false)]));

        assert!(!tree.is_fetch_pending("/r/x"));
        assert!(matches!(
            tree.apply_listing(&x_token, Ok(dirs("/r/x", &["inner"]))),
            ApplyOutcome::Stale
        ));
        let x = tree.find("/r/x").unwrap();
        assert!(!x.has_children);
        assert!(x.children.is_empty());
    }

    #[test]
    fn empty_root_is_not_reported_expanded() {
        let tree = loaded_tree(&[]);
        let items = tree.flatten();
        assert_eq!(items.len(), 1);
        assert!(!items[0].has_children);
        assert!(!items[0].expanded);
    }

    #[test]
    fn for_path_uses_last_segment_as_label() {
        let tree = DirectoryTree::for_path(Path::new("/srv/data")).unwrap();
        assert_eq!(tree.root_identity(), "/srv/data");
        assert_eq!(tree.root().label, "data");
    }

    #[cfg(unix)]
    #[test]
    fn for_path_rejects_non_utf8_root() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/srv/bad\xff"));
        assert!(matches!(
            DirectoryTree::for_path(path),
            Err(AppError::InvalidPath(_))
        ));
    }
}
