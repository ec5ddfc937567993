use super::entry::Entry;

/// Stable per-instance serial assigned by a [`NodeFactory`].
///
/// Two nodes with the same identity but different ids are different
/// instances: one was dropped and the other created in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A displayed tree entry below the root.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    pub identity: String,
    pub label: String,
    pub depth: usize,
    /// Kind of the entry this node was created from.
    pub is_dir: bool,
    /// Whether children are currently shown. Only meaningful with `has_children`.
    pub expanded: bool,
    /// Whether an expand affordance is shown.
    pub has_children: bool,
    /// Displayed children, sorted by identity.
    pub children: Vec<TreeNode>,
    /// Set once a listing for this node has been applied.
    pub loaded: bool,
}

impl TreeNode {
    /// Build a collapsed, unloaded node for `entry`.
    pub fn from_entry(id: NodeId, entry: &Entry, depth: usize) -> Self {
        Self {
            id,
            identity: entry.identity.clone(),
            label: entry.label.clone(),
            depth,
            is_dir: entry.is_dir,
            expanded: false,
            has_children: entry.is_dir,
            children: Vec::new(),
            loaded: false,
        }
    }

    /// Set `expanded`, refusing when there is nothing to expand.
    pub fn set_expanded(&mut self, expanded: bool) -> bool {
        self.expanded = expanded && self.has_children;
        self.expanded
    }

    /// Collect identities of this node and all of its descendants.
    pub fn collect_identities(&self, out: &mut Vec<String>) {
        out.push(self.identity.clone());
        for child in &self.children {
            child.collect_identities(out);
        }
    }

    /// Find a descendant (or self) by identity.
    pub fn find(&self, identity: &str) -> Option<&TreeNode> {
        if self.identity == identity {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(identity))
    }

    /// Mutable variant of [`TreeNode::find`].
    pub fn find_mut(&mut self, identity: &str) -> Option<&mut TreeNode> {
        if self.identity == identity {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(identity))
    }
}

/// The tree root. Always displayed expanded.
#[derive(Debug, Clone)]
pub struct RootNode {
    pub identity: String,
    pub label: String,
    pub has_children: bool,
    pub children: Vec<TreeNode>,
    pub loaded: bool,
}

impl RootNode {
    pub fn new(identity: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            label: label.into(),
            has_children: true,
            children: Vec::new(),
            loaded: false,
        }
    }
}

/// Anything that owns an ordered list of displayed children.
///
/// Implemented by both [`RootNode`] and [`TreeNode`] so that one reconciler
/// serves both.
pub trait Subtree {
    fn identity(&self) -> &str;

    /// Depth of this node; children live at `depth() + 1`.
    fn depth(&self) -> usize;

    fn children_mut(&mut self) -> &mut Vec<TreeNode>;

    /// Record the outcome of a reconciliation: whether any children remain.
    fn set_child_state(&mut self, has_children: bool);
}

impl Subtree for TreeNode {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn children_mut(&mut self) -> &mut Vec<TreeNode> {
        &mut self.children
    }

    fn set_child_state(&mut self, has_children: bool) {
        self.has_children = has_children;
        self.loaded = true;
        if !has_children {
            self.expanded = false;
        }
    }
}

impl Subtree for RootNode {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn depth(&self) -> usize {
        0
    }

    fn children_mut(&mut self) -> &mut Vec<TreeNode> {
        &mut self.children
    }

    fn set_child_state(&mut self, has_children: bool) {
        self.has_children = has_children;
        self.loaded = true;
    }
}

/// Creates nodes for entries that have no existing counterpart.
pub trait NodeFactory {
    fn create_node(&mut self, entry: &Entry, depth: usize) -> TreeNode;
}

/// Default factory handing out increasing [`NodeId`]s.
#[derive(Debug, Default)]
pub struct SerialFactory {
    next_id: u64,
}

impl SerialFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes created so far.
    pub fn created(&self) -> u64 {
        self.next_id
    }
}

impl NodeFactory for SerialFactory {
    fn create_node(&mut self, entry: &Entry, depth: usize) -> TreeNode {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        TreeNode::from_entry(id, entry, depth)
    }
}
