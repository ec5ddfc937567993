use std::cmp::Ordering;

/// A child record produced by a directory listing.
///
/// Entries are read-only inputs to reconciliation; the tree never keeps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path-like key, unique among siblings.
    pub identity: String,
    /// Name shown to the user.
    pub label: String,
    /// Whether the entry may itself have children.
    pub is_dir: bool,
}

impl Entry {
    pub fn new(identity: impl Into<String>, label: impl Into<String>, is_dir: bool) -> Self {
        Self {
            identity: identity.into(),
            label: label.into(),
            is_dir,
        }
    }

    /// Directory entry whose label is the last path segment of `identity`.
    pub fn dir(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        let label = last_segment(&identity).to_string();
        Self {
            identity,
            label,
            is_dir: true,
        }
    }
}

/// Ordering shared by listing sort and reconciliation.
///
/// Case-insensitive, with a byte-wise tiebreak so that identities differing
/// only in case still have a total order.
pub fn compare_identity(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Sort entries in place using [`compare_identity`].
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| compare_identity(&a.identity, &b.identity));
}

/// Whether entries are strictly increasing (sorted, no duplicate identities).
pub fn is_strictly_sorted(entries: &[Entry]) -> bool {
    entries
        .windows(2)
        .all(|pair| compare_identity(&pair[0].identity, &pair[1].identity) == Ordering::Less)
}

/// Sort and drop repeated identities, keeping the first occurrence.
pub fn normalize_entries(entries: &[Entry]) -> Vec<Entry> {
    let mut normalized = entries.to_vec();
    // Stable sort keeps the first occurrence ahead of its duplicates.
    sort_entries(&mut normalized);
    normalized.dedup_by(|later, earlier| later.identity == earlier.identity);
    normalized
}

/// Last `/`- or `\`-separated segment of a path-like identity.
pub fn last_segment(identity: &str) -> &str {
    let trimmed = identity.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(pos) => &trimmed[pos + 1..],
        None if trimmed.is_empty() => identity,
        None => trimmed,
    }
}
