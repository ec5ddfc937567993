use crate::error::Result;
use crate::tree::FlatItem;

/// Build the prefix string for tree indentation using box-drawing characters.
///
/// Continuation lines depend on whether each ancestor was a last sibling, so
/// the ancestor chain is recovered by scanning backwards.
fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
    if item.depth == 0 {
        return String::new();
    }

    let mut parts: Vec<&str> = Vec::new();
    for d in 1..item.depth {
        let mut ancestor_is_last = false;
        for j in (0..item_index).rev() {
            if items[j].depth == d {
                ancestor_is_last = items[j].is_last_sibling;
                break;
            }
            if items[j].depth < d {
                break;
            }
        }
        parts.push(if ancestor_is_last { "   " } else { "│  " });
    }

    parts.push(if item.is_last_sibling { "└──" } else { "├──" });
    parts.concat()
}

/// Expansion marker.
fn indicator(item: &FlatItem) -> &'static str {
    match (item.has_children, item.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    }
}

/// Render visible items as an indented tree, one line per item.
pub fn render_text(items: &[FlatItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let prefix = build_prefix(item, items, i);
        let marker = if item.selected { " *" } else { "" };
        if prefix.is_empty() {
            out.push_str(&format!("{}{}{}\n", indicator(item), item.label, marker));
        } else {
            out.push_str(&format!("{} {}{}{}\n", prefix, indicator(item), item.label, marker));
        }
    }
    out
}

/// Render visible items as a JSON array.
pub fn render_json(items: &[FlatItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DirectoryTree, Entry};

    fn sample_tree() -> DirectoryTree {
        let mut tree = DirectoryTree::new("/r", "r");
        let token = tree.request_fetch("/r").unwrap();
        tree.apply_listing(
            &token,
            Ok(vec![Entry::dir("/r/alpha"), Entry::dir("/r/beta")]),
        );
        let token = tree.expand("/r/alpha").unwrap();
        tree.apply_listing(&token, Ok(vec![Entry::dir("/r/alpha/nested")]));
        tree.select("/r/alpha/nested");
        tree
    }

    #[test]
    fn text_uses_box_drawing_connectors() {
        let text = render_text(&sample_tree().flatten());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "▾ r",
                "├── ▾ alpha",
                "│  └── ▸ nested *",
                "└── ▸ beta",
            ]
        );
    }

    #[test]
    fn json_lists_visible_items() {
        let json = render_json(&sample_tree().flatten()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[2]["identity"], "/r/alpha/nested");
        assert_eq!(items[2]["selected"], true);
    }
}
