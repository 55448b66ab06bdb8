use confdoc_docs::{DocKind, DocNode};
use tracing::{debug, trace};

use crate::node::Node;

/// Copy comments from a doc tree onto the matching nodes of `node`.
///
/// Keys are matched level by level. Keys missing on either side are left
/// alone. For a map of records every entry is merged against the same
/// template. Merging again yields the same tree.
pub fn merge(node: &mut Node, doc: &DocNode) {
    let Some(entries) = node.entries_mut() else {
        return;
    };
    for (key, child) in entries.iter_mut() {
        let Some(doc_child) = doc.children.get(key) else {
            trace!(%key, "no documentation for key");
            continue;
        };
        child.set_comment(doc_child.comment.as_str());

        match doc_child.kind {
            DocKind::MapOfRecords => {
                if let Some(map) = child.entries_mut() {
                    for entry in map.values_mut() {
                        merge(entry, doc_child);
                    }
                }
            }
            DocKind::Record | DocKind::Leaf => {
                if child.is_table() {
                    merge(child, doc_child);
                }
            }
        }
    }
}

/// Merge `doc` into `node` and attach the root comment.
pub fn annotate(node: &mut Node, doc: &DocNode) {
    node.set_comment(doc.comment.as_str());
    merge(node, doc);
    debug!(keys = doc.walk().count(), "annotated configuration");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> DocNode {
        let mut inner = DocNode::new("inner", "inner table");
        inner.kind = DocKind::Record;
        inner.insert(DocNode::new("v", "value"));
        let mut root = DocNode::root("root");
        root.insert(DocNode::new("a", "first"));
        root.insert(inner);
        root
    }

    #[test]
    fn test_merge_matches_keys() {
        let mut node = Node::parse("a = 1\nextra = 2\n[inner]\nv = 3\nw = 4\n").unwrap();
        merge(&mut node, &doc());

        assert_eq!(node.comment(), None);
        assert_eq!(node.get("a").and_then(Node::comment), Some("first"));
        assert_eq!(node.get("extra").and_then(Node::comment), None);
        let inner = node.get("inner").unwrap();
        assert_eq!(inner.comment(), Some("inner table"));
        assert_eq!(inner.get("v").and_then(Node::comment), Some("value"));
        assert_eq!(inner.get("w").and_then(Node::comment), None);
    }

    #[test]
    fn test_annotate_sets_root_comment() {
        let mut node = Node::parse("a = 1\n").unwrap();
        annotate(&mut node, &doc());
        assert_eq!(node.comment(), Some("root"));
    }

    #[test]
    fn test_merge_into_leaf_is_noop() {
        let mut node = Node::from(toml::Value::Integer(1));
        merge(&mut node, &doc());
        assert_eq!(node, Node::from(toml::Value::Integer(1)));
    }
}
