use indexmap::IndexMap;

/// How a node's children relate to the serialized value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocKind {
    /// No children.
    #[default]
    Leaf,
    /// Children document the fields of a nested table.
    Record,
    /// Children are a template applied to every entry of a map.
    MapOfRecords,
}

/// Documentation for one field, mirroring the schema's nesting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocNode {
    /// External key; empty for the root.
    pub key: String,
    /// Comment text; empty when the field is undocumented.
    pub comment: String,
    pub kind: DocKind,
    pub children: IndexMap<String, DocNode>,
}

impl DocNode {
    pub fn new(key: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            comment: comment.into(),
            ..Self::default()
        }
    }

    /// A root node for a record.
    pub fn root(comment: impl Into<String>) -> Self {
        Self {
            kind: DocKind::Record,
            ..Self::new("", comment)
        }
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    pub fn child(&self, key: &str) -> Option<&DocNode> {
        self.children.get(key)
    }

    /// Insert a child under its key.
    ///
    /// A child with the same key is replaced in place, keeping its position.
    /// Returns the replaced node.
    pub fn insert(&mut self, child: DocNode) -> Option<DocNode> {
        self.children.insert(child.key.clone(), child)
    }

    /// Look up a descendant by dotted path. The empty path is `self`.
    pub fn get_path(&self, path: &str) -> Option<&DocNode> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Depth-first traversal of all descendants.
    ///
    /// Yields `(depth, dotted path, node)`; direct children have depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, String::new(), self.children.iter())],
        }
    }
}

/// Iterator returned by [`DocNode::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, String, indexmap::map::Iter<'a, String, DocNode>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, String, &'a DocNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, prefix, iter) = self.stack.last_mut()?;
            let Some((key, node)) = iter.next() else {
                self.stack.pop();
                continue;
            };
            let depth = *depth;
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            if !node.children.is_empty() {
                self.stack
                    .push((depth + 1, path.clone(), node.children.iter()));
            }
            return Some((depth, path, node));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocNode {
        let mut b = DocNode::new("b", "B is B");
        b.kind = DocKind::Record;
        b.insert(DocNode::new("c", ""));
        let mut root = DocNode::root("");
        root.insert(DocNode::new("x1", "x1 is int"));
        root.insert(b);
        root.insert(DocNode::new("z", ""));
        root
    }

    #[test]
    fn test_get_path() {
        let root = sample();
        assert_eq!(root.get_path("").map(|n| n.key.as_str()), Some(""));
        assert_eq!(root.get_path("b").map(|n| n.comment.as_str()), Some("B is B"));
        assert_eq!(root.get_path("b.c").map(|n| n.key.as_str()), Some("c"));
        assert!(root.get_path("b.d").is_none());
        assert!(root.get_path("x1.c").is_none());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut root = sample();
        let old = root.insert(DocNode::new("x1", "replaced"));
        assert_eq!(old.map(|n| n.comment), Some("x1 is int".to_string()));

        let keys: Vec<_> = root.children.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x1", "b", "z"]);
        assert_eq!(root.child("x1").map(|n| n.comment.as_str()), Some("replaced"));
    }

    #[test]
    fn test_walk_is_depth_first() {
        let root = sample();
        let visited: Vec<_> = root.walk().map(|(depth, path, _)| (depth, path)).collect();
        assert_eq!(
            visited,
            vec![
                (0, "x1".to_string()),
                (0, "b".to_string()),
                (1, "b.c".to_string()),
                (0, "z".to_string()),
            ]
        );
    }
}
