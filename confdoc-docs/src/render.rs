use crate::node::DocNode;

/// One line of the flat reference: a key and its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    pub comment: String,
    pub key: String,
}

/// List the direct children of `node` in declaration order.
///
/// Nested records are not expanded; pass a child node to render it.
pub fn render(node: &DocNode) -> Vec<DocEntry> {
    node.children
        .values()
        .map(|child| DocEntry {
            comment: child.comment.clone(),
            key: child.key.clone(),
        })
        .collect()
}

/// Render the reference text for the direct children of `node`.
///
/// Each entry is written as its comment lines prefixed with `# `, followed
/// by `[key]` and a blank line.
pub fn render_reference(node: &DocNode) -> String {
    let mut out = String::new();
    for entry in render(node) {
        for line in entry.comment.lines() {
            if line.is_empty() {
                out.push_str("#\n");
            } else {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push('[');
        out.push_str(&entry.key);
        out.push_str("]\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reference() {
        let mut root = DocNode::root("");
        root.insert(DocNode::new("x1", "x1 is int"));
        root.insert(DocNode::new("b", "first\n\nthird"));
        root.insert(DocNode::new("c", ""));

        insta::assert_snapshot!(render_reference(&root), @r"
        # x1 is int
        [x1]

        # first
        #
        # third
        [b]

        [c]
        ");
    }

    #[test]
    fn test_render_empty_node() {
        assert!(render(&DocNode::root("")).is_empty());
        assert_eq!(render_reference(&DocNode::new("leaf", "doc")), "");
    }
}
