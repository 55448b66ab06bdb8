//! Documentation coverage report.

use std::path::PathBuf;

use confdoc_docs::DocNode;

use super::output::{Output, Report};

/// Which keys of a schema are documented.
#[derive(Debug)]
pub struct CheckReport {
    pub source: PathBuf,
    pub type_name: String,
    /// Number of keys in the doc tree, nested keys included.
    pub total: usize,
    /// Dotted paths of keys without a comment.
    pub undocumented: Vec<String>,
}

impl CheckReport {
    pub fn from_tree(source: PathBuf, type_name: String, tree: &DocNode) -> Self {
        let mut total = 0;
        let mut undocumented = Vec::new();
        for (_, path, node) in tree.walk() {
            total += 1;
            if !node.has_comment() {
                undocumented.push(path);
            }
        }
        Self {
            source,
            type_name,
            total,
            undocumented,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.undocumented.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        let documented = self.total - self.undocumented.len();
        if !self.is_complete() {
            out.warning(&format!(
                "{} of {} keys in {} have no documentation",
                self.undocumented.len(),
                self.total,
                self.type_name
            ));
            for path in &self.undocumented {
                out.list_item(path);
            }
            out.newline();
            out.line(&format!(
                "{} documents {}/{} keys of {}",
                self.source.display(),
                documented,
                self.total,
                self.type_name
            ));
        } else {
            out.line(&format!(
                "✓ {} documents {}/{} keys of {}",
                self.source.display(),
                self.total,
                self.total,
                self.type_name
            ));
        }
    }
}
