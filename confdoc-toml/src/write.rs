//! Rendering commented node trees as TOML text.

use std::fmt;

use indexmap::IndexMap;

use crate::node::{Node, NodeValue};

/// Line-oriented output buffer.
#[derive(Debug, Default)]
struct TomlWriter {
    buffer: String,
}

impl TomlWriter {
    fn line(&mut self, s: &str) {
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Separate sections with a single blank line.
    fn blank(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with("\n\n") {
            self.buffer.push('\n');
        }
    }

    fn comment(&mut self, comment: Option<&str>) {
        for line in comment.into_iter().flat_map(str::lines) {
            if line.is_empty() {
                self.line("#");
            } else {
                self.line(&format!("# {line}"));
            }
        }
    }

    fn table(&mut self, path: &mut Vec<String>, entries: &IndexMap<String, Node>) {
        for (key, node) in entries {
            if let NodeValue::Value(value) = node.value() {
                self.comment(node.comment());
                self.line(&format!("{} = {}", format_key(key), value));
            }
        }

        for (key, node) in entries {
            if let NodeValue::Table(children) = node.value() {
                path.push(format_key(key));
                self.blank();
                self.comment(node.comment());
                self.line(&format!("[{}]", path.join(".")));
                self.table(path, children);
                path.pop();
            }
        }
    }

    fn build(self) -> String {
        self.buffer
    }
}

/// Quote a key unless it is a valid bare key.
fn format_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        toml::Value::String(key.to_string()).to_string()
    }
}

impl Node {
    /// Serialize this tree as TOML, writing every comment above its key.
    ///
    /// Scalar entries of a table come before its sub-tables. A leaf root is
    /// written as its bare value.
    pub fn to_toml_string(&self) -> String {
        let mut writer = TomlWriter::default();
        writer.comment(self.comment());
        match self.value() {
            NodeValue::Table(entries) => {
                if self.comment().is_some() {
                    writer.blank();
                }
                writer.table(&mut Vec::new(), entries);
            }
            NodeValue::Value(value) => writer.line(&value.to_string()),
        }
        writer.build()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_toml_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_key() {
        assert_eq!(format_key("listen-port"), "listen-port");
        assert_eq!(format_key("snake_case_1"), "snake_case_1");
        assert_eq!(format_key("has space"), "\"has space\"");
        assert_eq!(format_key(""), "\"\"");
    }

    #[test]
    fn test_scalars_before_tables() {
        let mut node =
            Node::parse("[server]\nport = 80\n\n[server.tls]\ncert = \"a.pem\"\n").unwrap();
        node.insert("debug", Node::from(toml::Value::Boolean(false)));
        node.set_comment("Generated configuration.\nEdit with care.");
        if let Some(server) = node.get_mut("server") {
            server.set_comment("HTTP server");
        }

        insta::assert_snapshot!(node.to_toml_string(), @r#"
        # Generated configuration.
        # Edit with care.

        debug = false

        # HTTP server
        [server]
        port = 80

        [server.tls]
        cert = "a.pem"
        "#);
    }

    #[test]
    fn test_output_parses_back() {
        let src = "name = \"x\"\nlist = [1, 2]\n[\"odd key\"]\nv = 1.5\n[b.c]\nd = true\n";
        let node = Node::parse(src).unwrap();
        let reparsed = Node::parse(&node.to_toml_string()).unwrap();
        assert_eq!(reparsed, node);
    }
}
