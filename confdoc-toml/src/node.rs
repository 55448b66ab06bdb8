use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};

/// The payload of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    /// A scalar, an array or an inline table kept as one value.
    Value(toml::Value),
    /// A table whose entries can carry their own comments.
    Table(IndexMap<String, Node>),
}

/// A serialized configuration value with an optional comment on every node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    value: NodeValue,
    comment: Option<String>,
}

impl Node {
    /// An empty table.
    pub fn table() -> Self {
        Self {
            value: NodeValue::Table(IndexMap::new()),
            comment: None,
        }
    }

    /// Serialize `value` into a node tree. The root must be a table.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = toml::Value::try_from(value).map_err(|e| Box::new(Error::Encode(e)))?;
        Self::from_root(value)
    }

    /// Parse TOML text into a node tree.
    pub fn parse(src: &str) -> Result<Self> {
        Self::parse_with_filename(src, "<input>")
    }

    /// Parse TOML text, using `filename` in diagnostics.
    pub fn parse_with_filename(src: &str, filename: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(src).map_err(|e| Error::parse(src, filename, e))?;
        Ok(Self::from(toml::Value::Table(table)))
    }

    fn from_root(value: toml::Value) -> Result<Self> {
        if !value.is_table() {
            return Err(Box::new(Error::RootNotTable {
                found: value.type_str().to_string(),
            }));
        }
        Ok(Self::from(value))
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    /// The scalar or array held by a leaf.
    pub fn as_value(&self) -> Option<&toml::Value> {
        match &self.value {
            NodeValue::Value(value) => Some(value),
            NodeValue::Table(_) => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self.value, NodeValue::Table(_))
    }

    pub fn entries(&self) -> Option<&IndexMap<String, Node>> {
        match &self.value {
            NodeValue::Table(entries) => Some(entries),
            NodeValue::Value(_) => None,
        }
    }

    pub fn entries_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match &mut self.value {
            NodeValue::Table(entries) => Some(entries),
            NodeValue::Value(_) => None,
        }
    }

    /// Keys of a table in insertion order; empty for leaves.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries()
            .into_iter()
            .flat_map(|entries| entries.keys().map(String::as_str))
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries()?.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries_mut()?.get_mut(key)
    }

    /// Insert an entry into a table. Returns `false` on a leaf.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> bool {
        match self.entries_mut() {
            Some(entries) => {
                entries.insert(key.into(), node);
                true
            }
            None => false,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Attach a comment to this node. An empty comment removes it.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        self.comment = (!comment.is_empty()).then_some(comment);
    }

    /// Drop all comments and return the plain value.
    pub fn into_value(self) -> toml::Value {
        match self.value {
            NodeValue::Value(value) => value,
            NodeValue::Table(entries) => toml::Value::Table(
                entries
                    .into_iter()
                    .map(|(key, node)| (key, node.into_value()))
                    .collect(),
            ),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::table()
    }
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        let value = match value {
            toml::Value::Table(table) => NodeValue::Table(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
            other => NodeValue::Value(other),
        };
        Self {
            value,
            comment: None,
        }
    }
}
