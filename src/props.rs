//! Props - The input of a render function.
//!
//! Props are an insertion-ordered map from names to [`Node`] values. The
//! `children` entry is conventional: [`crate::component_with_children`]
//! stores nested nodes there and [`Props::children`] reads them back.

use indexmap::IndexMap;

use crate::equality::shallow_equals;
use crate::node::Node;

/// Name of the entry holding nested nodes.
pub const CHILDREN: &str = "children";

/// Component props.
#[derive(Clone, Debug, Default)]
pub struct Props(IndexMap<String, Node>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Node::as_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Node::as_float)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_str)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Node::as_bool)
    }

    /// Nested nodes passed by the parent, or an empty slice.
    pub fn children(&self) -> &[Node] {
        self.get(CHILDREN).and_then(Node::as_list).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl PartialEq for Props {
    fn eq(&self, other: &Self) -> bool {
        shallow_equals(self, other)
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
