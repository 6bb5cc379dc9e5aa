//! Output Tree - The value a component renders.
//!
//! A render function returns a [`Node`]: plain data built from two container
//! kinds (ordered lists and insertion-ordered maps), scalar leaves, opaque
//! leaves, and embedded component descriptors.
//!
//! The set of containers is closed. The reconciler only descends into
//! [`Node::List`] and [`Node::Map`]; every other variant stops the walk.
//!
//! ```text
//! Map {
//!     "title": Text("clock"),
//!     "time":  Component(CurrentTime)   ← replaced by the child's output
//!     "rows":  List [ Int(1), Component(Row) ]
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::component::Descriptor;
use crate::equality::values_equal;

// =============================================================================
// Opaque Leaf
// =============================================================================

/// A shared, type-erased leaf value.
///
/// Two opaque leaves are equal only when they point at the same allocation,
/// which makes them the way to pass callbacks or handles through props.
#[derive(Clone)]
pub struct Opaque {
    value: Rc<dyn Any>,
    type_name: &'static str,
}

impl Opaque {
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Rc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the inner value if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Pointer identity.
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque<{}>", self.type_name)
    }
}

// =============================================================================
// Paths
// =============================================================================

/// One step into a container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// Location of a node inside a tree, from the root down.
pub type Path = Vec<PathSegment>;

// =============================================================================
// Node
// =============================================================================

/// A rendered value.
#[derive(Clone, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Opaque(Opaque),
    List(Vec<Node>),
    Map(IndexMap<String, Node>),
    /// A component to mount at this position.
    Component(Descriptor),
}

impl Node {
    /// Build a list node.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        Node::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map node. Entries keep their insertion order.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Node>,
    {
        Node::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::Float(_) => "float",
            Node::Text(_) => "text",
            Node::Opaque(_) => "opaque",
            Node::List(_) => "list",
            Node::Map(_) => "map",
            Node::Component(_) => "component",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Whether the walker descends into this node.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::List(_) | Node::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Node::Float(value) => Some(*value),
            Node::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Descriptor> {
        match self {
            Node::Component(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Look up a map entry.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|entries| entries.get(key))
    }

    /// Look up a list element.
    pub fn at(&self, index: usize) -> Option<&Node> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Follow `path` from this node.
    pub fn get_path(&self, path: &[PathSegment]) -> Option<&Node> {
        path.iter().try_fold(self, |node, segment| match (node, segment) {
            (Node::List(items), PathSegment::Index(index)) => items.get(*index),
            (Node::Map(entries), PathSegment::Key(key)) => entries.get(key),
            _ => None,
        })
    }

    /// Follow `path` from this node, mutably.
    pub fn get_path_mut(&mut self, path: &[PathSegment]) -> Option<&mut Node> {
        let mut node = self;
        for segment in path {
            node = match (node, segment) {
                (Node::List(items), PathSegment::Index(index)) => items.get_mut(*index)?,
                (Node::Map(entries), PathSegment::Key(key)) => entries.get_mut(key)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("Null"),
            Node::Bool(value) => write!(f, "{value:?}"),
            Node::Int(value) => write!(f, "{value:?}"),
            Node::Float(value) => write!(f, "{value:?}"),
            Node::Text(value) => write!(f, "{value:?}"),
            Node::Opaque(value) => value.fmt(f),
            Node::List(items) => f.debug_list().entries(items).finish(),
            Node::Map(entries) => f.debug_map().entries(entries).finish(),
            Node::Component(descriptor) => descriptor.fmt(f),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int(value.into())
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Int(value.into())
    }
}

impl From<usize> for Node {
    fn from(value: usize) -> Self {
        Node::Int(value as i64)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Float(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<Opaque> for Node {
    fn from(value: Opaque) -> Self {
        Node::Opaque(value)
    }
}

impl From<Descriptor> for Node {
    fn from(value: Descriptor) -> Self {
        Node::Component(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::List(value)
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(value: IndexMap<String, Node>) -> Self {
        Node::Map(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Null, Into::into)
    }
}

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(value) => serializer.serialize_bool(*value),
            Node::Int(value) => serializer.serialize_i64(*value),
            Node::Float(value) => serializer.serialize_f64(*value),
            Node::Text(value) => serializer.serialize_str(value),
            Node::Opaque(value) => serializer.serialize_str(&format!("<{}>", value.type_name())),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Component(descriptor) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$component", descriptor.name())?;
                map.end()
            }
        }
    }
}
