//! Equality Utilities - Shallow comparisons for memo, effect and props.
//!
//! Scalars compare by value, opaque leaves by pointer. Containers compare
//! element by element with the same rule, so a freshly built list that holds
//! the same values counts as unchanged.

use crate::node::Node;
use crate::props::Props;

/// Compare two rendered values.
pub fn values_equal(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Null, Node::Null) => true,
        (Node::Bool(x), Node::Bool(y)) => x == y,
        (Node::Int(x), Node::Int(y)) => x == y,
        (Node::Float(x), Node::Float(y)) => x == y,
        (Node::Text(x), Node::Text(y)) => x == y,
        (Node::Opaque(x), Node::Opaque(y)) => x.ptr_eq(y),
        (Node::List(x), Node::List(y)) => slice_equals(x, y),
        (Node::Map(x), Node::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, value)| y.get(key).is_some_and(|other| values_equal(value, other)))
        }
        (Node::Component(x), Node::Component(y)) => x == y,
        _ => false,
    }
}

/// Same length and equal elements at every position.
pub fn slice_equals(a: &[Node], b: &[Node]) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
}

/// Same key set and equal values per key. Key order is ignored.
pub fn shallow_equals(a: &Props, b: &Props) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
}
