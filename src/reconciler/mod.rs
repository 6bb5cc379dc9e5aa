//! Reconciler - Component instances and the tree walk that connects them.
//!
//! Each mounted component is a [`ComponentInstance`] owning its hook records,
//! its children (in match order) and its last committed output. Children are
//! matched positionally and by render-function identity; there are no keys.

mod instance;
mod walk;

pub(crate) use instance::{ComponentInstance, TreeContext};

use crate::error::HookKind;

/// Read-only view of a mounted instance and its descendants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Type name of the render function.
    pub name: &'static str,
    /// Hook kinds in slot order.
    pub hooks: Vec<HookKind>,
    pub children: Vec<Snapshot>,
}

impl Snapshot {
    /// Number of instances in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Snapshot::count).sum::<usize>()
    }
}
