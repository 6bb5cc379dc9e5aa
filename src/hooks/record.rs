//! Hook Records - Per-instance persistent storage behind the hook primitives.

use std::any::Any;

use crate::equality::slice_equals;
use crate::error::{HookKind, RuntimeError};
use crate::node::Node;

/// Teardown returned by an effect.
pub type Cleanup = Box<dyn FnOnce()>;

/// Stored effect body.
pub(crate) type EffectFn = Box<dyn FnMut() -> Option<Cleanup>>;

/// Wrap a closure as an effect cleanup.
pub fn cleanup(f: impl FnOnce() + 'static) -> Cleanup {
    Box::new(f)
}

/// Values an effect may return.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

// =============================================================================
// Dependencies
// =============================================================================

/// Dependency list for `use_memo` and `use_effect`.
///
/// Build with the [`deps!`](crate::deps) macro.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deps(Vec<Node>);

impl Deps {
    pub fn new(values: Vec<Node>) -> Self {
        Self(values)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Length differs or any element differs.
    pub fn changed(&self, other: &Deps) -> bool {
        !slice_equals(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build a [`Deps`] list from values convertible into [`Node`].
///
/// ```ignore
/// use_effect(move || { ... }, Some(deps![counter, label.clone()]))?;
/// let doubled = use_memo(|| value * 2, deps![value])?;
/// ```
#[macro_export]
macro_rules! deps {
    () => {
        $crate::Deps::empty()
    };
    ($($dep:expr),+ $(,)?) => {
        $crate::Deps::new(vec![$($crate::Node::from($dep)),+])
    };
}

// =============================================================================
// Records
// =============================================================================

pub(crate) enum HookRecord {
    State {
        value: Box<dyn Any>,
    },
    Memo {
        value: Box<dyn Any>,
        deps: Deps,
    },
    Effect {
        /// `None` only while the scheduled task is running it.
        effect: Option<EffectFn>,
        deps: Option<Deps>,
        cleanup: Option<Cleanup>,
    },
}

impl HookRecord {
    pub(crate) fn kind(&self) -> HookKind {
        match self {
            HookRecord::State { .. } => HookKind::State,
            HookRecord::Memo { .. } => HookKind::Memo,
            HookRecord::Effect { .. } => HookKind::Effect,
        }
    }
}

/// Error for a record that does not match the hook being called.
pub(crate) fn order_error(index: usize, recorded: Option<&HookRecord>, called: HookKind) -> RuntimeError {
    RuntimeError::HookOrder {
        index,
        expected: recorded.map(HookRecord::kind),
        found: Some(called),
    }
}

/// Clone a stored value out as `T`.
pub(crate) fn read_value<T: Clone + 'static>(index: usize, value: &dyn Any) -> Result<T, RuntimeError> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or(RuntimeError::HookType {
            index,
            expected: std::any::type_name::<T>(),
        })
}
