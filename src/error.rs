//! Runtime errors.
//!
//! Every error here is a usage error in a render function or at the mount
//! site. They are raised synchronously and propagate out of `render`,
//! `mount`, `flush` and `advance`; nothing is retried.

use std::fmt;

use thiserror::Error;

/// The kind of a hook record, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    State,
    Memo,
    Effect,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::State => f.write_str("state"),
            HookKind::Memo => f.write_str("memo"),
            HookKind::Effect => f.write_str("effect"),
        }
    }
}

/// Errors raised by the component runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A hook primitive was called while no component was rendering.
    #[error("{hook} hook called outside of a component render")]
    NoRenderContext { hook: &'static str },

    /// The hook at `index` is not the one recorded on the first render.
    ///
    /// `expected` is `None` when the render called more hooks than the first
    /// render did; `found` is `None` when it called fewer.
    #[error("hooks must not change between renders: at index {index} expected {}, found {}",
        display_kind(.expected), display_kind(.found))]
    HookOrder {
        index: usize,
        expected: Option<HookKind>,
        found: Option<HookKind>,
    },

    /// The hook at `index` holds a value of a different type.
    #[error("hook at index {index} changed its value type (expected {expected})")]
    HookType { index: usize, expected: &'static str },

    /// `mount` was given something other than a component descriptor.
    #[error("mount expects a component descriptor, got {found}")]
    NotAComponent { found: &'static str },

    /// A single flush ran more tasks than the configured budget.
    #[error("scheduler ran {budget} tasks without going idle")]
    FlushBudgetExceeded { budget: usize },
}

fn display_kind(kind: &Option<HookKind>) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => "no hook".to_string(),
    }
}

/// Result alias used throughout the runtime.
pub type Result<T> = std::result::Result<T, RuntimeError>;
