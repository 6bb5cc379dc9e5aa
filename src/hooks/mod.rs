//! Hooks - Persistent state for render functions.
//!
//! Hooks are the only way a render function keeps data between renders.
//! Each call claims the next slot of the rendering instance, so every render
//! of one component must call the same hooks in the same order:
//!
//! ```text
//! render #1:  use_state  use_memo  use_effect     → records [State, Memo, Effect]
//! render #2:  use_state  use_memo  use_effect     ✓
//! render #3:  use_state  use_effect               ✗ HookOrder at index 1
//! ```
//!
//! - [`use_state`] - value + setter that schedules a re-render
//! - [`use_memo`] - cached computation keyed by [`Deps`]
//! - [`use_effect`] - deferred side effect with optional cleanup
//! - [`current_scheduler`] - the tree's scheduler, for timers inside effects

mod context;
mod effect;
mod memo;
mod record;
mod state;

pub use context::{current_scheduler, is_rendering};
pub use effect::use_effect;
pub use memo::use_memo;
pub use record::{Cleanup, Deps, IntoCleanup, cleanup};
pub use state::{StateSetter, use_state};

pub(crate) use context::enter;
pub(crate) use record::HookRecord;
