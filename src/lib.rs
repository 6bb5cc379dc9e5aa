//! # spark-hooks
//!
//! Minimal hooks-based component runtime.
//!
//! Components are plain functions from [`Props`] to a [`Node`] tree. They keep
//! state between renders with hooks, and may place other components anywhere
//! in the tree they return. The runtime mounts those nested components,
//! matches them against the previous render's children, and keeps one
//! committed output value in sync as state changes.
//!
//! ## Architecture
//!
//! ```text
//! mount(descriptor)
//!   └─ ComponentInstance::render
//!        ├─ render function (hooks read/write the instance's records)
//!        ├─ walk output tree → descriptors
//!        ├─ match children positionally → reuse / replace / create / drop
//!        └─ commit output → notify Root subscribers
//!
//! Scheduler: setters queue re-renders, effects queue their bodies;
//!            Root::flush / Root::advance run them.
//! ```
//!
//! Everything is single-threaded. Nothing runs in the background: queued work
//! runs when the owner calls [`Root::flush`] or [`Root::advance`].
//!
//! ## Example
//!
//! ```ignore
//! use spark_hooks::{cleanup, component, current_scheduler, deps, mount, use_effect, use_state};
//! use spark_hooks::{Node, Props, RenderResult};
//!
//! fn ticker(props: &Props) -> RenderResult {
//!     let every = props.int("every").unwrap_or(1);
//!     let (count, set_count) = use_state(0i64)?;
//!     let scheduler = current_scheduler()?;
//!     use_effect(move || {
//!         let set_count = set_count.clone();
//!         let timer = scheduler.set_interval(every as u64, move || set_count.update(|n| n + 1));
//!         cleanup(move || { timer.cancel(); })
//!     }, Some(deps![every]))?;
//!     Ok(Node::from(count))
//! }
//!
//! let root = mount(component(ticker, Props::new().with("every", 2)))?;
//! root.advance(6)?;
//! assert_eq!(root.current(), Node::Int(3));
//! ```
//!
//! ## Modules
//!
//! - [`node`] - Output tree, opaque leaves, paths
//! - [`props`] - Component props
//! - [`component`] - Render functions and descriptors
//! - [`hooks`] - `use_state`, `use_memo`, `use_effect`
//! - [`scheduler`] - Task queue and virtual timers
//! - [`reconciler`] - Instances and positional child matching
//! - [`root`] - Mounting and subscriptions

pub mod component;
pub mod equality;
pub mod error;
pub mod hooks;
pub mod node;
pub mod props;
pub mod reconciler;
pub mod root;
pub mod scheduler;

pub use component::{
    BoxedRenderFn, Descriptor, RenderFn, RenderFnPtr, RenderResult, component,
    component_with_children,
};
pub use error::{HookKind, Result, RuntimeError};
pub use hooks::{
    Cleanup, Deps, IntoCleanup, StateSetter, cleanup, current_scheduler, is_rendering,
    use_effect, use_memo, use_state,
};
pub use node::{Node, Opaque, Path, PathSegment};
pub use props::Props;
pub use reconciler::Snapshot;
pub use root::{MountOptions, Root, mount, mount_with};
pub use scheduler::{Scheduler, TimerHandle};
