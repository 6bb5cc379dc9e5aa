//! Root - Mount a component tree and observe its output.
//!
//! ```ignore
//! use spark_hooks::{component, mount, Props};
//!
//! let root = mount(component(app, Props::new()))?;
//! root.on_rendered(|output| println!("{output:?}"));
//!
//! // drive effects and state updates
//! root.flush()?;
//! root.advance(10)?;
//!
//! // run every cleanup
//! root.unmount();
//! ```

use std::rc::Rc;

use crate::error::{Result, RuntimeError};
use crate::node::Node;
use crate::reconciler::{ComponentInstance, Snapshot, TreeContext};
use crate::scheduler::{DEFAULT_FLUSH_BUDGET, Scheduler};

// =============================================================================
// Options
// =============================================================================

/// Settings for one mounted tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountOptions {
    /// Tasks a single flush may run before it fails with
    /// [`RuntimeError::FlushBudgetExceeded`].
    pub flush_budget: usize,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            flush_budget: DEFAULT_FLUSH_BUDGET,
        }
    }
}

impl MountOptions {
    pub fn with_flush_budget(mut self, flush_budget: usize) -> Self {
        self.flush_budget = flush_budget;
        self
    }
}

// =============================================================================
// Root Handle
// =============================================================================

/// Handle to a mounted tree.
///
/// Dropping the handle unmounts the tree.
pub struct Root {
    instance: Rc<ComponentInstance>,
    tree: Rc<TreeContext>,
}

/// Mount `node`, which must be a component descriptor, with default options.
pub fn mount(node: Node) -> Result<Root> {
    mount_with(node, MountOptions::default())
}

/// Mount `node` and render it synchronously.
///
/// The output is available from [`Root::current`] as soon as this returns.
/// Effects declared by the first render are queued, not run.
pub fn mount_with(node: Node, options: MountOptions) -> Result<Root> {
    let descriptor = match node {
        Node::Component(descriptor) => descriptor,
        other => {
            return Err(RuntimeError::NotAComponent {
                found: other.kind_name(),
            });
        }
    };

    let tree = TreeContext::new(Scheduler::with_flush_budget(options.flush_budget));
    let instance = ComponentInstance::new(descriptor, tree.clone());
    tree.set_root(&instance);

    tracing::debug!(component = instance.name(), "mount");
    if let Err(err) = instance.render(false) {
        instance.unmount();
        tree.scheduler().clear();
        return Err(err);
    }

    Ok(Root { instance, tree })
}

impl Root {
    /// Latest committed output.
    pub fn current(&self) -> Node {
        self.instance.output()
    }

    /// Call `callback` after every render pass that was not requested by a
    /// parent component.
    pub fn on_updated(&self, callback: impl Fn(&Node) + 'static) {
        self.tree.subscribe(Rc::new(callback));
    }

    /// Call `callback` now with the current output, then like
    /// [`on_updated`](Root::on_updated).
    pub fn on_rendered(&self, callback: impl Fn(&Node) + 'static) {
        callback(&self.current());
        self.on_updated(callback);
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.tree.scheduler()
    }

    /// Run queued effects and re-renders until idle.
    pub fn flush(&self) -> Result<usize> {
        self.scheduler().flush()
    }

    /// Advance the virtual clock, firing timers and flushing after each.
    pub fn advance(&self, ticks: u64) -> Result<usize> {
        self.scheduler().advance(ticks)
    }

    pub fn is_mounted(&self) -> bool {
        !self.instance.is_unmounted()
    }

    /// Current instance tree.
    pub fn inspect(&self) -> Snapshot {
        self.instance.snapshot()
    }

    /// Unmount the tree, running every effect cleanup.
    pub fn unmount(self) {
        drop(self);
    }

    fn teardown(&self) {
        if self.instance.is_unmounted() {
            return;
        }
        tracing::debug!(component = self.instance.name(), "unmount root");
        self.instance.unmount();
        self.tree.clear_subscribers();
        self.tree.scheduler().clear();
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        self.teardown();
    }
}
