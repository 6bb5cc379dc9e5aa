//! Component Instance - One live component and its reconciliation pass.
//!
//! # Render pass
//!
//! 1. Push a render-context frame and call the render function with props
//! 2. Walk the returned tree for descriptors (traversal order)
//! 3. Match each descriptor against the previous children, front to back:
//!    - same render function, equal props → reuse untouched
//!    - same render function, new props   → reuse and re-render
//!    - different render function         → unmount old, mount new
//!    - no previous child left            → mount new
//! 4. Unmount previous children that were not consumed
//! 5. Splice child outputs into the tree and commit it
//!
//! Matching is positional. Removing an element ahead of others shifts every
//! later match, so the later components remount even with unchanged props.
//!
//! # Independent re-renders
//!
//! A re-render started by a state setter was not requested by the parent.
//! After committing, the instance writes its new output into each ancestor's
//! committed output along its site path, then notifies the root subscribers.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::component::Descriptor;
use crate::error::{Result, RuntimeError};
use crate::hooks::{self, Cleanup, HookRecord};
use crate::node::{Node, Path, PathSegment};
use crate::reconciler::walk::find_components;
use crate::scheduler::Scheduler;

use super::Snapshot;

bitflags::bitflags! {
    /// Lifecycle state of an instance.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct InstanceFlags: u8 {
        /// The render function has returned successfully at least once.
        const RENDERED = 1 << 0;
        /// A re-render task is queued.
        const PENDING_RENDER = 1 << 1;
        const UNMOUNTED = 1 << 2;
    }
}

/// Callback fired after an externally triggered render pass.
pub(crate) type Subscriber = Rc<dyn Fn(&Node)>;

// =============================================================================
// Tree Context
// =============================================================================

/// State shared by every instance of one mounted tree.
pub(crate) struct TreeContext {
    scheduler: Scheduler,
    subscribers: RefCell<Vec<Subscriber>>,
    root: RefCell<Weak<ComponentInstance>>,
}

impl TreeContext {
    pub(crate) fn new(scheduler: Scheduler) -> Rc<Self> {
        Rc::new(Self {
            scheduler,
            subscribers: RefCell::new(Vec::new()),
            root: RefCell::new(Weak::new()),
        })
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub(crate) fn set_root(&self, root: &Rc<ComponentInstance>) {
        *self.root.borrow_mut() = Rc::downgrade(root);
    }

    pub(crate) fn subscribe(&self, subscriber: Subscriber) {
        self.subscribers.borrow_mut().push(subscriber);
    }

    pub(crate) fn clear_subscribers(&self) {
        let subscribers = std::mem::take(&mut *self.subscribers.borrow_mut());
        drop(subscribers);
    }

    fn notify(&self) {
        let root = self.root.borrow().upgrade();
        let Some(root) = root else { return };
        let output = root.output();
        // subscribers may subscribe again while running
        let subscribers: Vec<Subscriber> = self.subscribers.borrow().clone();
        tracing::trace!(subscribers = subscribers.len(), "notify root subscribers");
        for subscriber in subscribers {
            subscriber(&output);
        }
    }
}

// =============================================================================
// Component Instance
// =============================================================================

/// Where an instance's output lives inside its parent's output.
struct ParentSite {
    parent: Weak<ComponentInstance>,
    path: Option<Path>,
}

#[derive(Default)]
struct ReconcileStats {
    reused: usize,
    updated: usize,
    replaced: usize,
    created: usize,
}

pub(crate) struct ComponentInstance {
    descriptor: RefCell<Descriptor>,
    pub(crate) hooks: RefCell<Vec<HookRecord>>,
    /// Children in the order they were matched during the last pass.
    children: RefCell<Vec<Rc<ComponentInstance>>>,
    output: RefCell<Node>,
    site: RefCell<Option<ParentSite>>,
    flags: Cell<InstanceFlags>,
    tree: Rc<TreeContext>,
}

impl ComponentInstance {
    pub(crate) fn new(descriptor: Descriptor, tree: Rc<TreeContext>) -> Rc<Self> {
        Rc::new(Self {
            descriptor: RefCell::new(descriptor),
            hooks: RefCell::new(Vec::new()),
            children: RefCell::new(Vec::new()),
            output: RefCell::new(Node::Null),
            site: RefCell::new(None),
            flags: Cell::new(InstanceFlags::empty()),
            tree,
        })
    }

    pub(crate) fn name(&self) -> &'static str {
        self.descriptor.borrow().name()
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        self.tree.scheduler()
    }

    /// Last committed output.
    pub(crate) fn output(&self) -> Node {
        self.output.borrow().clone()
    }

    fn has(&self, flag: InstanceFlags) -> bool {
        self.flags.get().contains(flag)
    }

    fn set_flag(&self, flag: InstanceFlags, on: bool) {
        let mut flags = self.flags.get();
        flags.set(flag, on);
        self.flags.set(flags);
    }

    pub(crate) fn is_unmounted(&self) -> bool {
        self.has(InstanceFlags::UNMOUNTED)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.name(),
            hooks: self.hooks.borrow().iter().map(HookRecord::kind).collect(),
            children: self.children.borrow().iter().map(|child| child.snapshot()).collect(),
        }
    }

    // =========================================================================
    // State slots
    // =========================================================================

    pub(crate) fn read_state<T: Clone + 'static>(&self, index: usize) -> Option<T> {
        let hooks = self.hooks.borrow();
        match hooks.get(index) {
            Some(HookRecord::State { value }) => value.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    pub(crate) fn write_state(&self, index: usize, value: Box<dyn Any>) {
        let mut hooks = self.hooks.borrow_mut();
        if let Some(HookRecord::State { value: slot }) = hooks.get_mut(index) {
            *slot = value;
        }
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Queue a re-render. Calls before the queued task runs collapse into it.
    pub(crate) fn schedule_rerender(self: &Rc<Self>) {
        if self.is_unmounted() {
            return;
        }
        if self.has(InstanceFlags::PENDING_RENDER) {
            tracing::trace!(component = self.name(), "re-render already pending");
            return;
        }
        self.set_flag(InstanceFlags::PENDING_RENDER, true);

        let target = Rc::downgrade(self);
        self.scheduler().enqueue(move || {
            let Some(instance) = target.upgrade() else {
                return Ok(());
            };
            // unmounted, or a parent pass already rendered the latest state
            if instance.is_unmounted() || !instance.has(InstanceFlags::PENDING_RENDER) {
                return Ok(());
            }
            instance.render(false)
        });
    }

    /// Body of a queued effect task.
    pub(crate) fn run_effect(&self, index: usize) {
        if self.is_unmounted() {
            return;
        }
        let (previous_cleanup, effect) = match self.hooks.borrow_mut().get_mut(index) {
            Some(HookRecord::Effect { effect, cleanup, .. }) => (cleanup.take(), effect.take()),
            _ => return,
        };

        if let Some(previous_cleanup) = previous_cleanup {
            previous_cleanup();
        }
        let Some(mut effect) = effect else { return };
        let next_cleanup = effect();

        if self.is_unmounted() {
            if let Some(next_cleanup) = next_cleanup {
                next_cleanup();
            }
            return;
        }

        let mut hooks = self.hooks.borrow_mut();
        if let Some(HookRecord::Effect { effect: slot, cleanup, .. }) = hooks.get_mut(index) {
            // a render during the effect may already have stored a newer body
            if slot.is_none() {
                *slot = Some(effect);
            }
            *cleanup = next_cleanup;
        }
    }

    // =========================================================================
    // Render pass
    // =========================================================================

    /// Run the render function and reconcile its output.
    ///
    /// `triggered_by_parent` is set when a parent's reconciliation renders
    /// this instance; such passes neither propagate upward nor notify root
    /// subscribers, the parent's own commit covers both.
    pub(crate) fn render(self: &Rc<Self>, triggered_by_parent: bool) -> Result<()> {
        if self.is_unmounted() {
            return Ok(());
        }
        let first_render = !self.has(InstanceFlags::RENDERED);
        self.set_flag(InstanceFlags::PENDING_RENDER, false);

        let descriptor = self.descriptor.borrow().clone();
        tracing::trace!(component = descriptor.name(), first_render, triggered_by_parent, "render");

        let tree = {
            let guard = hooks::enter(self.clone(), first_render);
            let tree = descriptor.render_fn().call(descriptor.props())?;
            // a failed first render leaves no usable hook sequence
            self.set_flag(InstanceFlags::RENDERED, true);
            let called = guard.hooks_called();
            if !first_render {
                let hooks = self.hooks.borrow();
                if called < hooks.len() {
                    return Err(RuntimeError::HookOrder {
                        index: called,
                        expected: hooks.get(called).map(HookRecord::kind),
                        found: None,
                    });
                }
            }
            tree
        };

        let output = self.reconcile(tree)?;
        self.commit(output, triggered_by_parent);
        Ok(())
    }

    fn reconcile(self: &Rc<Self>, mut tree: Node) -> Result<Node> {
        let sites = find_components(&tree);
        let mut previous: VecDeque<Rc<ComponentInstance>> = self.children.take().into();
        let mut next = Vec::with_capacity(sites.len());
        let mut stats = ReconcileStats::default();
        let mut root_output = None;
        let mut failure = None;

        for site in sites {
            let (child, needs_render) = self.match_child(&mut previous, &site.descriptor, &mut stats);
            child.attach(self, site.path.clone());

            if needs_render {
                if let Err(err) = child.render(true) {
                    if child.has(InstanceFlags::RENDERED) {
                        next.push(child);
                    } else {
                        child.unmount();
                    }
                    failure = Some(err);
                    break;
                }
            }
            next.push(child.clone());

            let output = child.output();
            match &site.path {
                Some(path) => {
                    if let Some(slot) = tree.get_path_mut(path) {
                        *slot = output;
                    }
                }
                None => root_output = Some(output),
            }
        }

        let dropped = previous.len();
        for leftover in previous {
            leftover.unmount();
        }
        *self.children.borrow_mut() = next;

        tracing::debug!(
            component = self.name(),
            reused = stats.reused,
            updated = stats.updated,
            replaced = stats.replaced,
            created = stats.created,
            dropped,
            "reconciled"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(root_output.unwrap_or(tree)),
        }
    }

    /// Pick the instance for `descriptor` and whether it must render.
    fn match_child(
        &self,
        previous: &mut VecDeque<Rc<ComponentInstance>>,
        descriptor: &Descriptor,
        stats: &mut ReconcileStats,
    ) -> (Rc<ComponentInstance>, bool) {
        match previous.pop_front() {
            Some(old) if old.descriptor.borrow().render_fn().same(descriptor.render_fn()) => {
                let props_changed = old.descriptor.borrow().props() != descriptor.props();
                *old.descriptor.borrow_mut() = descriptor.clone();
                if props_changed {
                    stats.updated += 1;
                } else {
                    stats.reused += 1;
                }
                (old, props_changed)
            }
            Some(old) => {
                tracing::debug!(old = old.name(), new = descriptor.name(), "component replaced");
                old.unmount();
                stats.replaced += 1;
                (ComponentInstance::new(descriptor.clone(), self.tree.clone()), true)
            }
            None => {
                stats.created += 1;
                (ComponentInstance::new(descriptor.clone(), self.tree.clone()), true)
            }
        }
    }

    fn attach(&self, parent: &Rc<ComponentInstance>, path: Option<Path>) {
        *self.site.borrow_mut() = Some(ParentSite {
            parent: Rc::downgrade(parent),
            path,
        });
    }

    fn commit(self: &Rc<Self>, output: Node, triggered_by_parent: bool) {
        *self.output.borrow_mut() = output;
        if triggered_by_parent {
            return;
        }
        self.propagate_up();
        self.tree.notify();
    }

    /// Write this instance's output into every ancestor's committed output.
    fn propagate_up(self: &Rc<Self>) {
        let mut current = self.clone();
        loop {
            let site = current
                .site
                .borrow()
                .as_ref()
                .map(|site| (site.parent.upgrade(), site.path.clone()));
            let Some((Some(parent), path)) = site else { break };
            parent.splice(path.as_deref(), current.output());
            current = parent;
        }
    }

    fn splice(&self, path: Option<&[PathSegment]>, output: Node) {
        let mut committed = self.output.borrow_mut();
        match path {
            None => *committed = output,
            Some(path) => {
                if let Some(slot) = committed.get_path_mut(path) {
                    *slot = output;
                }
            }
        }
    }

    // =========================================================================
    // Unmount
    // =========================================================================

    /// Unmount children, then run this instance's effect cleanups in hook
    /// order. Later calls do nothing.
    pub(crate) fn unmount(&self) {
        if self.is_unmounted() {
            return;
        }
        self.set_flag(InstanceFlags::UNMOUNTED, true);
        self.set_flag(InstanceFlags::PENDING_RENDER, false);

        for child in self.children.take() {
            child.unmount();
        }

        let cleanups: Vec<Cleanup> = self
            .hooks
            .borrow_mut()
            .iter_mut()
            .filter_map(|record| match record {
                HookRecord::Effect { cleanup, .. } => cleanup.take(),
                _ => None,
            })
            .collect();
        tracing::debug!(component = self.name(), cleanups = cleanups.len(), "unmount");
        for cleanup in cleanups {
            cleanup();
        }

        self.site.borrow_mut().take();
    }
}
