//! Render Context - Which instance is rendering, and at which hook.
//!
//! A thread-local stack of frames. Rendering an instance pushes a frame for
//! the duration of its render function; the [`RenderGuard`] pops it again,
//! also when the render function returns an error or panics. Nested renders
//! push on top and leave the outer frame untouched.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Result, RuntimeError};
use crate::reconciler::ComponentInstance;
use crate::scheduler::Scheduler;

struct Frame {
    instance: Rc<ComponentInstance>,
    hook_index: usize,
    first_render: bool,
}

thread_local! {
    /// Frames of the renders currently on the call stack, innermost last.
    static RENDER_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Pops the frame pushed by [`enter`] when dropped.
pub(crate) struct RenderGuard {
    depth: usize,
}

impl RenderGuard {
    /// Number of hooks the render function has called so far.
    pub(crate) fn hooks_called(&self) -> usize {
        RENDER_STACK.with(|stack| {
            stack
                .borrow()
                .get(self.depth - 1)
                .map_or(0, |frame| frame.hook_index)
        })
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        RENDER_STACK.with(|stack| {
            stack.borrow_mut().truncate(self.depth - 1);
        });
    }
}

/// Bind `instance` as the rendering instance.
pub(crate) fn enter(instance: Rc<ComponentInstance>, first_render: bool) -> RenderGuard {
    RENDER_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(Frame {
            instance,
            hook_index: 0,
            first_render,
        });
        RenderGuard { depth: stack.len() }
    })
}

/// The slot a hook primitive reads or appends.
pub(crate) struct HookSlot {
    pub(crate) instance: Rc<ComponentInstance>,
    pub(crate) index: usize,
    pub(crate) first_render: bool,
}

/// Claim the next hook slot of the rendering instance.
pub(crate) fn next_hook(hook: &'static str) -> Result<HookSlot> {
    RENDER_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let frame = stack
            .last_mut()
            .ok_or(RuntimeError::NoRenderContext { hook })?;
        let index = frame.hook_index;
        frame.hook_index += 1;
        tracing::trace!(hook, index, component = frame.instance.name(), "hook read");
        Ok(HookSlot {
            instance: frame.instance.clone(),
            index,
            first_render: frame.first_render,
        })
    })
}

/// Scheduler of the tree that is rendering right now.
///
/// Lets render functions arm timers from their effects. Does not occupy a
/// hook slot.
pub fn current_scheduler() -> Result<Scheduler> {
    RENDER_STACK.with(|stack| {
        stack
            .borrow()
            .last()
            .map(|frame| frame.instance.scheduler().clone())
            .ok_or(RuntimeError::NoRenderContext { hook: "current_scheduler" })
    })
}

/// Whether any component is rendering on this thread.
pub fn is_rendering() -> bool {
    RENDER_STACK.with(|stack| !stack.borrow().is_empty())
}
