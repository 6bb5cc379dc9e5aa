//! `use_state` - A persistent value with a setter that schedules a re-render.

use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::error::{HookKind, Result};
use crate::hooks::context::next_hook;
use crate::hooks::record::{HookRecord, order_error, read_value};
use crate::reconciler::ComponentInstance;

/// Writes one state slot of one instance.
///
/// Every call to [`set`](StateSetter::set) schedules a re-render, even when
/// the new value equals the old one. Calls made after the instance unmounted
/// are ignored.
pub struct StateSetter<T> {
    instance: Weak<ComponentInstance>,
    index: usize,
    _marker: PhantomData<fn(T)>,
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.clone(),
            index: self.index,
            _marker: PhantomData,
        }
    }
}

impl<T: Clone + 'static> StateSetter<T> {
    fn live_instance(&self) -> Option<Rc<ComponentInstance>> {
        let instance = self.instance.upgrade()?;
        if instance.is_unmounted() {
            tracing::trace!(index = self.index, "state set after unmount ignored");
            return None;
        }
        Some(instance)
    }

    /// Replace the value and schedule a re-render.
    pub fn set(&self, value: T) {
        let Some(instance) = self.live_instance() else { return };
        instance.write_state(self.index, Box::new(value));
        instance.schedule_rerender();
    }

    /// Replace the value with `f(current)` and schedule a re-render.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let Some(instance) = self.live_instance() else { return };
        let Some(current) = instance.read_state::<T>(self.index) else { return };
        instance.write_state(self.index, Box::new(f(&current)));
        instance.schedule_rerender();
    }

    /// Current value, or `None` once the instance is gone.
    pub fn get(&self) -> Option<T> {
        self.live_instance()?.read_state::<T>(self.index)
    }
}

/// Declare a state cell.
///
/// Returns the current value and a setter bound to this slot. `initial` is
/// only used on the first render.
///
/// ```ignore
/// fn counter(_: &Props) -> RenderResult {
///     let (count, set_count) = use_state(0i64)?;
///     Ok(Node::map([("count", Node::from(count)), ("inc", Node::from(Opaque::new(set_count)))]))
/// }
/// ```
pub fn use_state<T: Clone + 'static>(initial: T) -> Result<(T, StateSetter<T>)> {
    let slot = next_hook("use_state")?;

    let value = if slot.first_render {
        slot.instance.hooks.borrow_mut().push(HookRecord::State {
            value: Box::new(initial.clone()),
        });
        initial
    } else {
        let hooks = slot.instance.hooks.borrow();
        let value = match hooks.get(slot.index) {
            Some(HookRecord::State { value }) => read_value::<T>(slot.index, value.as_ref())?,
            other => return Err(order_error(slot.index, other, HookKind::State)),
        };
        value
    };

    let setter = StateSetter {
        instance: Rc::downgrade(&slot.instance),
        index: slot.index,
        _marker: PhantomData,
    };
    Ok((value, setter))
}
