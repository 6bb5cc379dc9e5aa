//! `use_effect` - Side effects that run after the render that declared them.
//!
//! An effect is due on the first render, on every render when no
//! dependencies are given, and whenever its dependencies change. A due effect
//! is queued on the tree's scheduler during render; the queued task runs the
//! previous cleanup, then the effect, then keeps whatever cleanup it returns.

use std::rc::Rc;

use crate::error::{HookKind, Result};
use crate::hooks::context::next_hook;
use crate::hooks::record::{Deps, EffectFn, HookRecord, IntoCleanup, order_error};
use crate::reconciler::ComponentInstance;

/// Declare an effect.
///
/// `deps = None` reruns the effect after every render. `Some(deps![])` runs
/// it once after mount; its cleanup runs at unmount.
///
/// ```ignore
/// let scheduler = current_scheduler()?;
/// use_effect(move || {
///     let timer = scheduler.set_interval(1, { let tick = tick.clone(); move || tick.update(|n| n + 1) });
///     cleanup(move || { timer.cancel(); })
/// }, Some(deps![]))?;
/// ```
pub fn use_effect<F, R>(mut effect: F, deps: Option<Deps>) -> Result<()>
where
    F: FnMut() -> R + 'static,
    R: IntoCleanup,
{
    let slot = next_hook("use_effect")?;
    let body: EffectFn = Box::new(move || effect().into_cleanup());

    if slot.first_render {
        slot.instance.hooks.borrow_mut().push(HookRecord::Effect {
            effect: Some(body),
            deps,
            cleanup: None,
        });
        queue_effect(&slot.instance, slot.index);
        return Ok(());
    }

    let due = match slot.instance.hooks.borrow_mut().get_mut(slot.index) {
        Some(HookRecord::Effect { effect, deps: stored, .. }) => {
            let due = match (&deps, stored.as_ref()) {
                (None, _) => true,
                (Some(next), Some(previous)) => previous.changed(next),
                (Some(_), None) => true,
            };
            *stored = deps;
            if due {
                *effect = Some(body);
            }
            due
        }
        other => return Err(order_error(slot.index, other.as_deref(), HookKind::Effect)),
    };

    if due {
        queue_effect(&slot.instance, slot.index);
    }
    Ok(())
}

fn queue_effect(instance: &Rc<ComponentInstance>, index: usize) {
    let target = Rc::downgrade(instance);
    instance.scheduler().enqueue(move || {
        if let Some(instance) = target.upgrade() {
            instance.run_effect(index);
        }
        Ok(())
    });
}
