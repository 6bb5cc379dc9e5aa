//! `use_memo` - Cache a computed value until its dependencies change.

use crate::error::{HookKind, Result};
use crate::hooks::context::next_hook;
use crate::hooks::record::{Deps, HookRecord, order_error, read_value};

/// Compute once, then recompute only when `deps` differs from the list
/// given on the previous render.
///
/// `compute` runs synchronously during render. The latest `deps` are always
/// stored, whether or not the value was recomputed.
pub fn use_memo<T, F>(compute: F, deps: Deps) -> Result<T>
where
    T: Clone + 'static,
    F: FnOnce() -> T,
{
    let slot = next_hook("use_memo")?;

    if slot.first_render {
        let value = compute();
        slot.instance.hooks.borrow_mut().push(HookRecord::Memo {
            value: Box::new(value.clone()),
            deps,
        });
        return Ok(value);
    }

    let changed = match slot.instance.hooks.borrow().get(slot.index) {
        Some(HookRecord::Memo { deps: previous, .. }) => previous.changed(&deps),
        other => return Err(order_error(slot.index, other, HookKind::Memo)),
    };

    // compute may read other state; no borrow is held while it runs
    let fresh = changed.then(compute);

    match slot.instance.hooks.borrow_mut().get_mut(slot.index) {
        Some(HookRecord::Memo { value, deps: stored }) => {
            *stored = deps;
            match fresh {
                Some(fresh) => {
                    tracing::trace!(index = slot.index, "memo recomputed");
                    *value = Box::new(fresh.clone());
                    Ok(fresh)
                }
                None => read_value::<T>(slot.index, value.as_ref()),
            }
        }
        other => Err(order_error(slot.index, other.as_deref(), HookKind::Memo)),
    }
}
