//! Hook primitives observed through a mounted tree.
//!
//! Run with: cargo test --test hooks

mod common;

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use spark_hooks::{
    HookKind, Node, Props, RenderResult, RuntimeError, cleanup, component, deps, mount,
    use_effect, use_memo, use_state,
};

use common::{Slot, new_slot, record, set, store, take_log};

// =============================================================================
// Render context
// =============================================================================

#[test]
fn test_hooks_outside_render_fail() {
    assert!(matches!(
        use_state(0i64),
        Err(RuntimeError::NoRenderContext { hook: "use_state" })
    ));
    assert_eq!(
        use_memo(|| 1i64, deps![]),
        Err(RuntimeError::NoRenderContext { hook: "use_memo" })
    );
    assert_eq!(
        use_effect(|| {}, None),
        Err(RuntimeError::NoRenderContext { hook: "use_effect" })
    );
}

#[test]
fn test_mount_rejects_plain_values() {
    let err = mount(Node::Int(1)).err();
    assert_eq!(err, Some(RuntimeError::NotAComponent { found: "int" }));
}

// =============================================================================
// Hook order
// =============================================================================

#[test]
fn test_hook_order_is_stable_across_renders() {
    let slot: Slot<i64> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (count, set_count) = use_state(0i64)?;
            store(&slot, set_count);
            let doubled = use_memo(|| count * 2, deps![count])?;
            use_effect(|| {}, None)?;
            Ok(Node::from(doubled))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    let kinds = vec![HookKind::State, HookKind::Memo, HookKind::Effect];
    assert_eq!(root.inspect().hooks, kinds);

    set(&slot, 4);
    root.flush().unwrap();
    assert_eq!(root.current(), Node::Int(8));
    assert_eq!(root.inspect().hooks, kinds, "re-render must reuse the same slots");
}

#[test]
fn test_conditional_hook_changes_kind_at_index() {
    let slot: Slot<bool> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (extra, set_extra) = use_state(false)?;
            store(&slot, set_extra);
            if extra {
                use_memo(|| 1i64, deps![])?;
            }
            use_effect(|| {}, Some(deps![]))?;
            Ok(Node::Null)
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    root.flush().unwrap();

    set(&slot, true);
    assert_eq!(
        root.flush(),
        Err(RuntimeError::HookOrder {
            index: 1,
            expected: Some(HookKind::Effect),
            found: Some(HookKind::Memo),
        })
    );
}

#[test]
fn test_fewer_hooks_than_first_render() {
    let slot: Slot<bool> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (skip, set_skip) = use_state(false)?;
            store(&slot, set_skip);
            if !skip {
                use_memo(|| 1i64, deps![])?;
            }
            Ok(Node::Null)
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    set(&slot, true);
    assert_eq!(
        root.flush(),
        Err(RuntimeError::HookOrder {
            index: 1,
            expected: Some(HookKind::Memo),
            found: None,
        })
    );
}

#[test]
fn test_more_hooks_than_first_render() {
    let slot: Slot<bool> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (extra, set_extra) = use_state(false)?;
            store(&slot, set_extra);
            if extra {
                use_state(0i64)?;
            }
            Ok(Node::Null)
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    set(&slot, true);
    assert_eq!(
        root.flush(),
        Err(RuntimeError::HookOrder {
            index: 1,
            expected: None,
            found: Some(HookKind::State),
        })
    );
}

#[test]
fn test_state_type_change_at_same_slot() {
    let slot: Slot<bool> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (text_mode, set_mode) = use_state(false)?;
            store(&slot, set_mode);
            if text_mode {
                use_state(String::new())?;
            } else {
                use_state(0i64)?;
            }
            Ok(Node::Null)
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    set(&slot, true);
    assert_eq!(
        root.flush(),
        Err(RuntimeError::HookType {
            index: 1,
            expected: std::any::type_name::<String>(),
        })
    );
}

// =============================================================================
// use_state
// =============================================================================

#[test]
fn test_setter_calls_coalesce_into_one_render() {
    let slot: Slot<i64> = new_slot();
    let renders = Rc::new(Cell::new(0usize));
    let app = {
        let slot = slot.clone();
        let renders = renders.clone();
        move |_: &Props| -> RenderResult {
            renders.set(renders.get() + 1);
            let (value, set_value) = use_state(0i64)?;
            store(&slot, set_value);
            Ok(Node::from(value))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    assert_eq!(renders.get(), 1);

    set(&slot, 1);
    set(&slot, 2);
    assert_eq!(root.scheduler().pending_tasks(), 1, "second set must not queue again");
    assert_eq!(root.current(), Node::Int(0), "nothing renders before a flush");

    root.flush().unwrap();
    assert_eq!(renders.get(), 2);
    assert_eq!(root.current(), Node::Int(2));
}

#[test]
fn test_setting_equal_value_still_renders() {
    let slot: Slot<i64> = new_slot();
    let renders = Rc::new(Cell::new(0usize));
    let app = {
        let slot = slot.clone();
        let renders = renders.clone();
        move |_: &Props| -> RenderResult {
            renders.set(renders.get() + 1);
            let (value, set_value) = use_state(3i64)?;
            store(&slot, set_value);
            Ok(Node::from(value))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    set(&slot, 3);
    root.flush().unwrap();
    assert_eq!(renders.get(), 2);
}

#[test]
fn test_update_reads_latest_value() {
    let slot: Slot<i64> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (value, set_value) = use_state(10i64)?;
            store(&slot, set_value);
            Ok(Node::from(value))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    let setter = slot.borrow().clone().unwrap();
    setter.update(|n| n + 1);
    setter.update(|n| n * 2);
    assert_eq!(setter.get(), Some(22));

    root.flush().unwrap();
    assert_eq!(root.current(), Node::Int(22));
}

#[test]
fn test_setter_after_unmount_is_ignored() {
    let slot: Slot<i64> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (value, set_value) = use_state(0i64)?;
            store(&slot, set_value);
            Ok(Node::from(value))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    let setter = slot.borrow().clone().unwrap();
    root.unmount();

    setter.set(5);
    assert_eq!(setter.get(), None);
}

// =============================================================================
// use_memo
// =============================================================================

#[test]
fn test_memo_recomputes_only_when_deps_change() {
    let input: Slot<i64> = new_slot();
    let unrelated: Slot<i64> = new_slot();
    let computes = Rc::new(Cell::new(0usize));
    let fixed_computes = Rc::new(Cell::new(0usize));

    let app = {
        let input = input.clone();
        let unrelated = unrelated.clone();
        let computes = computes.clone();
        let fixed_computes = fixed_computes.clone();
        move |_: &Props| -> RenderResult {
            let (a, set_a) = use_state(1i64)?;
            let (b, set_b) = use_state(0i64)?;
            store(&input, set_a);
            store(&unrelated, set_b);

            let counter = computes.clone();
            let scaled = use_memo(
                move || {
                    counter.set(counter.get() + 1);
                    a * 10
                },
                deps![a],
            )?;
            let fixed_counter = fixed_computes.clone();
            let label = use_memo(
                move || {
                    fixed_counter.set(fixed_counter.get() + 1);
                    format!("first a = {a}")
                },
                deps![],
            )?;

            Ok(Node::map([
                ("scaled", Node::from(scaled)),
                ("b", Node::from(b)),
                ("label", Node::from(label)),
            ]))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    assert_eq!(computes.get(), 1);

    set(&unrelated, 7);
    root.flush().unwrap();
    assert_eq!(computes.get(), 1, "unrelated state must not recompute");
    assert_eq!(root.current().get("b"), Some(&Node::Int(7)));

    set(&input, 2);
    root.flush().unwrap();
    assert_eq!(computes.get(), 2);
    assert_eq!(root.current().get("scaled"), Some(&Node::Int(20)));

    assert_eq!(fixed_computes.get(), 1, "empty deps never recompute");
    assert_eq!(root.current().get("label"), Some(&Node::from("first a = 1")));
}

// =============================================================================
// use_effect
// =============================================================================

#[test]
fn test_effect_with_empty_deps_runs_once() {
    let slot: Slot<i64> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (value, set_value) = use_state(0i64)?;
            store(&slot, set_value);
            use_effect(
                || {
                    record("run");
                    cleanup(|| record("cleanup"))
                },
                Some(deps![]),
            )?;
            Ok(Node::from(value))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    assert!(take_log().is_empty(), "effects wait for a flush");

    root.flush().unwrap();
    assert_eq!(take_log(), ["run"]);

    set(&slot, 1);
    root.flush().unwrap();
    assert!(take_log().is_empty());

    root.unmount();
    assert_eq!(take_log(), ["cleanup"]);
}

#[test]
fn test_effect_without_deps_reruns_after_cleanup() {
    let slot: Slot<i64> = new_slot();
    let app = {
        let slot = slot.clone();
        move |_: &Props| -> RenderResult {
            let (value, set_value) = use_state(0i64)?;
            store(&slot, set_value);
            use_effect(
                move || {
                    record(format!("run {value}"));
                    cleanup(move || record(format!("cleanup {value}")))
                },
                None,
            )?;
            Ok(Node::from(value))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    root.flush().unwrap();
    set(&slot, 1);
    root.flush().unwrap();
    set(&slot, 2);
    root.flush().unwrap();
    root.unmount();

    assert_eq!(
        take_log(),
        ["run 0", "cleanup 0", "run 1", "cleanup 1", "run 2", "cleanup 2"]
    );
}

#[test]
fn test_effect_reruns_when_deps_change() {
    let count: Slot<i64> = new_slot();
    let noise: Slot<i64> = new_slot();
    let app = {
        let count = count.clone();
        let noise = noise.clone();
        move |_: &Props| -> RenderResult {
            let (value, set_value) = use_state(0i64)?;
            let (_, set_noise) = use_state(0i64)?;
            store(&count, set_value);
            store(&noise, set_noise);
            use_effect(
                move || {
                    record(format!("run {value}"));
                    cleanup(move || record(format!("cleanup {value}")))
                },
                Some(deps![value]),
            )?;
            Ok(Node::from(value))
        }
    };

    let root = mount(component(app, Props::new())).unwrap();
    root.flush().unwrap();
    assert_eq!(take_log(), ["run 0"]);

    set(&noise, 9);
    set(&count, 0);
    root.flush().unwrap();
    assert!(take_log().is_empty(), "equal deps must not rerun");

    set(&count, 5);
    root.flush().unwrap();
    assert_eq!(take_log(), ["cleanup 0", "run 5"]);
}

#[test]
fn test_queued_effects_do_not_run_after_unmount() {
    let app = |_: &Props| -> RenderResult {
        use_effect(|| record("run"), Some(deps![]))?;
        Ok(Node::Null)
    };

    let root = mount(component(app, Props::new())).unwrap();
    let scheduler = root.scheduler().clone();
    root.unmount();

    assert!(scheduler.is_idle());
    assert_eq!(scheduler.flush(), Ok(0));
    assert!(take_log().is_empty());
}

#[test]
fn test_effect_may_return_optional_cleanup() {
    let app = |props: &Props| -> RenderResult {
        let with_cleanup = props.bool("cleanup").unwrap_or(false);
        use_effect(
            move || with_cleanup.then(|| cleanup(|| record("cleanup"))),
            Some(deps![]),
        )?;
        Ok(Node::Null)
    };

    let root = mount(component(app, Props::new().with("cleanup", true))).unwrap();
    root.flush().unwrap();
    root.unmount();
    assert_eq!(take_log(), ["cleanup"]);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn test_latest_set_wins_with_one_render_per_flush(
        batches in prop::collection::vec(prop::collection::vec(-100i64..100, 1..5), 1..8)
    ) {
        let slot: Slot<i64> = new_slot();
        let renders = Rc::new(Cell::new(0usize));
        let app = {
            let slot = slot.clone();
            let renders = renders.clone();
            move |_: &Props| -> RenderResult {
                renders.set(renders.get() + 1);
                let (value, set_value) = use_state(0i64)?;
                store(&slot, set_value);
                Ok(Node::from(value))
            }
        };

        let root = mount(component(app, Props::new())).unwrap();
        for batch in &batches {
            for value in batch {
                set(&slot, *value);
            }
            root.flush().unwrap();
            prop_assert_eq!(root.current(), Node::Int(*batch.last().unwrap()));
        }
        prop_assert_eq!(renders.get(), batches.len() + 1);
    }
}
