//! Shared helpers for the integration tests.
//!
//! Each test runs on its own thread, so the thread-local log starts empty.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use spark_hooks::StateSetter;

thread_local! {
    static LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Append a lifecycle entry.
pub fn record(entry: impl Into<String>) {
    LOG.with(|log| log.borrow_mut().push(entry.into()));
}

/// Drain every entry recorded so far.
pub fn take_log() -> Vec<String> {
    LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

/// Holds the setter a component handed out on its latest render.
pub type Slot<T> = Rc<RefCell<Option<StateSetter<T>>>>;

pub fn new_slot<T>() -> Slot<T> {
    Rc::new(RefCell::new(None))
}

pub fn store<T>(slot: &Slot<T>, setter: StateSetter<T>) {
    *slot.borrow_mut() = Some(setter);
}

/// Call the stored setter.
pub fn set<T: Clone + 'static>(slot: &Slot<T>, value: T) {
    let setter = slot.borrow().clone();
    setter.expect("component has not rendered").set(value);
}
