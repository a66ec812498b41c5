//! Thread-local bookkeeping shared by deps and watchers.
//!
//! Watchers live in an arena keyed by [`WatcherId`]; deps only store ids, so a
//! torn-down watcher simply stops resolving. The evaluation stack tracks which
//! watcher is collecting dependencies right now.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::watcher::Watcher;

new_key_type! {
    pub struct WatcherId;
}

thread_local! {
    static WATCHERS: RefCell<SlotMap<WatcherId, Rc<Watcher>>> = RefCell::new(SlotMap::with_key());
    // innermost evaluation last
    static EVALUATING: RefCell<Vec<Rc<Watcher>>> = const { RefCell::new(Vec::new()) };
    static UPDATE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

pub(crate) fn insert_watcher(build: impl FnOnce(WatcherId) -> Watcher) -> Rc<Watcher> {
    WATCHERS.with(|w| {
        let mut w = w.borrow_mut();
        let id = w.insert_with_key(|id| Rc::new(build(id)));
        w[id].clone()
    })
}

pub(crate) fn remove_watcher(id: WatcherId) {
    // Take the Rc out before dropping it so a Drop impl never runs under the borrow.
    let removed = WATCHERS.with(|w| w.borrow_mut().remove(id));
    drop(removed);
}

/// Looks up a live watcher.
pub fn watcher(id: WatcherId) -> Option<Rc<Watcher>> {
    WATCHERS.with(|w| w.borrow().get(id).cloned())
}

/// Number of watchers that have not been torn down on this thread.
pub fn live_watchers() -> usize {
    WATCHERS.with(|w| w.borrow().len())
}

/// The watcher currently collecting dependencies, if any.
pub fn current_watcher() -> Option<Rc<Watcher>> {
    EVALUATING.with(|s| s.borrow().last().cloned())
}

/// Marks a watcher as evaluating until dropped.
///
/// Frames nest: dropping an inner frame hands tracking back to the outer
/// watcher instead of clearing it.
pub(crate) struct EvalFrame(());

impl EvalFrame {
    pub(crate) fn enter(watcher: Rc<Watcher>) -> Self {
        EVALUATING.with(|s| s.borrow_mut().push(watcher));
        EvalFrame(())
    }
}

impl Drop for EvalFrame {
    fn drop(&mut self) {
        EVALUATING.with(|s| {
            s.borrow_mut().pop();
        });
    }
}

/// Counts how deeply `Watcher::update` calls are nested on this thread.
pub(crate) struct UpdateDepth(());

impl UpdateDepth {
    /// Returns `None` when entering would go past `limit`.
    pub(crate) fn enter(limit: Option<usize>) -> Option<Self> {
        let depth = UPDATE_DEPTH.with(|d| d.get()) + 1;
        if limit.is_some_and(|limit| depth > limit) {
            return None;
        }
        UPDATE_DEPTH.with(|d| d.set(depth));
        Some(UpdateDepth(()))
    }
}

impl Drop for UpdateDepth {
    fn drop(&mut self) {
        UPDATE_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
