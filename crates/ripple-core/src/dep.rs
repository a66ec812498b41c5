use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::runtime::{self, WatcherId};

pub type DepId = u64;

static NEXT_DEP_ID: AtomicU64 = AtomicU64::new(0);

/// Subscriber list for one observable slot: a reactive cell, or a
/// container's structural changes.
#[derive(Clone)]
pub struct Dep(Rc<Inner>);

struct Inner {
    id: DepId,
    subs: RefCell<SmallVec<[WatcherId; 4]>>,
}

impl Dep {
    pub fn new() -> Self {
        Self(Rc::new(Inner {
            id: NEXT_DEP_ID.fetch_add(1, Ordering::Relaxed),
            subs: RefCell::new(SmallVec::new()),
        }))
    }

    pub fn id(&self) -> DepId {
        self.0.id
    }

    /// Appends a subscriber. Callers are responsible for not adding twice.
    pub fn add(&self, sub: WatcherId) {
        self.0.subs.borrow_mut().push(sub);
    }

    /// Removes the first occurrence of `sub`.
    pub fn remove(&self, sub: WatcherId) {
        let mut subs = self.0.subs.borrow_mut();
        if let Some(pos) = subs.iter().position(|s| *s == sub) {
            subs.remove(pos);
        }
    }

    /// Registers the currently evaluating watcher, if there is one.
    pub fn depend(&self) {
        if let Some(watcher) = runtime::current_watcher() {
            watcher.add_dep(self);
        }
    }

    /// Updates every subscriber in subscription order.
    pub fn notify(&self) {
        // Subscribers may unsubscribe (or subscribe) while we iterate.
        let subs: SmallVec<[WatcherId; 4]> = self.0.subs.borrow().clone();
        log::trace!("dep {} notifying {} subscriber(s)", self.0.id, subs.len());
        for id in subs {
            match runtime::watcher(id) {
                Some(watcher) => watcher.update(),
                None => log::trace!("dep {}: skipping torn down watcher {:?}", self.0.id, id),
            }
        }
    }

    pub fn subscribers(&self) -> Vec<WatcherId> {
        self.0.subs.borrow().to_vec()
    }

    pub fn len(&self) -> usize {
        self.0.subs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.subs.borrow().is_empty()
    }
}

impl Default for Dep {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep")
            .field("id", &self.0.id)
            .field("subs", &self.0.subs.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<WatcherId> {
        let mut map: SlotMap<WatcherId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Dep::new();
        let b = Dep::new();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.clone().id());
    }

    #[test]
    fn test_add_keeps_order_and_duplicates() {
        let dep = Dep::new();
        let w = ids(2);
        dep.add(w[1]);
        dep.add(w[0]);
        dep.add(w[1]);
        assert_eq!(dep.subscribers(), vec![w[1], w[0], w[1]]);
    }

    #[test]
    fn test_remove_first_match_only() {
        let dep = Dep::new();
        let w = ids(2);
        dep.add(w[0]);
        dep.add(w[1]);
        dep.add(w[0]);
        dep.remove(w[0]);
        assert_eq!(dep.subscribers(), vec![w[1], w[0]]);

        dep.remove(w[1]);
        dep.remove(w[1]);
        assert_eq!(dep.len(), 1);
    }

    #[test]
    fn test_depend_without_watcher_is_noop() {
        let dep = Dep::new();
        dep.depend();
        assert!(dep.is_empty());
    }

    #[test]
    fn test_notify_skips_unknown_subscribers() {
        let dep = Dep::new();
        for id in ids(3) {
            dep.add(id);
        }
        // None of these ids belong to the runtime; notify must not panic.
        dep.notify();
        assert_eq!(dep.len(), 3);
    }
}
