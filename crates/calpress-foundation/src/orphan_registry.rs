//! Safety net for hold indicators that outlive their normal cleanup.
//!
//! The host owns one registry and hands it to every surface that should be
//! cleaned up together. Indicators register when they appear and deregister
//! when they are gone; [`OrphanRegistry::purge_all`] force-removes whatever
//! is still listed (window blur, page hide, surface torn down mid-gesture).

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Weak;

pub type OrphanKey = u64;

/// A visual element that can be removed immediately. `purge` must be
/// idempotent.
pub trait OrphanedEffect {
    fn purge(&self);
}

pub struct OrphanRegistry {
    entries: RefCell<IndexMap<OrphanKey, Weak<dyn OrphanedEffect>>>,
    next_key: Cell<OrphanKey>,
}

impl Default for OrphanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OrphanRegistry {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(IndexMap::new()),
            next_key: Cell::new(1),
        }
    }

    pub fn register(&self, effect: Weak<dyn OrphanedEffect>) -> OrphanKey {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.entries.borrow_mut().insert(key, effect);
        key
    }

    pub fn deregister(&self, key: OrphanKey) -> bool {
        self.entries.borrow_mut().shift_remove(&key).is_some()
    }

    pub fn contains(&self, key: OrphanKey) -> bool {
        self.entries.borrow().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Removes every registered effect, oldest first. Returns how many were
    /// still alive to purge.
    pub fn purge_all(&self) -> usize {
        // Purging deregisters, so the map is released before any callback.
        let drained: Vec<_> = self.entries.borrow_mut().drain(..).collect();
        let mut purged = 0;
        for (key, effect) in drained {
            if let Some(effect) = effect.upgrade() {
                log::debug!("purging orphaned effect {key}");
                effect.purge();
                purged += 1;
            }
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Indicator {
        registry: Rc<OrphanRegistry>,
        key: Cell<Option<OrphanKey>>,
        purges: Cell<u32>,
    }

    impl OrphanedEffect for Indicator {
        fn purge(&self) {
            self.purges.set(self.purges.get() + 1);
            if let Some(key) = self.key.take() {
                self.registry.deregister(key);
            }
        }
    }

    fn indicator(registry: &Rc<OrphanRegistry>) -> Rc<Indicator> {
        let indicator = Rc::new(Indicator {
            registry: Rc::clone(registry),
            key: Cell::new(None),
            purges: Cell::new(0),
        });
        let effect: Rc<dyn OrphanedEffect> = indicator.clone();
        let key = registry.register(Rc::downgrade(&effect));
        indicator.key.set(Some(key));
        indicator
    }

    #[test]
    fn purge_all_removes_everything_once() {
        let registry = Rc::new(OrphanRegistry::new());
        let a = indicator(&registry);
        let b = indicator(&registry);
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.purge_all(), 2);
        assert!(registry.is_empty());
        assert_eq!(a.purges.get(), 1);
        assert_eq!(b.purges.get(), 1);

        assert_eq!(registry.purge_all(), 0);
        assert_eq!(a.purges.get(), 1);
    }

    #[test]
    fn deregister_is_idempotent() {
        let registry = Rc::new(OrphanRegistry::new());
        let a = indicator(&registry);
        let key = a.key.get().expect("registered");
        assert!(registry.contains(key));
        assert!(registry.deregister(key));
        assert!(!registry.deregister(key));
        assert!(!registry.contains(key));
    }

    #[test]
    fn dead_entries_are_skipped() {
        let registry = Rc::new(OrphanRegistry::new());
        let a = indicator(&registry);
        drop(a);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.purge_all(), 0);
        assert!(registry.is_empty());
    }
}
