//! Change observers.
//!
//! Observers get a payload-free `on_change()` after every successful action
//! and re-query the world through its accessors.
//!
//! ## Notification pass
//!
//!   1. Snapshot the registered list under the lock, then release it.
//!   2. For each snapshot entry, in registration order, re-check that it is
//!      still registered; skip it if it was removed earlier in this pass.
//!   3. Invoke `on_change()` with no lock held.
//!
//! So callbacks may register or unregister anyone (themselves included)
//! without deadlocking. Observers added during a pass are first called on
//! the next pass.

use std::sync::{Arc, Mutex, MutexGuard};

pub trait WorldObserver: Send + Sync {
    fn on_change(&self);
}

type Entry = Arc<dyn WorldObserver>;

/// Shared, cloneable observer set. Identity is `Arc` pointer identity.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Arc<Mutex<Vec<Entry>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        ObserverRegistry::default()
    }

    /// Add `observer` unless it is already registered.
    pub fn register(&self, observer: Entry) {
        let mut list = self.lock();
        if !list.iter().any(|o| same(o, &observer)) {
            list.push(observer);
        }
    }

    /// Remove `observer` if present.
    pub fn unregister(&self, observer: &Entry) {
        self.lock().retain(|o| !same(o, observer));
    }

    pub fn contains(&self, observer: &Entry) -> bool {
        self.lock().iter().any(|o| same(o, observer))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run one notification pass. Returns how many observers were called.
    pub fn notify(&self) -> usize {
        let snapshot: Vec<Entry> = self.lock().clone();
        let mut called = 0;
        for observer in snapshot {
            if !self.contains(&observer) {
                continue;
            }
            observer.on_change();
            called += 1;
        }
        called
    }

    /// A poisoned lock only means an observer panicked mid-registration;
    /// the list itself is still a valid Vec.
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn same(a: &Entry, b: &Entry) -> bool {
    Arc::ptr_eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Appends its tag to a shared log on every call.
    struct Tagged {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl WorldObserver for Tagged {
        fn on_change(&self) {
            self.log.lock().unwrap().push(self.tag);
        }
    }

    fn tagged(tag: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Entry {
        Arc::new(Tagged { tag, log: Arc::clone(log) })
    }

    #[test]
    fn register_is_idempotent() {
        let log = Arc::new(Mutex::new(vec![]));
        let reg = ObserverRegistry::new();
        let a = tagged("a", &log);
        reg.register(Arc::clone(&a));
        reg.register(Arc::clone(&a));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.notify(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["a"]);

        reg.unregister(&a);
        reg.unregister(&a);
        assert!(reg.is_empty());
    }

    #[test]
    fn notify_in_registration_order() {
        let log = Arc::new(Mutex::new(vec![]));
        let reg = ObserverRegistry::new();
        for tag in ["first", "second", "third"] {
            reg.register(tagged(tag, &log));
        }
        reg.notify();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    /// Unregisters a victim (possibly itself) when called.
    struct Remover {
        reg: ObserverRegistry,
        victim: Mutex<Option<Entry>>,
        calls: AtomicUsize,
    }

    impl WorldObserver for Remover {
        fn on_change(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(v) = self.victim.lock().unwrap().take() {
                self.reg.unregister(&v);
            }
        }
    }

    #[test]
    fn removed_mid_pass_is_skipped() {
        let log = Arc::new(Mutex::new(vec![]));
        let reg = ObserverRegistry::new();
        let later = tagged("later", &log);
        let remover = Arc::new(Remover {
            reg: reg.clone(),
            victim: Mutex::new(Some(Arc::clone(&later))),
            calls: AtomicUsize::new(0),
        });
        reg.register(remover.clone());
        reg.register(Arc::clone(&later));

        assert_eq!(reg.notify(), 1);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(remover.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn self_unregister_does_not_deadlock() {
        let reg = ObserverRegistry::new();
        let remover = Arc::new(Remover {
            reg: reg.clone(),
            victim: Mutex::new(None),
            calls: AtomicUsize::new(0),
        });
        let entry: Entry = remover.clone();
        *remover.victim.lock().unwrap() = Some(Arc::clone(&entry));
        reg.register(entry);

        assert_eq!(reg.notify(), 1);
        assert!(reg.is_empty());
        assert_eq!(reg.notify(), 0);
    }

    /// Registers a newcomer on its first call.
    struct Recruiter {
        reg: ObserverRegistry,
        recruit: Mutex<Option<Entry>>,
    }

    impl WorldObserver for Recruiter {
        fn on_change(&self) {
            if let Some(r) = self.recruit.lock().unwrap().take() {
                self.reg.register(r);
            }
        }
    }

    #[test]
    fn added_mid_pass_waits_for_next_pass() {
        let log = Arc::new(Mutex::new(vec![]));
        let reg = ObserverRegistry::new();
        reg.register(Arc::new(Recruiter {
            reg: reg.clone(),
            recruit: Mutex::new(Some(tagged("new", &log))),
        }));

        assert_eq!(reg.notify(), 1);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(reg.notify(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["new"]);
    }
}
