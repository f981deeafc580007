// Ordered listener registry with disposable subscription handles
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use super::Subscription;

type Callback<T> = Rc<RefCell<Box<dyn FnMut(&T)>>>;

struct Registry<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Callback<T>)>>,
    pending: RefCell<VecDeque<T>>,
    emitting: Cell<bool>,
}

impl<T> Registry<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry_id, _)| *entry_id == id)
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Listeners invoked synchronously, in registration order, on every emit.
///
/// A listener that panics is isolated: the panic is logged and delivery
/// continues with the next listener. An emit issued while a delivery is
/// already running on the same registry is queued and delivered once the
/// current one finishes, so listeners are never re-entered.
pub struct Listeners<T> {
    registry: Rc<Registry<T>>,
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                emitting: Cell::new(false),
            }),
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);

        let callback: Callback<T> = Rc::new(RefCell::new(Box::new(listener)));
        self.registry.entries.borrow_mut().push((id, callback));

        let registry: Weak<Registry<T>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    pub fn len(&self) -> usize {
        self.registry.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn emit(&self, value: T) {
        self.registry.pending.borrow_mut().push_back(value);
        if self.registry.emitting.replace(true) {
            // The outer emit drains the queue
            return;
        }

        loop {
            let next = self.registry.pending.borrow_mut().pop_front();
            let Some(value) = next else { break };
            self.deliver(&value);
        }

        self.registry.emitting.set(false);
    }

    fn deliver(&self, value: &T) {
        let snapshot: Vec<(u64, Callback<T>)> = self.registry.entries.borrow().clone();

        for (id, callback) in snapshot {
            // Unsubscribed by an earlier listener during this delivery
            if !self.registry.contains(id) {
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut callback = callback.borrow_mut();
                let listener: &mut dyn FnMut(&T) = &mut **callback;
                listener(value);
            }));

            if let Err(payload) = outcome {
                tracing::warn!(
                    listener = id,
                    "listener panicked, continuing delivery: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
