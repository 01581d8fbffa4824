use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

type Callback<T> = Box<dyn FnOnce(T)>;

/// One-shot callbacks keyed by a generated correlation id.
///
/// A callback is removed before it runs, so a late or repeated invocation for
/// the same id finds nothing.
pub struct CallbackRegistry<T> {
    prefix: String,
    next_id: Cell<u64>,
    callbacks: RefCell<HashMap<String, Callback<T>>>,
}

impl<T> CallbackRegistry<T> {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_id: Cell::new(1),
            callbacks: RefCell::new(HashMap::new()),
        }
    }

    pub fn register<F>(&self, callback: F) -> String
    where
        F: FnOnce(T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        let correlation_id = format!("{}{id}", self.prefix);
        self.callbacks
            .borrow_mut()
            .insert(correlation_id.clone(), Box::new(callback));
        correlation_id
    }

    /// Runs and forgets the callback for `correlation_id`. Returns `false` if
    /// none was registered.
    pub fn invoke(&self, correlation_id: &str, value: T) -> bool {
        let callback = self.callbacks.borrow_mut().remove(correlation_id);
        match callback {
            Some(callback) => {
                callback(value);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&self, correlation_id: &str) -> bool {
        self.callbacks.borrow_mut().remove(correlation_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }
}

/// Page-wide slots for overlay kinds that allow a single inserted instance.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    holders: Rc<RefCell<HashMap<String, String>>>,
}

impl KindRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `kind` for `instance_id`. Re-claiming by the current holder
    /// succeeds; a claim held by another instance returns that holder.
    pub fn claim(&self, kind: &str, instance_id: &str) -> Result<(), String> {
        let mut holders = self.holders.borrow_mut();
        match holders.get(kind) {
            Some(holder) if holder != instance_id => Err(holder.clone()),
            Some(_) => Ok(()),
            None => {
                holders.insert(kind.to_string(), instance_id.to_string());
                Ok(())
            }
        }
    }

    pub fn release(&self, kind: &str, instance_id: &str) {
        let mut holders = self.holders.borrow_mut();
        if holders.get(kind).is_some_and(|holder| holder == instance_id) {
            holders.remove(kind);
        }
    }

    #[must_use]
    pub fn holder(&self, kind: &str) -> Option<String> {
        self.holders.borrow().get(kind).cloned()
    }
}
