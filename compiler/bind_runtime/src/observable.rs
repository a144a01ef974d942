//! Observable values.
//!
//! An observable holds a value and notifies listeners when it changes.
//! Listeners receive no payload; they call back into the observable (or a
//! delegate) to read the new value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::value::Value;

/// Change callback.
pub type Listener = Rc<dyn Fn()>;

/// Handle returned by [`ObservableValue::add_listener`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SubscriptionId(pub u64);

pub trait ObservableValue {
    fn get_value(&self) -> Value;

    fn add_listener(&self, listener: Listener) -> SubscriptionId;

    /// Unknown ids are ignored.
    fn remove_listener(&self, id: SubscriptionId);

    fn set_value(&self, _value: Value) -> Result<(), RuntimeError> {
        Err(RuntimeError::ReadOnly)
    }

    fn is_writable(&self) -> bool {
        false
    }
}

/// Shared handle to an observable.
#[derive(Clone)]
pub struct ObservableRef(pub Rc<dyn ObservableValue>);

impl ObservableRef {
    pub fn new(observable: impl ObservableValue + 'static) -> Self {
        ObservableRef(Rc::new(observable))
    }

    pub fn ptr_eq(&self, other: &ObservableRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl std::ops::Deref for ObservableRef {
    type Target = dyn ObservableValue;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for ObservableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObservableRef")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Listener list shared by the observable implementations.
#[derive(Default)]
pub(crate) struct ListenerList {
    next: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, Listener)>>,
}

impl ListenerList {
    pub(crate) fn add(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next.get());
        self.next.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) {
        self.entries.borrow_mut().retain(|(sub, _)| *sub != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Call every listener registered at the time of the call.
    ///
    /// Listeners may add or remove listeners while running.
    pub(crate) fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

/// A writable property holding one value.
///
/// Setting an equal value does not notify.
#[derive(Default)]
pub struct SimpleProperty {
    value: RefCell<Value>,
    listeners: ListenerList,
}

impl SimpleProperty {
    pub fn new(value: Value) -> Self {
        SimpleProperty {
            value: RefCell::new(value),
            listeners: ListenerList::default(),
        }
    }

    /// Shared handle to a fresh property.
    pub fn shared(value: Value) -> ObservableRef {
        ObservableRef::new(SimpleProperty::new(value))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ObservableValue for SimpleProperty {
    fn get_value(&self) -> Value {
        self.value.borrow().clone()
    }

    fn add_listener(&self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }

    fn set_value(&self, value: Value) -> Result<(), RuntimeError> {
        if *self.value.borrow() == value {
            return Ok(());
        }
        *self.value.borrow_mut() = value;
        self.listeners.notify();
        Ok(())
    }

    fn is_writable(&self) -> bool {
        true
    }
}

/// Read-only view of another observable.
pub struct ReadOnlyView(pub ObservableRef);

impl ObservableValue for ReadOnlyView {
    fn get_value(&self) -> Value {
        self.0.get_value()
    }

    fn add_listener(&self, listener: Listener) -> SubscriptionId {
        self.0.add_listener(listener)
    }

    fn remove_listener(&self, id: SubscriptionId) {
        self.0.remove_listener(id);
    }
}
