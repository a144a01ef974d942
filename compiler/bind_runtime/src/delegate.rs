//! Binding delegate instances.
//!
//! A [`BindingDelegate`] is the runtime instance of one compiled
//! [`BindingUnit`]. It owns a cache slot and a [`ListenerRuntime`], and is
//! itself observable so it can back a reactive target slot.
//!
//! Lifecycle: `new` → `attach` (subscribe every step) → reads and
//! invalidations → `dispose` (remove every step).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use bind_compile::{BindingUnit, Dependency};
use bind_ir::Step;

use crate::error::RuntimeError;
use crate::eval::{evaluate, evaluate_on, evaluate_write_back, EvalEnv};
use crate::heap::BeanId;
use crate::listener::ListenerRuntime;
use crate::observable::{Listener, ListenerList, ObservableRef, ObservableValue, SubscriptionId};
use crate::value::Value;

/// Resolved subscription target of one step.
type Target = (BeanId, ObservableRef);

struct DelegateInner {
    unit: Rc<BindingUnit>,
    env: EvalEnv,
    cache: RefCell<Option<Value>>,
    runtime: ListenerRuntime,
    targets: RefCell<Vec<Option<Target>>>,
    listeners: ListenerList,
    attached: Cell<bool>,
}

/// Runtime instance of a live binding.
#[derive(Clone)]
pub struct BindingDelegate {
    inner: Rc<DelegateInner>,
}

impl BindingDelegate {
    pub fn new(unit: Rc<BindingUnit>, env: EvalEnv) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<DelegateInner>| {
            let weak = weak.clone();
            let runtime = ListenerRuntime::new(move |step| {
                if let Some(inner) = weak.upgrade() {
                    inner.invalidate(step);
                }
            });
            DelegateInner {
                targets: RefCell::new(vec![None; unit.dependency_count()]),
                unit,
                env,
                cache: RefCell::new(None),
                runtime,
                listeners: ListenerList::default(),
                attached: Cell::new(false),
            }
        });
        BindingDelegate { inner }
    }

    /// Subscribe every dependency; step `i` is dependency `i`.
    ///
    /// A `null` along a dependency's path leaves its step unsubscribed.
    #[tracing::instrument(level = "debug", skip_all, fields(steps = self.inner.unit.dependency_count()))]
    pub fn attach(&self) {
        if self.inner.attached.replace(true) {
            return;
        }
        for (step, dep) in self.inner.unit.steps() {
            let target = self.inner.resolve(dep);
            if let Some((bean, observable)) = &target {
                self.inner.runtime.add_listener(*bean, observable, step);
            }
            self.inner.targets.borrow_mut()[step.index()] = target;
        }
    }

    /// Current value; cached until a dependency changes.
    ///
    /// A runtime error is logged and read as `null`.
    pub fn get_value(&self) -> Value {
        self.inner.get_value()
    }

    /// Remove every registered step.
    pub fn dispose(&self) {
        let targets: Vec<Option<Target>> = self
            .inner
            .targets
            .borrow_mut()
            .iter_mut()
            .map(Option::take)
            .collect();
        for (index, target) in targets.into_iter().enumerate() {
            if let Some((bean, _)) = target {
                self.inner.runtime.remove_listener(bean, step_at(index));
            }
        }
        self.inner.attached.set(false);
        self.inner.cache.borrow_mut().take();
    }

    pub fn lock_listeners(&self) {
        self.inner.runtime.lock_listeners();
    }

    pub fn unlock_listeners(&self) {
        self.inner.runtime.unlock_listeners();
    }

    /// Write `value` back into the source property.
    pub fn set_value(&self, value: Value) -> Result<(), RuntimeError> {
        self.inner.set_value(value)
    }

    /// The delegate as an observable value.
    pub fn as_observable(&self) -> ObservableRef {
        ObservableRef::new(DelegateObservable(Rc::clone(&self.inner)))
    }

    pub fn unit(&self) -> &Rc<BindingUnit> {
        &self.inner.unit
    }

    pub fn runtime(&self) -> &ListenerRuntime {
        &self.inner.runtime
    }

    pub fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }

    /// Number of steps currently subscribed.
    pub fn subscribed_count(&self) -> usize {
        self.inner.targets.borrow().iter().flatten().count()
    }
}

fn step_at(index: usize) -> Step {
    Step(u32::try_from(index).unwrap_or(u32::MAX))
}

impl DelegateInner {
    fn get_value(&self) -> Value {
        if let Some(value) = self.cache.borrow().as_ref() {
            return value.clone();
        }
        let value = evaluate(self.unit.program(), &self.env).unwrap_or_else(|err| {
            tracing::warn!(%err, "binding evaluation failed");
            Value::Null
        });
        *self.cache.borrow_mut() = Some(value.clone());
        value
    }

    fn set_value(&self, value: Value) -> Result<(), RuntimeError> {
        let program = self.unit.write_back().ok_or(RuntimeError::ReadOnly)?;
        evaluate_write_back(program, &self.env, value)
    }

    /// The (bean, observable) pair a dependency currently points at.
    fn resolve(&self, dep: &Dependency) -> Option<Target> {
        let resolved = match &dep.owner {
            None => evaluate(&dep.accessor, &self.env).map(|obs| (BeanId::DETACHED, obs)),
            Some(owner) => match evaluate(owner, &self.env) {
                Ok(Value::Null) => return None,
                Ok(receiver) => {
                    let bean = match &receiver {
                        Value::Object(obj) => obj.id(),
                        _ => BeanId::DETACHED,
                    };
                    evaluate_on(&dep.accessor, &self.env, receiver).map(|obs| (bean, obs))
                }
                Err(err) => Err(err),
            },
        };
        match resolved {
            Ok((bean, Value::Observable(observable))) => Some((bean, observable)),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(%err, "dependency could not be resolved");
                None
            }
        }
    }

    /// A dependency changed.
    fn invalidate(&self, step: Step) {
        tracing::trace!(%step, "invalidated");
        self.cache.borrow_mut().take();
        if self.attached.get() {
            self.refresh_dynamic();
        }
        self.listeners.notify();
    }

    /// Move subscriptions of dynamic steps whose target changed.
    fn refresh_dynamic(&self) {
        for (step, dep) in self.unit.steps().filter(|(_, dep)| dep.dynamic) {
            let next = self.resolve(dep);
            let previous = self.targets.borrow()[step.index()].clone();
            let unchanged = match (&previous, &next) {
                (Some((a, x)), Some((b, y))) => a == b && x.ptr_eq(y),
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                continue;
            }
            if let Some((bean, _)) = &previous {
                self.runtime.remove_listener(*bean, step);
            }
            if let Some((bean, observable)) = &next {
                self.runtime.add_listener(*bean, observable, step);
            }
            tracing::debug!(%step, "dependency moved");
            self.targets.borrow_mut()[step.index()] = next;
        }
    }
}

struct DelegateObservable(Rc<DelegateInner>);

impl ObservableValue for DelegateObservable {
    fn get_value(&self) -> Value {
        self.0.get_value()
    }

    fn add_listener(&self, listener: Listener) -> SubscriptionId {
        self.0.listeners.add(listener)
    }

    fn remove_listener(&self, id: SubscriptionId) {
        self.0.listeners.remove(id);
    }

    fn set_value(&self, value: Value) -> Result<(), RuntimeError> {
        self.0.set_value(value)
    }

    fn is_writable(&self) -> bool {
        self.0.unit.write_back().is_some()
    }
}

impl fmt::Debug for BindingDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingDelegate")
            .field("steps", &self.inner.unit.dependency_count())
            .field("attached", &self.inner.attached.get())
            .field("cached", &self.inner.cache.borrow().is_some())
            .field("runtime", &self.inner.runtime)
            .finish()
    }
}

#[cfg(test)]
mod tests;
