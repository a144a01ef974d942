//! Observable listener runtime.
//!
//! A directory of `bean -> [ListenerData]`, one `ListenerData` per
//! (bean, observable) pair. Each pair holds exactly one subscription on the
//! underlying observable, however many steps share it. A change on the
//! observable delivers the pair's steps to the update callback, last
//! registered first.
//!
//! While locked, deliveries are queued (duplicates kept) and replayed in
//! arrival order by [`ListenerRuntime::unlock_listeners`].
//!
//! Misuse (removing a step or bean that was never added) is a no-op.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use bind_ir::Step;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::heap::BeanId;
use crate::observable::{ObservableRef, SubscriptionId};

type Update = Rc<dyn Fn(Step)>;

struct ListenerData {
    observable: ObservableRef,
    steps: SmallVec<[Step; 4]>,
    subscription: SubscriptionId,
    key: u64,
}

struct Directory {
    beans: FxHashMap<BeanId, Vec<ListenerData>>,
    locked: bool,
    pending: Vec<Step>,
    update: Update,
    next_key: u64,
}

impl Directory {
    fn entry(&self, bean: BeanId, key: u64) -> Option<&ListenerData> {
        self.beans.get(&bean)?.iter().find(|data| data.key == key)
    }
}

/// Listener directory owned by one delegate instance.
#[derive(Clone)]
pub struct ListenerRuntime {
    dir: Rc<RefCell<Directory>>,
}

impl ListenerRuntime {
    /// `update` receives every delivered step.
    pub fn new(update: impl Fn(Step) + 'static) -> Self {
        ListenerRuntime {
            dir: Rc::new(RefCell::new(Directory {
                beans: FxHashMap::default(),
                locked: false,
                pending: Vec::new(),
                update: Rc::new(update),
                next_key: 0,
            })),
        }
    }

    /// Register `step` on the (bean, observable) pair.
    ///
    /// The first step on a pair subscribes to the observable; adding a step
    /// already present is a no-op.
    pub fn add_listener(&self, bean: BeanId, observable: &ObservableRef, step: Step) {
        {
            let mut dir = self.dir.borrow_mut();
            if let Some(data) = dir
                .beans
                .get_mut(&bean)
                .and_then(|list| list.iter_mut().find(|d| d.observable.ptr_eq(observable)))
            {
                if !data.steps.contains(&step) {
                    data.steps.push(step);
                }
                tracing::trace!(%bean, %step, "step joins existing pair");
                return;
            }
        }

        let key = {
            let mut dir = self.dir.borrow_mut();
            dir.next_key += 1;
            dir.next_key
        };
        let weak = Rc::downgrade(&self.dir);
        let subscription = observable.add_listener(Rc::new(move || dispatch(&weak, bean, key)));

        let mut steps = SmallVec::new();
        steps.push(step);
        self.dir
            .borrow_mut()
            .beans
            .entry(bean)
            .or_default()
            .push(ListenerData {
                observable: observable.clone(),
                steps,
                subscription,
                key,
            });
        tracing::trace!(%bean, %step, "subscribed new pair");
    }

    /// Remove `step` from `bean`'s entries.
    ///
    /// An entry left without steps unsubscribes; a bean left without entries
    /// leaves the directory.
    pub fn remove_listener(&self, bean: BeanId, step: Step) {
        let released = {
            let mut dir = self.dir.borrow_mut();
            let Some(list) = dir.beans.get_mut(&bean) else {
                return;
            };
            let Some(index) = list.iter().position(|d| d.steps.contains(&step)) else {
                return;
            };
            let data = &mut list[index];
            data.steps.retain(|s| *s != step);
            let released = if data.steps.is_empty() {
                let data = list.remove(index);
                Some((data.observable, data.subscription))
            } else {
                None
            };
            if list.is_empty() {
                dir.beans.remove(&bean);
            }
            released
        };
        if let Some((observable, subscription)) = released {
            observable.remove_listener(subscription);
            tracing::trace!(%bean, %step, "unsubscribed pair");
        }
    }

    /// Defer deliveries until [`unlock_listeners`](Self::unlock_listeners).
    pub fn lock_listeners(&self) {
        self.dir.borrow_mut().locked = true;
    }

    /// Deliver every queued step in arrival order, then resume synchronous
    /// delivery.
    pub fn unlock_listeners(&self) {
        let (pending, update) = {
            let mut dir = self.dir.borrow_mut();
            dir.locked = false;
            (std::mem::take(&mut dir.pending), Rc::clone(&dir.update))
        };
        tracing::debug!(pending = pending.len(), "flushing pending steps");
        for step in pending {
            update(step);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.dir.borrow().locked
    }

    pub fn bean_count(&self) -> usize {
        self.dir.borrow().beans.len()
    }

    /// Number of (bean, observable) pairs registered for `bean`.
    pub fn listener_count(&self, bean: BeanId) -> usize {
        self.dir.borrow().beans.get(&bean).map_or(0, Vec::len)
    }

    /// Steps of every pair registered for `bean`, in registration order.
    pub fn steps_of(&self, bean: BeanId) -> Vec<Step> {
        self.dir.borrow().beans.get(&bean).map_or_else(Vec::new, |list| {
            list.iter().flat_map(|d| d.steps.iter().copied()).collect()
        })
    }

    pub fn pending_len(&self) -> usize {
        self.dir.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dir.borrow().beans.is_empty()
    }
}

/// Underlying change on the pair `(bean, key)`.
fn dispatch(dir: &Weak<RefCell<Directory>>, bean: BeanId, key: u64) {
    let Some(dir) = dir.upgrade() else {
        return;
    };
    let (steps, update) = {
        let mut dir = dir.borrow_mut();
        let Some(data) = dir.entry(bean, key) else {
            return;
        };
        let steps: SmallVec<[Step; 4]> = data.steps.iter().rev().copied().collect();
        if dir.locked {
            dir.pending.extend(steps);
            return;
        }
        (steps, Rc::clone(&dir.update))
    };
    for step in steps {
        update(step);
    }
}

impl fmt::Debug for ListenerRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.dir.borrow();
        f.debug_struct("ListenerRuntime")
            .field("beans", &dir.beans.len())
            .field("locked", &dir.locked)
            .field("pending", &dir.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests;
