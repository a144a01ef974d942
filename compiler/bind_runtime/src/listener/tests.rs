#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::observable::{ObservableValue, SimpleProperty};
use crate::value::Value;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn recording() -> (Rc<RefCell<Vec<Step>>>, ListenerRuntime) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let runtime = ListenerRuntime::new(move |step| sink.borrow_mut().push(step));
    (log, runtime)
}

fn bump(prop: &ObservableRef) {
    let next = match prop.get_value() {
        Value::Int(i) => i + 1,
        _ => 0,
    };
    prop.set_value(Value::Int(next)).unwrap();
}

const BEAN: BeanId = BeanId(1);

#[test]
fn test_one_subscription_per_pair() {
    let (_, runtime) = recording();
    let prop = Rc::new(SimpleProperty::new(Value::Int(0)));
    let obs = ObservableRef(Rc::clone(&prop) as Rc<dyn ObservableValue>);
    runtime.add_listener(BEAN, &obs, Step(0));
    runtime.add_listener(BEAN, &obs, Step(1));
    runtime.add_listener(BEAN, &obs, Step(1));
    assert_eq!(prop.listener_count(), 1);
    assert_eq!(runtime.listener_count(BEAN), 1);
    assert_eq!(runtime.steps_of(BEAN), vec![Step(0), Step(1)]);
}

#[test]
fn test_change_fires_steps_in_reverse_registration_order() {
    let (log, runtime) = recording();
    let obs = SimpleProperty::shared(Value::Int(0));
    for i in 0..3 {
        runtime.add_listener(BEAN, &obs, Step(i));
    }
    bump(&obs);
    assert_eq!(*log.borrow(), vec![Step(2), Step(1), Step(0)]);
}

#[test]
fn test_lock_queues_and_unlock_replays() {
    let (log, runtime) = recording();
    let a = SimpleProperty::shared(Value::Int(0));
    let b = SimpleProperty::shared(Value::Int(0));
    runtime.add_listener(BEAN, &a, Step(5));
    runtime.add_listener(BeanId(2), &b, Step(2));

    runtime.lock_listeners();
    bump(&a);
    bump(&b);
    bump(&a);
    assert!(log.borrow().is_empty());
    assert_eq!(runtime.pending_len(), 3);

    runtime.unlock_listeners();
    assert_eq!(*log.borrow(), vec![Step(5), Step(2), Step(5)]);
    assert_eq!(runtime.pending_len(), 0);
    assert!(!runtime.is_locked());
}

#[test]
fn test_removing_last_step_cleans_directory() {
    let (log, runtime) = recording();
    let prop = Rc::new(SimpleProperty::new(Value::Int(0)));
    let obs = ObservableRef(Rc::clone(&prop) as Rc<dyn ObservableValue>);
    let other = SimpleProperty::shared(Value::Int(0));
    runtime.add_listener(BEAN, &obs, Step(0));
    runtime.add_listener(BEAN, &obs, Step(1));
    runtime.add_listener(BeanId(2), &other, Step(2));

    runtime.remove_listener(BEAN, Step(0));
    assert_eq!(runtime.listener_count(BEAN), 1);
    runtime.remove_listener(BEAN, Step(1));
    assert_eq!(runtime.listener_count(BEAN), 0);
    assert_eq!(runtime.bean_count(), 1);
    assert_eq!(prop.listener_count(), 0);

    runtime.remove_listener(BeanId(2), Step(2));
    assert!(runtime.is_empty());

    bump(&obs);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_unknown_removals_are_ignored() {
    let (_, runtime) = recording();
    let obs = SimpleProperty::shared(Value::Null);
    runtime.remove_listener(BEAN, Step(0));
    runtime.add_listener(BEAN, &obs, Step(0));
    runtime.remove_listener(BEAN, Step(9));
    runtime.remove_listener(BeanId(7), Step(0));
    assert_eq!(runtime.steps_of(BEAN), vec![Step(0)]);
}

#[test]
fn test_update_may_remove_its_own_step() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<RefCell<Option<ListenerRuntime>>> = Rc::new(RefCell::new(None));
    let runtime = {
        let log = Rc::clone(&log);
        let slot = Rc::clone(&slot);
        ListenerRuntime::new(move |step| {
            log.borrow_mut().push(step);
            if let Some(runtime) = slot.borrow().as_ref() {
                runtime.remove_listener(BEAN, step);
            }
        })
    };
    *slot.borrow_mut() = Some(runtime.clone());
    let obs = SimpleProperty::shared(Value::Int(0));
    runtime.add_listener(BEAN, &obs, Step(0));
    runtime.add_listener(BEAN, &obs, Step(1));

    bump(&obs);
    bump(&obs);
    assert_eq!(*log.borrow(), vec![Step(1), Step(0)]);
    assert!(runtime.is_empty());
    slot.borrow_mut().take();
}

#[test]
fn test_dropped_runtime_ignores_changes() {
    let (log, runtime) = recording();
    let obs = SimpleProperty::shared(Value::Int(0));
    runtime.add_listener(BEAN, &obs, Step(0));
    drop(runtime);
    bump(&obs);
    assert!(log.borrow().is_empty());
}

proptest! {
    #[test]
    fn locked_delivery_is_fifo_with_duplicates(
        fires in proptest::collection::vec(0u32..6, 0..24),
    ) {
        let (log, runtime) = recording();
        let observables: Vec<ObservableRef> =
            (0..6).map(|_| SimpleProperty::shared(Value::Int(0))).collect();
        for (i, obs) in observables.iter().enumerate() {
            let i = u32::try_from(i).unwrap();
            runtime.add_listener(BeanId(i + 1), obs, Step(i));
        }

        runtime.lock_listeners();
        for &i in &fires {
            bump(&observables[i as usize]);
        }
        prop_assert!(log.borrow().is_empty());
        runtime.unlock_listeners();

        let expected: Vec<Step> = fires.iter().map(|&i| Step(i)).collect();
        prop_assert_eq!(log.borrow().clone(), expected);
    }

    #[test]
    fn one_change_fires_each_step_once_in_reverse(count in 1u32..12) {
        let (log, runtime) = recording();
        let obs = SimpleProperty::shared(Value::Int(0));
        for i in 0..count {
            runtime.add_listener(BEAN, &obs, Step(i));
        }
        bump(&obs);
        let expected: Vec<Step> = (0..count).rev().map(Step).collect();
        prop_assert_eq!(log.borrow().clone(), expected);
    }

    #[test]
    fn removing_every_step_empties_directory(
        beans in proptest::collection::vec(1u32..5, 1..16),
    ) {
        let (_, runtime) = recording();
        let obs = SimpleProperty::shared(Value::Int(0));
        for (i, &bean) in beans.iter().enumerate() {
            runtime.add_listener(BeanId(bean), &obs, Step(u32::try_from(i).unwrap()));
        }
        for (i, &bean) in beans.iter().enumerate().rev() {
            runtime.remove_listener(BeanId(bean), Step(u32::try_from(i).unwrap()));
        }
        prop_assert!(runtime.is_empty());
    }
}
