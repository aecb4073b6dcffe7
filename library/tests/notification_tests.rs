//! Change notification: mtime, subscribers, lineage and generic set/get.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use object_kit::{FieldMap, ModificationClock, SetOutcome, Value};

#[test]
fn test_mtime_increases_only_on_change() {
    let cone = common::cone().create_default().unwrap();
    let before = cone.mtime();

    assert_eq!(cone.set_field("radius", 2.0), SetOutcome::Changed);
    let after_change = cone.mtime();
    assert!(after_change > before);

    assert_eq!(cone.set_field("radius", 2.0), SetOutcome::Unchanged);
    assert_eq!(cone.mtime(), after_change);
}

#[test]
fn test_mtime_is_comparable_across_instances() {
    let constructor = common::cone();
    let first = constructor.create_default().unwrap();
    let second = constructor.create_default().unwrap();

    first.modified();
    second.modified();
    assert!(second.mtime() > first.mtime());

    first.set_field("height", 4.0);
    assert!(first.mtime() > second.mtime());
}

#[test]
fn test_subscribers_run_in_subscription_order() {
    let cone = common::cone().create_default().unwrap();
    let calls = Rc::new(RefCell::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let calls = Rc::clone(&calls);
        cone.on_modified(move |_| calls.borrow_mut().push(label));
    }
    cone.modified();

    assert_eq!(*calls.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_subscriber_receives_instance() {
    let cone = common::cone().create_default().unwrap();
    let seen = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&seen);
    cone.on_modified(move |instance| {
        *slot.borrow_mut() = instance.get_field("radius");
    });

    cone.set_field("radius", 3.0);
    assert_eq!(*seen.borrow(), Some(Value::from(3.0)));
}

#[test]
fn test_unsubscribe_only_removes_that_callback() {
    let cone = common::cone().create_default().unwrap();
    let kept = common::count_modified(&cone);
    let dropped = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&dropped);
    let handle = cone
        .on_modified(move |_| *counter.borrow_mut() += 1)
        .unwrap();

    cone.modified();
    handle.unsubscribe();
    handle.unsubscribe();
    cone.modified();

    assert_eq!(kept.get(), 2);
    assert_eq!(*dropped.borrow(), 1);
    assert_eq!(cone.modified_subscriber_count(), 1);
}

#[test]
fn test_unsubscribe_during_notification_affects_next_round() {
    let cone = common::cone().create_default().unwrap();
    let hits = Rc::new(RefCell::new(0));
    let handle = Rc::new(RefCell::new(None::<object_kit::Subscription>));

    let counter = Rc::clone(&hits);
    let own_handle = Rc::clone(&handle);
    let subscription = cone
        .on_modified(move |_| {
            *counter.borrow_mut() += 1;
            if let Some(handle) = own_handle.borrow().as_ref() {
                handle.unsubscribe();
            }
        })
        .unwrap();
    *handle.borrow_mut() = Some(subscription);

    cone.modified();
    cone.modified();
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn test_panicking_subscriber_does_not_block_others() {
    let cone = common::cone().create_default().unwrap();
    cone.on_modified(|_| panic!("faulty subscriber"));
    let count = common::count_modified(&cone);

    cone.set_field("radius", 9.0);
    assert_eq!(count.get(), 1);
    assert_eq!(cone.get_field("radius"), Some(Value::from(9.0)));
}

#[test]
fn test_lineage() {
    let cone = common::cone().create_default().unwrap();
    assert!(cone.is_a("Object"));
    assert!(cone.is_a("Cone"));
    assert!(!cone.is_a("Sphere"));
    assert_eq!(cone.class_name().as_deref(), Some("Cone"));
    assert_eq!(cone.class_hierarchy(), vec!["Object", "Cone"]);
}

#[test]
fn test_generic_set_dispatches_by_field_kind() {
    let cone = common::cone().create_default().unwrap();
    let count = common::count_modified(&cone);

    let values = FieldMap::from([
        ("radius".to_string(), Value::from(1.5)),
        (
            "center".to_string(),
            Value::Array(vec![Value::from(1.0), Value::from(2.0), Value::from(3.0)]),
        ),
        ("representation".to_string(), Value::from("WIREFRAME")),
    ]);
    assert!(cone.set(&values));

    assert_eq!(count.get(), 3);
    assert_eq!(cone.get_field("radius"), Some(Value::from(1.5)));
    assert_eq!(
        cone.get_array("center"),
        Some(vec![Value::from(1.0), Value::from(2.0), Value::from(3.0)])
    );
    assert_eq!(cone.get_field("representation"), Some(Value::from(1)));

    assert!(!cone.set(&values));
    assert_eq!(count.get(), 3);
}

#[test]
fn test_generic_set_spreads_arrays_for_scalar_fields() {
    let cone = common::cone().create_default().unwrap();
    let values = FieldMap::from([
        (
            "representation".to_string(),
            Value::Array(vec![Value::from("POINTS"), Value::from("SURFACE")]),
        ),
        ("radius".to_string(), Value::Array(vec![Value::from(3.0)])),
    ]);
    assert!(cone.set(&values));
    assert_eq!(cone.get_field("representation"), Some(Value::from(0)));
    assert_eq!(cone.get_field("radius"), Some(Value::from(3.0)));
}

#[test]
fn test_generic_set_skips_unknown_fields() {
    let cone = common::cone().create_default().unwrap();
    let values = FieldMap::from([("color".to_string(), Value::from("red"))]);
    assert!(!cone.set(&values));
    assert_eq!(cone.get(&["color"])["color"], Value::Null);
}

#[test]
fn test_generic_get() {
    let cone = common::cone()
        .create(&FieldMap::from([("height".to_string(), Value::from(7.0))]))
        .unwrap();

    let subset = cone.get(&["radius", "height"]);
    assert_eq!(subset.len(), 2);
    assert_eq!(subset["radius"], Value::from(0.5));
    assert_eq!(subset["height"], Value::from(7.0));

    let all = cone.get_all();
    assert!(all.contains_key("center"));
    assert!(all.contains_key("representation"));
}

#[test]
fn test_dedicated_clock() {
    let clock: &'static ModificationClock = Box::leak(Box::new(ModificationClock::new()));
    let constructor = common::cone().with_clock(clock);
    let cone = constructor.create_default().unwrap();

    assert_eq!(cone.mtime(), 0);
    cone.modified();
    assert_eq!(cone.mtime(), 1);
    assert_eq!(clock.now(), 1);
}
