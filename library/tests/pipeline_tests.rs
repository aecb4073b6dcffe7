//! Pull-based port wiring between algorithm nodes.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use object_kit::capability::{algo, obj, set_get};
use object_kit::{FieldMap, InputProvider, ObjectError, Value, new_instance};

#[test]
fn test_connection_pulls_upstream_output() {
    let updates = Rc::new(Cell::new(0));
    let source = common::constant_source(Rc::clone(&updates))
        .create_default()
        .unwrap();
    let doubler = common::doubler().create_default().unwrap();

    doubler.set_input_connection(source.get_output_port(0), 0);
    assert_eq!(doubler.get_input_data(0), source.get_output(0));
    assert_eq!(doubler.get_output(0), Some(Value::from(2)));

    // Every read pulls again; nothing is cached between calls.
    source.set_field("value", 21);
    assert_eq!(doubler.get_input_data(0), Some(Value::from(21)));
    assert_eq!(doubler.get_output(0), Some(Value::from(42)));
}

#[test]
fn test_get_output_runs_update_every_time() {
    let updates = Rc::new(Cell::new(0));
    let source = common::constant_source(Rc::clone(&updates))
        .create_default()
        .unwrap();

    source.get_output(0);
    source.get_output(0);
    let pull = source.get_output_port(0);
    pull.pull();
    assert_eq!(updates.get(), 3);
}

#[test]
fn test_chained_nodes() {
    let updates = Rc::new(Cell::new(0));
    let source = common::constant_source(updates)
        .create(&FieldMap::from([("value".to_string(), Value::from(3))]))
        .unwrap();
    let first = common::doubler().create_default().unwrap();
    let second = common::doubler().create_default().unwrap();

    first.set_input_connection(source.get_output_port(0), 0);
    second.set_input_connection(first.get_output_port(0), 0);

    assert_eq!(second.get_output(0), Some(Value::from(12)));
}

#[test]
fn test_data_and_connection_replace_each_other() {
    let doubler = common::doubler().create_default().unwrap();

    doubler.set_input_connection(InputProvider::new(|| Some(Value::from(5))), 0);
    assert_eq!(doubler.get_input_data(0), Some(Value::from(5)));

    doubler.set_input_data(8, 0);
    assert_eq!(doubler.get_input_data(0), Some(Value::from(8)));

    doubler.set_input_connection(InputProvider::new(|| Some(Value::from(1))), 0);
    assert_eq!(doubler.get_input_data(0), Some(Value::from(1)));
}

#[test]
fn test_unbound_input_reads_none() {
    let doubler = common::doubler().create_default().unwrap();
    assert_eq!(doubler.number_of_inputs(), 1);
    assert_eq!(doubler.get_input_data(0), None);
    assert_eq!(doubler.get_output(0), Some(Value::from(0)));
}

#[test]
fn test_ports_beyond_declared_count_grow() {
    let doubler = common::doubler().create_default().unwrap();
    doubler.set_input_data("extra", 3);

    assert_eq!(doubler.number_of_inputs(), 4);
    assert_eq!(doubler.get_input_data(3), Some(Value::from("extra")));
    assert_eq!(doubler.get_input_data(2), None);
}

#[test]
fn test_source_without_inputs_ignores_input_calls() {
    let source = common::constant_source(Rc::new(Cell::new(0)))
        .create_default()
        .unwrap();
    source.set_input_data(1, 0);
    assert_eq!(source.get_input_data(0), None);
    assert!(!source.has_operation("setInputData"));
    assert!(source.has_operation("getOutputPort"));
}

#[test]
fn test_update_can_skip_work_using_mtime() {
    let rebuilds = Rc::new(Cell::new(0));
    let counter = Rc::clone(&rebuilds);
    let constructor = new_instance(move |api, model, initial| {
        obj(api, model);
        model.assign(FieldMap::from([("size".to_string(), Value::from(2))]), initial);
        set_get(api, model, ["size"]);
        algo(api, model, 0, 1);
        let counter = Rc::clone(&counter);
        let built_at = Cell::new(None);
        api.set_update(move |node| {
            if built_at.get() == Some(node.mtime()) {
                return Ok(());
            }
            counter.set(counter.get() + 1);
            let size = node.get_field("size").and_then(|v| v.as_i64()).unwrap_or(0);
            node.set_output_data(0, Value::Array(vec![Value::Null; size as usize]));
            built_at.set(Some(node.mtime()));
            Ok(())
        });
        Ok(())
    });
    let node = constructor.create_default().unwrap();

    node.get_output(0);
    node.get_output(0);
    assert_eq!(rebuilds.get(), 1);

    node.set_field("size", 4);
    let output = node.get_output(0).unwrap();
    assert_eq!(output.as_array().map(|a| a.len()), Some(4));
    assert_eq!(rebuilds.get(), 2);
}

#[test]
fn test_outputs_without_update_fail_construction() {
    let constructor = new_instance(|api, model, _initial| {
        obj(api, model);
        algo(api, model, 1, 1);
        Ok(())
    });
    assert!(matches!(
        constructor.create_default(),
        Err(ObjectError::MissingUpdate(_))
    ));
}

#[test]
fn test_failed_update_yields_none() {
    let constructor = new_instance(|api, model, _initial| {
        obj(api, model);
        algo(api, model, 0, 1);
        api.set_update(|_| Err(ObjectError::Update("source unavailable".to_string())));
        Ok(())
    });
    let node = constructor.create_default().unwrap();
    assert_eq!(node.get_output(0), None);
    assert!(node.update().is_err());
}
