#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use object_kit::capability::{algo, event, obj, set_get, set_get_array};
use object_kit::{
    Constructor, EnumMap, FieldDescriptor, FieldMap, Instance, Value, new_instance,
};

pub fn representation() -> EnumMap {
    EnumMap::from_pairs([("POINTS", 0), ("WIREFRAME", 1), ("SURFACE", 2)])
}

/// Plain, enum and array fields plus one event channel.
pub fn cone() -> Constructor {
    new_instance(|api, model, initial| {
        obj(api, model);
        model.assign(
            FieldMap::from([
                ("radius".to_string(), Value::from(0.5)),
                ("height".to_string(), Value::from(1.0)),
                ("representation".to_string(), Value::from(2)),
                (
                    "center".to_string(),
                    Value::Array(vec![Value::from(0.0), Value::from(0.0), Value::from(0.0)]),
                ),
            ]),
            initial,
        );
        model.push_class("Cone");
        set_get(
            api,
            model,
            [
                FieldDescriptor::plain("radius"),
                FieldDescriptor::plain("height"),
                FieldDescriptor::enumeration("representation", representation()),
            ],
        );
        set_get_array(api, model, ["center"], 3);
        event(api, model, "animation")?;
        Ok(())
    })
}

/// Source node whose single output is its `value` field. `updates` counts
/// calls to `update`.
pub fn constant_source(updates: Rc<Cell<usize>>) -> Constructor {
    new_instance(move |api, model, initial| {
        obj(api, model);
        model.assign(FieldMap::from([("value".to_string(), Value::from(1))]), initial);
        model.push_class("ConstantSource");
        set_get(api, model, ["value"]);
        algo(api, model, 0, 1);
        let updates = Rc::clone(&updates);
        api.set_update(move |source| {
            updates.set(updates.get() + 1);
            let value = source.get_field("value").unwrap_or_default();
            source.set_output_data(0, value);
            Ok(())
        });
        Ok(())
    })
}

/// Filter node doubling its integer input.
pub fn doubler() -> Constructor {
    new_instance(|api, model, _initial| {
        obj(api, model);
        model.push_class("Doubler");
        algo(api, model, 1, 1);
        api.set_update(|filter| {
            let input = filter.get_input_data(0).and_then(|v| v.as_i64()).unwrap_or(0);
            filter.set_output_data(0, input * 2);
            Ok(())
        });
        Ok(())
    })
}

/// Counts `modified()` notifications on `instance`.
pub fn count_modified(instance: &Instance) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    instance
        .on_modified(move |_| counter.set(counter.get() + 1))
        .expect("live instance accepts subscribers");
    count
}
