use std::cell::Cell;
use std::env;
use std::error::Error;
use std::fs;
use std::rc::Rc;

use log::{debug, info};
use serde::Deserialize;

use object_kit::capability::{algo, event, obj, set_get, set_get_array};
use object_kit::{
    Constructor, ConstructorRegistry, EnumMap, FieldDescriptor, FieldMap, ObjectError, Value,
    field_map_from_json, new_registered_instance,
};

#[derive(Deserialize, Default)]
struct DemoConfig {
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    source: serde_json::Value,
    #[serde(default)]
    filter: serde_json::Value,
}

fn load_config() -> Result<DemoConfig, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => {
            let json_str = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&json_str)?)
        }
        None => Ok(DemoConfig::default()),
    }
}

/// Emits `count` numbers starting at `start`, `step` apart.
fn ramp_source(registry: &mut ConstructorRegistry) -> Constructor {
    new_registered_instance(
        |api, model, initial| {
            obj(api, model);
            model.assign(
                FieldMap::from([
                    ("count".to_string(), Value::from(5)),
                    ("start".to_string(), Value::from(0.0)),
                    ("step".to_string(), Value::from(1.0)),
                ]),
                initial,
            );
            model.push_class("RampSource");
            set_get(api, model, ["count", "start", "step"]);
            algo(api, model, 0, 1);

            let built_at = Cell::new(None);
            api.set_update(move |source| {
                if built_at.get() == Some(source.mtime()) {
                    return Ok(());
                }
                let fields = source.get(&["count", "start", "step"]);
                let count = fields["count"].as_i64().unwrap_or(0).max(0);
                let start = fields["start"].as_f64().unwrap_or(0.0);
                let step = fields["step"].as_f64().unwrap_or(1.0);
                let ramp: Vec<Value> = (0..count)
                    .map(|i| Value::from(start + step * i as f64))
                    .collect();
                info!("RampSource rebuilt {} values", ramp.len());
                source.set_output_data(0, ramp);
                built_at.set(Some(source.mtime()));
                Ok(())
            });
            Ok(())
        },
        "RampSource",
        registry,
    )
}

/// Scales or offsets each input value, clamped to `range`.
fn scale_filter(registry: &mut ConstructorRegistry) -> Constructor {
    new_registered_instance(
        |api, model, initial| {
            obj(api, model);
            model.assign(
                FieldMap::from([
                    ("factor".to_string(), Value::from(2.0)),
                    ("mode".to_string(), Value::from(0)),
                    (
                        "range".to_string(),
                        Value::Array(vec![Value::from(f64::MIN), Value::from(f64::MAX)]),
                    ),
                ]),
                initial,
            );
            model.push_class("ScaleFilter");
            set_get(
                api,
                model,
                [
                    FieldDescriptor::plain("factor"),
                    FieldDescriptor::enumeration(
                        "mode",
                        EnumMap::from_pairs([("MULTIPLY", 0), ("OFFSET", 1)]),
                    ),
                ],
            );
            set_get_array(api, model, ["range"], 2);
            algo(api, model, 1, 1);
            event(api, model, "progress")?;

            api.set_update(|filter| {
                let input = filter.get_input_data(0).unwrap_or_default();
                let fields = filter.get(&["factor", "mode", "range"]);
                let factor = fields["factor"].as_f64().unwrap_or(1.0);
                let offset = fields["mode"].as_i64() == Some(1);
                let (low, high) = clamp_bounds(fields["range"].as_array().unwrap_or(&[]))?;

                let values = input.as_array().unwrap_or(&[]);
                let mut output = Vec::with_capacity(values.len());
                for (done, value) in values.iter().enumerate() {
                    let v = value.as_f64().unwrap_or(0.0);
                    let v = if offset { v + factor } else { v * factor };
                    output.push(Value::from(v.clamp(low, high)));
                    filter.invoke_event(
                        "progress",
                        &[Value::from((done + 1) as f64 / values.len() as f64)],
                    );
                }
                filter.set_output_data(0, output);
                Ok(())
            });
            Ok(())
        },
        "ScaleFilter",
        registry,
    )
}

/// Reads `[low, high]` from a range field. Missing bounds are open.
fn clamp_bounds(range: &[Value]) -> Result<(f64, f64), ObjectError> {
    let low = range.first().and_then(Value::as_f64).unwrap_or(f64::MIN);
    let high = range.get(1).and_then(Value::as_f64).unwrap_or(f64::MAX);
    if low.is_nan() || high.is_nan() || low > high {
        return Err(ObjectError::Update(format!(
            "invalid range [{}, {}]",
            low, high
        )));
    }
    Ok((low, high))
}

fn format_values(value: Option<Value>) -> String {
    match value {
        Some(value) => serde_json::Value::from(&value).to_string(),
        None => "<none>".to_string(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    let level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut registry = ConstructorRegistry::new();
    ramp_source(&mut registry);
    scale_filter(&mut registry);
    info!("Registered constructors: {:?}", registry.names());

    let source = registry.create("RampSource", &field_map_from_json(config.source))?;
    let filter = registry.create("ScaleFilter", &field_map_from_json(config.filter))?;
    filter.set_input_connection(source.get_output_port(0), 0);

    let changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&changes);
    let subscription = filter.on_modified(move |instance| {
        counter.set(counter.get() + 1);
        info!("{} modified at {}", instance.class_name().unwrap_or_default(), instance.mtime());
    });
    filter.on_event("progress", |_, args| {
        if let Some(fraction) = args.first().and_then(Value::as_f64) {
            debug!("progress {:.0}%", fraction * 100.0);
        }
    });

    println!("output: {}", format_values(filter.get_output(0)));

    source.set_field("count", 3);
    filter.set_field("mode", "OFFSET");
    filter.set_array("range", [0.0, 4.0]);
    println!("output: {}", format_values(filter.get_output(0)));

    if let Some(subscription) = subscription {
        subscription.unsubscribe();
    }
    filter.set_field("factor", 10.0);
    println!("output: {}", format_values(filter.get_output(0)));
    println!("filter notified {} times", changes.get());

    filter.delete();
    source.delete();
    Ok(())
}
