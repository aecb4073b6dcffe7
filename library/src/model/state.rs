//! Private state record of an instance.

use uuid::Uuid;

use crate::core::ModificationClock;
use crate::model::value::{FieldMap, Value};
use crate::pipeline::InputProvider;

/// Tombstone checked at the entry of every public operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Liveness {
    Active,
    Deleted,
}

/// What an input port is bound to. Binding data clears the connection and
/// the other way round.
#[derive(Clone, Debug, Default)]
pub enum InputBinding {
    #[default]
    Absent,
    Data(Value),
    Connection(InputProvider),
}

/// Input and output slots installed by the algorithm capability.
#[derive(Clone, Debug, Default)]
pub struct Ports {
    pub(crate) inputs: Vec<InputBinding>,
    pub(crate) outputs: Vec<Value>,
}

impl Ports {
    pub(crate) fn with_counts(inputs: usize, outputs: usize) -> Self {
        Self {
            inputs: vec![InputBinding::Absent; inputs],
            outputs: vec![Value::Null; outputs],
        }
    }

    /// Index access that grows the input list instead of failing.
    pub(crate) fn input_mut(&mut self, port: usize) -> &mut InputBinding {
        if port >= self.inputs.len() {
            self.inputs.resize(port + 1, InputBinding::Absent);
        }
        &mut self.inputs[port]
    }

    pub(crate) fn output_mut(&mut self, port: usize) -> &mut Value {
        if port >= self.outputs.len() {
            self.outputs.resize(port + 1, Value::Null);
        }
        &mut self.outputs[port]
    }

    pub fn input(&self, port: usize) -> Option<&InputBinding> {
        self.inputs.get(port)
    }

    pub fn output(&self, port: usize) -> Option<&Value> {
        self.outputs.get(port)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}

/// Fields plus the reserved bookkeeping every instance carries.
pub struct State {
    id: Uuid,
    clock: &'static ModificationClock,
    pub(crate) fields: FieldMap,
    pub(crate) mtime: u64,
    pub(crate) class_hierarchy: Vec<String>,
    pub(crate) liveness: Liveness,
    pub(crate) ports: Option<Ports>,
}

impl State {
    pub(crate) fn new(clock: &'static ModificationClock) -> Self {
        Self {
            id: Uuid::new_v4(),
            clock,
            fields: FieldMap::new(),
            mtime: clock.now(),
            class_hierarchy: Vec::new(),
            liveness: Liveness::Active,
            ports: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn clock(&self) -> &'static ModificationClock {
        self.clock
    }

    /// Copies `defaults`, then `initial` on top of them, into the fields.
    pub fn assign(&mut self, defaults: FieldMap, initial: &FieldMap) {
        self.fields.extend(defaults);
        self.fields
            .extend(initial.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Writes a field without notifying anyone.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Appends a more specific type tag to the lineage.
    pub fn push_class(&mut self, tag: impl Into<String>) {
        self.class_hierarchy.push(tag.into());
    }

    pub fn class_hierarchy(&self) -> &[String] {
        &self.class_hierarchy
    }

    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness
    }

    pub fn is_deleted(&self) -> bool {
        self.liveness == Liveness::Deleted
    }

    pub fn ports(&self) -> Option<&Ports> {
        self.ports.as_ref()
    }

    pub fn set_output(&mut self, port: usize, value: impl Into<Value>) {
        *self.ports.get_or_insert_with(Ports::default).output_mut(port) = value.into();
    }

    /// Drops every field, the lineage and the port bindings.
    pub(crate) fn clear(&mut self) {
        self.fields.clear();
        self.class_hierarchy.clear();
        self.ports = None;
    }
}
