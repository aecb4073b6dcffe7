//! Public interface record: the operations an instance exposes.
//!
//! An `Interface` is filled in by the capability installers while a
//! constructor runs and is moved into the built [`Instance`] afterwards,
//! where nothing can reach it mutably. Operations keep mutating the state
//! they close over; the set of operations itself is fixed.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use log::error;

use crate::core::instance::Instance;
use crate::core::subscription::SubscriberList;
use crate::error::ObjectError;
use crate::model::{EnumMap, State, Value};
use crate::util::{is_operation_name, operation_name};

pub type ModifiedCallback = dyn Fn(&Instance);
pub type EventCallback = dyn Fn(&Instance, &[Value]);
pub type UpdateFn = dyn Fn(&Instance) -> Result<(), ObjectError>;
pub type MethodFn = dyn Fn(&Instance, &[Value]) -> Value;
pub(crate) type Teardown = Box<dyn Fn(&mut State)>;

const INPUT_OPERATIONS: [&str; 3] = ["setInputData", "setInputConnection", "getInputData"];
const OUTPUT_OPERATIONS: [&str; 2] = ["getOutput", "getOutputPort"];

const OBJECT_OPERATIONS: [&str; 8] = [
    "modified",
    "onModified",
    "getMTime",
    "isA",
    "getClassName",
    "set",
    "get",
    "delete",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Getter {
    Plain,
    Array,
}

#[derive(Clone, Debug)]
pub(crate) enum Setter {
    Plain,
    Enum(EnumMap),
    /// `size` is recorded but never enforced.
    Array { size: usize },
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Accessor {
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PortLayout {
    pub(crate) inputs: usize,
    pub(crate) outputs: usize,
}

pub struct Interface {
    pub(crate) object_installed: bool,
    pub(crate) modified_subscribers: SubscriberList<ModifiedCallback>,
    pub(crate) accessors: HashMap<String, Accessor>,
    pub(crate) events: HashMap<String, SubscriberList<EventCallback>>,
    pub(crate) ports: Option<PortLayout>,
    pub(crate) update: Option<Rc<UpdateFn>>,
    pub(crate) methods: HashMap<String, Rc<MethodFn>>,
    pub(crate) teardown: Vec<Teardown>,
}

impl Interface {
    pub(crate) fn new() -> Self {
        Self {
            object_installed: false,
            modified_subscribers: SubscriberList::new(),
            accessors: HashMap::new(),
            events: HashMap::new(),
            ports: None,
            update: None,
            methods: HashMap::new(),
            teardown: Vec::new(),
        }
    }

    /// Supplies the `update` operation that `get_output` runs before
    /// reading an output port.
    pub fn set_update(
        &mut self,
        update: impl Fn(&Instance) -> Result<(), ObjectError> + 'static,
    ) {
        self.update = Some(Rc::new(update));
    }

    /// Adds a named operation, callable later through [`Instance::call`].
    pub fn define_method(
        &mut self,
        name: &str,
        method: impl Fn(&Instance, &[Value]) -> Value + 'static,
    ) -> Result<(), ObjectError> {
        if self.has_operation(name) {
            error!("Operation '{}' is already defined", name);
            return Err(ObjectError::DuplicateOperation(name.to_string()));
        }
        self.methods.insert(name.to_string(), Rc::new(method));
        Ok(())
    }

    /// Chains cleanup onto `delete()`, after every cleanup chained earlier.
    pub fn on_delete(&mut self, cleanup: impl Fn(&mut State) + 'static) {
        self.teardown.push(Box::new(cleanup));
    }

    pub(crate) fn accessor_mut(&mut self, field: &str) -> &mut Accessor {
        self.accessors.entry(field.to_string()).or_default()
    }

    pub(crate) fn accessor(&self, field: &str) -> Option<&Accessor> {
        self.accessors.get(field)
    }

    pub(crate) fn has_inputs(&self) -> bool {
        self.ports.is_some_and(|layout| layout.inputs > 0)
    }

    pub(crate) fn has_outputs(&self) -> bool {
        self.ports.is_some_and(|layout| layout.outputs > 0)
    }

    /// Sorted names of every operation, using the `get<Field>`/`on<Event>`
    /// naming convention.
    pub fn operations(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        if self.object_installed {
            names.extend(OBJECT_OPERATIONS.iter().map(|name| name.to_string()));
        }
        for (field, accessor) in &self.accessors {
            if accessor.getter.is_some() {
                names.insert(operation_name("get", field));
            }
            if accessor.setter.is_some() {
                names.insert(operation_name("set", field));
            }
        }
        for event in self.events.keys() {
            names.insert(operation_name("on", event));
            names.insert(operation_name("invoke", event));
        }
        if self.has_inputs() {
            names.extend(INPUT_OPERATIONS.map(String::from));
        }
        if self.has_outputs() {
            names.extend(OUTPUT_OPERATIONS.map(String::from));
        }
        if self.update.is_some() {
            names.insert("update".to_string());
        }
        names.extend(self.methods.keys().cloned());
        names.into_iter().collect()
    }

    pub fn has_operation(&self, name: &str) -> bool {
        if self.methods.contains_key(name) {
            return true;
        }
        if self.object_installed && OBJECT_OPERATIONS.iter().any(|op| *op == name) {
            return true;
        }
        if self.has_inputs() && INPUT_OPERATIONS.iter().any(|op| *op == name) {
            return true;
        }
        if self.has_outputs() && OUTPUT_OPERATIONS.iter().any(|op| *op == name) {
            return true;
        }
        if name == "update" && self.update.is_some() {
            return true;
        }
        let accessor_match = self.accessors.iter().any(|(field, accessor)| {
            (accessor.getter.is_some() && is_operation_name(name, "get", field))
                || (accessor.setter.is_some() && is_operation_name(name, "set", field))
        });
        accessor_match
            || self.events.keys().any(|event| {
                is_operation_name(name, "on", event) || is_operation_name(name, "invoke", event)
            })
    }

    /// Rejects compositions that would fail at the first call.
    pub(crate) fn validate(&self, class_name: &str) -> Result<(), ObjectError> {
        if !self.object_installed {
            error!("'{}' was composed without the object capability", class_name);
            return Err(ObjectError::MissingObjectCapability(class_name.to_string()));
        }
        if self.has_outputs() && self.update.is_none() {
            error!("'{}' declares output ports but no update operation", class_name);
            return Err(ObjectError::MissingUpdate(class_name.to_string()));
        }
        Ok(())
    }
}
