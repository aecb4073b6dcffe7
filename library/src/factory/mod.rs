//! Instance factory.
//!
//! A [`Constructor`] is made once per concrete object type from an extend
//! function. Each `create` call builds a fresh interface and state, lets the
//! extend function install capabilities and apply initial values, then
//! freezes the interface inside the returned [`Instance`].

pub mod registry;

use std::fmt;
use std::rc::Rc;

use log::{debug, error};

use crate::core::{Instance, Interface, ModificationClock, global_clock};
use crate::error::ObjectError;
use crate::model::{FieldMap, State};

pub use registry::ConstructorRegistry;

/// Composition function: `extend(interface, state, initial_values)`.
pub type ExtendFn = dyn Fn(&mut Interface, &mut State, &FieldMap) -> Result<(), ObjectError>;

#[derive(Clone)]
pub struct Constructor {
    extend: Rc<ExtendFn>,
    clock: &'static ModificationClock,
    name: Option<String>,
}

impl Constructor {
    /// Stamps instances built from now on with `clock` instead of the
    /// process-wide one.
    pub fn with_clock(mut self, clock: &'static ModificationClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn create(&self, initial_values: &FieldMap) -> Result<Instance, ObjectError> {
        let mut api = Interface::new();
        let mut model = State::new(self.clock);

        if let Err(err) = (self.extend)(&mut api, &mut model, initial_values) {
            error!(
                "Failed to compose {}: {}",
                self.name().unwrap_or("instance"),
                err
            );
            return Err(err);
        }

        let class_name = self
            .name
            .clone()
            .or_else(|| model.class_hierarchy().last().cloned())
            .unwrap_or_else(|| "instance".to_string());
        api.validate(&class_name)?;

        debug!("Created {} {}", class_name, model.id());
        Ok(Instance::assemble(api, model))
    }

    pub fn create_default(&self) -> Result<Instance, ObjectError> {
        self.create(&FieldMap::new())
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .finish()
    }
}

/// Returns a constructor running `extend` on every call.
pub fn new_instance<F>(extend: F) -> Constructor
where
    F: Fn(&mut Interface, &mut State, &FieldMap) -> Result<(), ObjectError> + 'static,
{
    Constructor {
        extend: Rc::new(extend),
        clock: global_clock(),
        name: None,
    }
}

/// Like [`new_instance`], and also registers the constructor under `name`.
pub fn new_registered_instance<F>(
    extend: F,
    name: &str,
    registry: &mut ConstructorRegistry,
) -> Constructor
where
    F: Fn(&mut Interface, &mut State, &FieldMap) -> Result<(), ObjectError> + 'static,
{
    let mut constructor = new_instance(extend);
    constructor.name = Some(name.to_string());
    registry.register(name, constructor.clone());
    constructor
}
