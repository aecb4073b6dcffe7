//! Pull-based port wiring.
//!
//! Nothing is cached here: reading an input bound to a connection pulls the
//! upstream output again, and reading an output always runs `update` first.
//! Staleness checks belong in the concrete `update`, usually by comparing
//! `mtime()` values.

use std::fmt;
use std::rc::Rc;

use log::{error, warn};

use crate::core::Instance;
use crate::error::ObjectError;
use crate::model::{InputBinding, Ports, Value};

/// Zero-argument source of input data, usually another node's output port.
#[derive(Clone)]
pub struct InputProvider {
    pull: Rc<dyn Fn() -> Option<Value>>,
}

impl InputProvider {
    pub fn new(pull: impl Fn() -> Option<Value> + 'static) -> Self {
        Self {
            pull: Rc::new(pull),
        }
    }

    /// Evaluates the provider now.
    pub fn pull(&self) -> Option<Value> {
        (self.pull)()
    }
}

impl fmt::Debug for InputProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputProvider")
    }
}

impl Instance {
    /// Binds static data to an input port, dropping any connection there.
    pub fn set_input_data(&self, data: impl Into<Value>, port: usize) {
        if !self.accepts_inputs("setInputData") {
            return;
        }
        let data = data.into();
        self.bind_input(port, InputBinding::Data(data));
    }

    /// Binds a provider to an input port, dropping any static data there.
    pub fn set_input_connection(&self, provider: InputProvider, port: usize) {
        if !self.accepts_inputs("setInputConnection") {
            return;
        }
        self.bind_input(port, InputBinding::Connection(provider));
    }

    /// Static data if bound, otherwise the provider's current result.
    pub fn get_input_data(&self, port: usize) -> Option<Value> {
        if !self.accepts_inputs("getInputData") {
            return None;
        }
        let binding = self
            .state()
            .ports()
            .and_then(|ports| ports.input(port))
            .cloned()
            .unwrap_or_default();
        match binding {
            InputBinding::Data(data) => Some(data),
            InputBinding::Connection(provider) => provider.pull(),
            InputBinding::Absent => None,
        }
    }

    /// Runs `update`, then reads the output port. `None` on a deleted
    /// instance, a failed update, or an empty port.
    pub fn get_output(&self, port: usize) -> Option<Value> {
        if !self.interface().has_outputs() {
            warn!("{} has no output ports", self.describe());
            return None;
        }
        if self.guard_deleted("getOutput") {
            return None;
        }
        if let Err(err) = self.update() {
            error!("Update of {} failed: {}", self.describe(), err);
            return None;
        }
        self.state()
            .ports()
            .and_then(|ports| ports.output(port))
            .filter(|value| !value.is_null())
            .cloned()
    }

    /// Provider that calls `get_output(port)` on this instance, ready for a
    /// downstream `set_input_connection`.
    pub fn get_output_port(&self, port: usize) -> InputProvider {
        let source = self.clone();
        InputProvider::new(move || source.get_output(port))
    }

    /// Runs the `update` operation supplied by the concrete object.
    pub fn update(&self) -> Result<(), ObjectError> {
        if self.guard_deleted("update") {
            return Ok(());
        }
        match self.interface().update.clone() {
            Some(update) => update(self),
            None => Err(ObjectError::MissingUpdate(self.describe())),
        }
    }

    /// Stores an output value without notifying. Meant for `update`.
    pub fn set_output_data(&self, port: usize, value: impl Into<Value>) {
        if self.guard_deleted("setOutputData") {
            return;
        }
        self.state_mut().set_output(port, value);
    }

    pub fn number_of_inputs(&self) -> usize {
        self.state().ports().map_or(0, Ports::input_count)
    }

    pub fn number_of_outputs(&self) -> usize {
        self.state().ports().map_or(0, Ports::output_count)
    }

    fn accepts_inputs(&self, operation: &str) -> bool {
        if !self.interface().has_inputs() {
            warn!("{} has no input ports", self.describe());
            return false;
        }
        !self.guard_deleted(operation)
    }

    fn bind_input(&self, port: usize, binding: InputBinding) {
        let mut state = self.state_mut();
        let ports = state.ports.get_or_insert_with(Ports::default);
        *ports.input_mut(port) = binding;
    }
}
