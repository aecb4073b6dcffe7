//! Name to constructor registry.

use std::collections::HashMap;

use log::debug;

use crate::core::Instance;
use crate::error::ObjectError;
use crate::factory::Constructor;
use crate::model::FieldMap;

/// Constructors registered under class names.
#[derive(Clone, Default)]
pub struct ConstructorRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, constructor: Constructor) {
        if self
            .constructors
            .insert(name.to_string(), constructor)
            .is_some()
        {
            debug!("Replaced constructor registered under '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Constructor> {
        self.constructors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Builds an instance of the class registered under `name`.
    pub fn create(&self, name: &str, initial_values: &FieldMap) -> Result<Instance, ObjectError> {
        self.get(name)
            .ok_or_else(|| ObjectError::UnknownConstructor(name.to_string()))?
            .create(initial_values)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
