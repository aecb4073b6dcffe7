//! Getter and setter synthesis for plain, enumerated and array fields.

use log::{debug, error, warn};

use crate::core::Instance;
use crate::core::interface::{Getter, Interface, Setter};
use crate::model::{EnumMap, FieldDescriptor, State, Value};
use crate::util::operation_name;

/// Result of a setter call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value changed and `modified()` ran once.
    Changed,
    /// Nothing changed: same value, deleted instance, or an enum code
    /// outside the declared set.
    Unchanged,
    /// The input was not acceptable: unknown enum label, wrong input type,
    /// or no setter for the field.
    Rejected,
}

impl SetOutcome {
    pub fn changed(self) -> bool {
        self == SetOutcome::Changed
    }
}

/// Installs `get<Field>` for each field.
pub fn get<I, D>(api: &mut Interface, _model: &mut State, fields: I)
where
    I: IntoIterator<Item = D>,
    D: Into<FieldDescriptor>,
{
    for field in fields {
        let field = field.into();
        api.accessor_mut(field.name()).getter = Some(Getter::Plain);
    }
}

/// Installs `set<Field>` for each field, picking the enum setter for enum
/// descriptors.
pub fn set<I, D>(api: &mut Interface, _model: &mut State, fields: I)
where
    I: IntoIterator<Item = D>,
    D: Into<FieldDescriptor>,
{
    for field in fields {
        let setter = match field.into() {
            FieldDescriptor::Plain(name) => (name, Setter::Plain),
            FieldDescriptor::Enum { name, values } => (name, Setter::Enum(values)),
        };
        api.accessor_mut(&setter.0).setter = Some(setter.1);
    }
}

pub fn set_get<I, D>(api: &mut Interface, model: &mut State, fields: I)
where
    I: IntoIterator<Item = D>,
    D: Into<FieldDescriptor>,
{
    let fields: Vec<FieldDescriptor> = fields.into_iter().map(Into::into).collect();
    get(api, model, fields.iter().cloned());
    set(api, model, fields);
}

/// Installs `get<Field>` returning a copy of the stored array.
pub fn get_array<I, S>(api: &mut Interface, _model: &mut State, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for field in fields {
        api.accessor_mut(field.as_ref()).getter = Some(Getter::Array);
    }
}

/// Installs `set<Field>(values...)`. Fields missing from the state start as
/// an empty array. `size` is informational only.
pub fn set_array<I, S>(api: &mut Interface, model: &mut State, fields: I, size: usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for field in fields {
        let name = field.as_ref();
        if model.field(name).is_none_or(Value::is_null) {
            model.insert(name, Value::Array(Vec::new()));
        }
        api.accessor_mut(name).setter = Some(Setter::Array { size });
    }
}

pub fn set_get_array<I, S>(api: &mut Interface, model: &mut State, fields: I, size: usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
    get_array(api, model, &fields);
    set_array(api, model, &fields, size);
}

impl Instance {
    /// `get<Field>()`. Array fields come back as a fresh `Value::Array`.
    pub fn get_field(&self, name: &str) -> Option<Value> {
        let getter = self
            .interface()
            .accessor(name)
            .and_then(|accessor| accessor.getter);
        if getter.is_none() {
            warn!("No getter for field '{}' on {}", name, self.describe());
            return None;
        }
        if self.guard_deleted(&operation_name("get", name)) {
            return None;
        }
        self.state().field(name).cloned()
    }

    /// Array `get<Field>()`: a copy of the stored elements.
    pub fn get_array(&self, name: &str) -> Option<Vec<Value>> {
        match self.get_field(name)? {
            Value::Array(items) => Some(items),
            Value::Null => Some(Vec::new()),
            other => Some(vec![other]),
        }
    }

    /// `set<Field>(value)`, routed to the setter synthesized for the field.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) -> SetOutcome {
        let setter = self
            .interface()
            .accessor(name)
            .and_then(|accessor| accessor.setter.clone());
        let value = value.into();
        match setter {
            Some(Setter::Plain) => self.set_plain(name, value),
            Some(Setter::Enum(values)) => self.set_enum(name, &values, value),
            Some(Setter::Array { .. }) => match value {
                Value::Array(items) => self.set_array(name, items),
                scalar => self.set_array(name, [scalar]),
            },
            None => {
                warn!("No setter for field '{}' on {}", name, self.describe());
                SetOutcome::Rejected
            }
        }
    }

    /// Array `set<Field>(values...)`. Any positional difference, or a
    /// different length, replaces the whole array and notifies once.
    pub fn set_array<I, V>(&self, name: &str, values: I) -> SetOutcome
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let size = match self
            .interface()
            .accessor(name)
            .and_then(|accessor| accessor.setter.as_ref())
        {
            Some(Setter::Array { size }) => *size,
            _ => {
                warn!("No array setter for field '{}' on {}", name, self.describe());
                return SetOutcome::Rejected;
            }
        };
        if self.guard_deleted(&operation_name("set", name)) {
            return SetOutcome::Unchanged;
        }

        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if size > 0 && values.len() != size {
            debug!(
                "Field '{}' declared with {} elements, received {}",
                name,
                size,
                values.len()
            );
        }

        let changed = {
            let mut state = self.state_mut();
            let current = state.field(name).and_then(Value::as_array).unwrap_or(&[]);
            let changed = current.len() != values.len()
                || current.iter().zip(&values).any(|(old, new)| !old.same_as(new));
            if changed {
                state.insert(name, Value::Array(values));
            }
            changed
        };

        if changed {
            self.modified();
            SetOutcome::Changed
        } else {
            SetOutcome::Unchanged
        }
    }

    fn set_plain(&self, name: &str, value: Value) -> SetOutcome {
        if self.guard_deleted(&operation_name("set", name)) {
            return SetOutcome::Unchanged;
        }
        let changed = {
            let mut state = self.state_mut();
            let current = state.field(name).unwrap_or(&Value::Null);
            if !current.same_as(&value) {
                state.insert(name, value);
                true
            } else {
                false
            }
        };
        if changed {
            self.modified();
            SetOutcome::Changed
        } else {
            SetOutcome::Unchanged
        }
    }

    // Unknown labels are `Rejected`, out-of-range codes only `Unchanged`.
    fn set_enum(&self, name: &str, values: &EnumMap, input: Value) -> SetOutcome {
        if self.guard_deleted(&operation_name("set", name)) {
            return SetOutcome::Unchanged;
        }
        let code = match &input {
            Value::String(label) => match values.code(label) {
                Some(code) => code,
                None => {
                    error!("Set enum '{}' with invalid argument {:?}", name, label);
                    return SetOutcome::Rejected;
                }
            },
            Value::Integer(_) | Value::Number(_) => match input.as_i64() {
                Some(code) if values.contains_code(code) => code,
                _ => {
                    if self.state().field(name) != Some(&input) {
                        error!("Set enum '{}' outside range: {:?}", name, input);
                    }
                    return SetOutcome::Unchanged;
                }
            },
            other => {
                error!(
                    "Set enum '{}' with invalid argument (string/number expected, got {})",
                    name,
                    other.type_name()
                );
                return SetOutcome::Rejected;
            }
        };

        let changed = {
            let mut state = self.state_mut();
            let current = state.field(name).and_then(Value::as_i64);
            if current != Some(code) {
                state.insert(name, Value::Integer(code));
                true
            } else {
                false
            }
        };
        if changed {
            self.modified();
            SetOutcome::Changed
        } else {
            SetOutcome::Unchanged
        }
    }
}
