//! Field descriptors consumed by the setter/getter installers.

use log::error;

use crate::error::ObjectError;

/// Ordered label to numeric code mapping for enumerated fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumMap {
    entries: Vec<(String, i64)>,
}

impl EnumMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (label, code) in pairs {
            map.insert(label, code);
        }
        map
    }

    /// Adds or replaces a label.
    pub fn insert(&mut self, label: impl Into<String>, code: i64) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = code,
            None => self.entries.push((label, code)),
        }
    }

    pub fn code(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, code)| *code)
    }

    pub fn label(&self, code: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(label, _)| label.as_str())
    }

    pub fn contains_code(&self, code: i64) -> bool {
        self.entries.iter().any(|(_, c)| *c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(label, code)| (label.as_str(), *code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Describes one field handed to `get`/`set`/`set_get`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldDescriptor {
    /// Any value, compared by equality on set.
    Plain(String),
    /// Accepts a label or a numeric code from `values`; stores the code.
    Enum { name: String, values: EnumMap },
}

impl FieldDescriptor {
    pub fn plain(name: impl Into<String>) -> Self {
        FieldDescriptor::Plain(name.into())
    }

    pub fn enumeration(name: impl Into<String>, values: EnumMap) -> Self {
        FieldDescriptor::Enum {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldDescriptor::Plain(name) => name,
            FieldDescriptor::Enum { name, .. } => name,
        }
    }

    /// Parses a descriptor declared in JSON.
    ///
    /// A bare string is a plain field. An object must carry `name` and `type`;
    /// the only specialised type is `"enum"`, which also needs an `enum` object
    /// of integer codes. Any other `type` has no setter and fails.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ObjectError> {
        let object = match json {
            serde_json::Value::String(name) => return Ok(FieldDescriptor::plain(name.as_str())),
            serde_json::Value::Object(object) => object,
            other => {
                return Err(ObjectError::InvalidDescriptor(format!(
                    "expected a name or an object, got {}",
                    other
                )));
            }
        };

        let name = object
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ObjectError::InvalidDescriptor(format!("missing name in {}", json)))?;
        let kind = object.get("type").and_then(|v| v.as_str()).unwrap_or("");

        match kind {
            "enum" => {
                let entries = object.get("enum").and_then(|v| v.as_object()).ok_or_else(|| {
                    ObjectError::InvalidDescriptor(format!("enum field '{}' has no enum map", name))
                })?;
                let mut values = EnumMap::new();
                for (label, code) in entries {
                    let code = code.as_i64().ok_or_else(|| {
                        ObjectError::InvalidDescriptor(format!(
                            "enum field '{}' maps '{}' to non-integer {}",
                            name, label, code
                        ))
                    })?;
                    values.insert(label.as_str(), code);
                }
                Ok(FieldDescriptor::enumeration(name, values))
            }
            _ => {
                error!("No setter for field {}", json);
                Err(ObjectError::UnsupportedDescriptor {
                    name: name.to_string(),
                    kind: kind.to_string(),
                })
            }
        }
    }
}

impl From<&str> for FieldDescriptor {
    fn from(name: &str) -> Self {
        FieldDescriptor::plain(name)
    }
}

impl From<String> for FieldDescriptor {
    fn from(name: String) -> Self {
        FieldDescriptor::Plain(name)
    }
}
