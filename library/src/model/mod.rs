//! State-side data model: values, field descriptors and the private state record.

pub mod descriptor;
pub mod state;
pub mod value;

pub use descriptor::{EnumMap, FieldDescriptor};
pub use state::{InputBinding, Liveness, Ports, State};
pub use value::{FieldMap, Value, field_map_from_json};
