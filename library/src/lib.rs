//! Capability composition for toolkit objects.
//!
//! Objects are built by a [`Constructor`] from an extend function that
//! installs capabilities onto an [`Interface`] and its private [`State`]:
//! change notification ([`capability::obj`]), field accessors
//! ([`capability::set_get`] and friends), pull-based ports
//! ([`capability::algo`]) and named event channels ([`capability::event`]).

pub mod capability;
pub mod core;
pub mod error;
pub mod factory;
pub mod model;
pub mod pipeline;
pub mod util;

pub use crate::capability::SetOutcome;
pub use crate::core::{Instance, Interface, ModificationClock, Subscription, global_clock};
pub use crate::error::ObjectError;
pub use crate::factory::{Constructor, ConstructorRegistry, new_instance, new_registered_instance};
pub use crate::model::{EnumMap, FieldDescriptor, FieldMap, State, Value, field_map_from_json};
pub use crate::pipeline::InputProvider;
