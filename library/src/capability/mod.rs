//! Capability installers.
//!
//! Each installer takes the interface and state under construction and adds
//! operations to the interface. Installation order matters: the object
//! capability goes first and later capabilities chain their teardown after
//! it.

pub mod accessors;
pub mod algorithm;
pub mod event;
pub mod object;

pub use accessors::{SetOutcome, get, get_array, set, set_array, set_get, set_get_array};
pub use algorithm::algo;
pub use event::event;
pub use object::{OBJECT_CLASS, obj};
