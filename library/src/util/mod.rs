pub mod naming;

pub use naming::{capitalize, is_operation_name, operation_name};
