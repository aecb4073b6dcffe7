//! Pull-based data flow between instances carrying the algorithm capability.

pub mod ports;

pub use ports::InputProvider;
