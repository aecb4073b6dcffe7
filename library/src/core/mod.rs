//! Change-notification core shared by every instance.

pub mod clock;
pub mod instance;
pub mod interface;
pub mod subscription;

pub use clock::{ModificationClock, global_clock};
pub use instance::Instance;
pub use interface::{EventCallback, Interface, MethodFn, ModifiedCallback, UpdateFn};
pub use subscription::Subscription;
