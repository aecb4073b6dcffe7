//! Named event channels: `on<Name>` / `invoke<Name>`.

use std::rc::Rc;

use log::{error, warn};

use crate::core::subscription::{SubscriberList, notify_each};
use crate::core::{Instance, Interface, Subscription};
use crate::error::ObjectError;
use crate::model::{State, Value};
use crate::util::operation_name;

/// Adds an event channel with its own subscriber list. Deleting the
/// instance releases the channel's subscriptions after every cleanup
/// chained before this call.
pub fn event(api: &mut Interface, _model: &mut State, name: &str) -> Result<(), ObjectError> {
    if api.events.contains_key(name) {
        let operation = operation_name("invoke", name);
        error!("Event channel '{}' installed twice", name);
        return Err(ObjectError::DuplicateOperation(operation));
    }
    let channel = SubscriberList::new();
    let teardown = channel.clone();
    api.events.insert(name.to_string(), channel);
    api.on_delete(move |_| teardown.release_all());
    Ok(())
}

impl Instance {
    /// `invoke<Name>(args...)`: calls every live subscriber of the channel
    /// with this instance and `args`.
    pub fn invoke_event(&self, name: &str, args: &[Value]) {
        let Some(channel) = self.interface().events.get(name) else {
            warn!("No event '{}' on {}", name, self.describe());
            return;
        };
        let operation = operation_name("invoke", name);
        if self.guard_deleted(&operation) {
            return;
        }
        notify_each(channel.live(), &operation, |callback| callback(self, args));
    }

    /// `on<Name>(callback)`. Returns `None` for an unknown channel or a
    /// deleted instance.
    pub fn on_event(
        &self,
        name: &str,
        callback: impl Fn(&Instance, &[Value]) + 'static,
    ) -> Option<Subscription> {
        let Some(channel) = self.interface().events.get(name) else {
            warn!("No event '{}' on {}", name, self.describe());
            return None;
        };
        if self.guard_deleted(&operation_name("on", name)) {
            return None;
        }
        Some(channel.subscribe(Rc::new(callback)))
    }

    pub fn event_subscriber_count(&self, name: &str) -> usize {
        self.interface()
            .events
            .get(name)
            .map_or(0, |channel| channel.live_count())
    }
}
