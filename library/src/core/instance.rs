//! A built instance: frozen interface plus its private state.
//!
//! Every public operation first checks the tombstone. Calls on a deleted
//! instance log a warning and answer with a sentinel; they never panic.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use uuid::Uuid;

use crate::core::interface::{Interface, Setter};
use crate::core::subscription::{Subscription, notify_each};
use crate::model::{FieldMap, Liveness, State, Value};

struct InstanceInner {
    interface: Interface,
    state: RefCell<State>,
}

/// Shared handle on one (interface, state) pair. Clones refer to the same
/// instance.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<InstanceInner>,
}

impl Instance {
    pub(crate) fn assemble(interface: Interface, state: State) -> Self {
        Self {
            inner: Rc::new(InstanceInner {
                interface,
                state: RefCell::new(state),
            }),
        }
    }

    pub(crate) fn interface(&self) -> &Interface {
        &self.inner.interface
    }

    pub(crate) fn state(&self) -> Ref<'_, State> {
        self.inner.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, State> {
        self.inner.state.borrow_mut()
    }

    /// Logs a call made after `delete()`.
    pub(crate) fn report_deleted(&self, operation: &str) {
        warn!(
            "Instance {} deleted - can not call '{}'",
            self.id(),
            operation
        );
    }

    /// Returns true (after logging) when the instance is deleted.
    pub(crate) fn guard_deleted(&self, operation: &str) -> bool {
        if self.is_deleted() {
            self.report_deleted(operation);
            true
        } else {
            false
        }
    }

    pub fn id(&self) -> Uuid {
        self.state().id()
    }

    pub fn is_deleted(&self) -> bool {
        self.state().liveness == Liveness::Deleted
    }

    /// Advances the modification clock, stamps this instance with it and
    /// notifies every live `on_modified` subscriber in order.
    pub fn modified(&self) {
        if self.guard_deleted("modified") {
            return;
        }
        {
            let mut state = self.state_mut();
            state.mtime = state.clock().tick();
        }
        let callbacks = self.interface().modified_subscribers.live();
        notify_each(callbacks, "modified", |callback| callback(self));
    }

    /// Registers a callback run after each `modified()`. Returns `None` on a
    /// deleted instance.
    pub fn on_modified(&self, callback: impl Fn(&Instance) + 'static) -> Option<Subscription> {
        if self.guard_deleted("onModified") {
            return None;
        }
        Some(
            self.interface()
                .modified_subscribers
                .subscribe(Rc::new(callback)),
        )
    }

    /// Modification time of the last change, comparable across instances
    /// sharing a clock.
    pub fn mtime(&self) -> u64 {
        self.state().mtime
    }

    pub fn is_a(&self, tag: &str) -> bool {
        self.state().class_hierarchy.iter().any(|t| t == tag)
    }

    /// Most specific tag of the lineage.
    pub fn class_name(&self) -> Option<String> {
        self.state().class_hierarchy.last().cloned()
    }

    pub fn class_hierarchy(&self) -> Vec<String> {
        self.state().class_hierarchy.clone()
    }

    /// Dispatches each entry to the field's setter. Array fields receive the
    /// elements of an array value (or a single scalar as a one-element
    /// array); other fields given an array receive its first element.
    /// Returns true if any setter reported a change.
    pub fn set(&self, values: &FieldMap) -> bool {
        if self.guard_deleted("set") {
            return false;
        }
        let mut names: Vec<&String> = values.keys().collect();
        names.sort();

        let mut changed = false;
        for name in names {
            let value = &values[name];
            let setter = self
                .interface()
                .accessor(name)
                .and_then(|accessor| accessor.setter.as_ref());
            let outcome = match (setter, value) {
                (Some(Setter::Array { .. }), Value::Array(items)) => {
                    self.set_array(name, items.iter().cloned())
                }
                (Some(Setter::Array { .. }), scalar) => {
                    self.set_array(name, std::iter::once(scalar.clone()))
                }
                (Some(_), Value::Array(items)) => {
                    self.set_field(name, items.first().cloned().unwrap_or_default())
                }
                (Some(_), value) => self.set_field(name, value.clone()),
                (None, _) => {
                    warn!("No setter for field '{}' on {}", name, self.describe());
                    continue;
                }
            };
            changed |= outcome.changed();
        }
        changed
    }

    /// Copies the requested fields into a new map; missing fields read as
    /// `Null`.
    pub fn get(&self, names: &[&str]) -> FieldMap {
        let state = self.state();
        names
            .iter()
            .map(|name| {
                let value = state.field(name).cloned().unwrap_or_default();
                (name.to_string(), value)
            })
            .collect()
    }

    /// Snapshot of the whole state record. `Object` values still share
    /// their instance.
    pub fn get_all(&self) -> FieldMap {
        self.state().fields.clone()
    }

    /// Runs every chained cleanup in installation order and marks the
    /// instance deleted. A second call does nothing.
    pub fn delete(&self) {
        if self.is_deleted() {
            debug!("Instance {} already deleted", self.id());
            return;
        }
        let mut state = self.state_mut();
        for cleanup in &self.interface().teardown {
            cleanup(&mut state);
        }
        state.liveness = Liveness::Deleted;
    }

    /// Runs `f` with read access to the state record. `f` must not call
    /// back into this instance's mutating operations.
    pub fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.state())
    }

    /// Runs `f` with write access to the state record without notifying.
    /// Intended for `update` operations writing derived data.
    pub fn with_state_mut<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state_mut())
    }

    pub fn operations(&self) -> Vec<String> {
        self.interface().operations()
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.interface().has_operation(name)
    }

    /// Calls a method added with `define_method`. `None` when the method
    /// is unknown or the instance is deleted.
    pub fn call(&self, method: &str, args: &[Value]) -> Option<Value> {
        if self.guard_deleted(method) {
            return None;
        }
        let Some(method_fn) = self.interface().methods.get(method).cloned() else {
            warn!("Unknown method '{}' on {}", method, self.describe());
            return None;
        };
        Some(method_fn(self, args))
    }

    pub fn modified_subscriber_count(&self) -> usize {
        self.interface().modified_subscribers.live_count()
    }

    pub(crate) fn describe(&self) -> String {
        match self.inner.state.try_borrow() {
            Ok(state) => format!(
                "{}#{}",
                state
                    .class_hierarchy
                    .last()
                    .map(String::as_str)
                    .unwrap_or("deleted"),
                state.id()
            ),
            Err(_) => "<busy instance>".to_string(),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.describe())
    }
}
