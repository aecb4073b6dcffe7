//! Subscriber slots and unsubscribe handles.
//!
//! Slots are never compacted: unsubscribing empties a slot in place so that
//! every handle keeps pointing at its own position.

use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use log::error;

trait SlotRelease {
    fn release(&self, index: usize);
}

impl<C: ?Sized> SlotRelease for RefCell<Vec<Option<Rc<C>>>> {
    fn release(&self, index: usize) {
        if let Some(slot) = self.borrow_mut().get_mut(index) {
            *slot = None;
        }
    }
}

/// Ordered callback list owned by one notification channel.
pub(crate) struct SubscriberList<C: ?Sized> {
    slots: Rc<RefCell<Vec<Option<Rc<C>>>>>,
}

impl<C: ?Sized> Clone for SubscriberList<C> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<C: ?Sized + 'static> SubscriberList<C> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn subscribe(&self, callback: Rc<C>) -> Subscription {
        let index = {
            let mut slots = self.slots.borrow_mut();
            slots.push(Some(callback));
            slots.len() - 1
        };
        let owner: Weak<dyn SlotRelease> = Rc::downgrade(&self.slots) as Weak<dyn SlotRelease>;
        Subscription { owner, index }
    }

    /// Live callbacks in subscription order. The list is copied so callbacks
    /// may subscribe or unsubscribe while the round is running.
    pub(crate) fn live(&self) -> Vec<Rc<C>> {
        self.slots.borrow().iter().flatten().cloned().collect()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots.borrow().iter().filter(|slot| slot.is_some()).count()
    }

    pub(crate) fn release_all(&self) {
        for slot in self.slots.borrow_mut().iter_mut() {
            *slot = None;
        }
    }
}

/// Handle returned when registering a callback.
#[derive(Clone, Debug)]
pub struct Subscription {
    owner: Weak<dyn SlotRelease>,
    index: usize,
}

impl Subscription {
    /// Stops future notifications for this callback. Repeated calls, and
    /// calls after the owner is gone, do nothing.
    pub fn unsubscribe(&self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.release(self.index);
        }
    }
}

/// Calls every callback, logging and skipping any that panics.
pub(crate) fn notify_each<C: ?Sized>(
    callbacks: Vec<Rc<C>>,
    channel: &str,
    mut call: impl FnMut(&C),
) {
    for callback in callbacks {
        if catch_unwind(AssertUnwindSafe(|| call(&*callback))).is_err() {
            error!(
                "Subscriber of '{}' panicked; continuing with the remaining subscribers",
                channel
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    type Callback = dyn Fn(u32);

    #[test]
    fn test_unsubscribe_leaves_other_slots_intact() {
        let list: SubscriberList<Callback> = SubscriberList::new();
        let hits = Rc::new(Cell::new(0u32));

        let first = {
            let hits = Rc::clone(&hits);
            list.subscribe(Rc::new(move |n: u32| hits.set(hits.get() + n)))
        };
        {
            let hits = Rc::clone(&hits);
            list.subscribe(Rc::new(move |n: u32| hits.set(hits.get() + 10 * n)));
        }

        first.unsubscribe();
        first.unsubscribe();
        notify_each(list.live(), "test", |cb| cb(1));

        assert_eq!(hits.get(), 10);
        assert_eq!(list.live_count(), 1);
        assert_eq!(list.slots.borrow().len(), 2);
    }

    #[test]
    fn test_handle_outliving_list_is_inert() {
        let handle = {
            let list: SubscriberList<Callback> = SubscriberList::new();
            list.subscribe(Rc::new(|_: u32| {}))
        };
        handle.unsubscribe();
    }
}
