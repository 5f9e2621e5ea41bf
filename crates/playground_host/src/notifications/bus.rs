//! Publish/subscribe bus for user-visible warning messages.

use std::{cell::RefCell, fmt, rc::Rc};

type Subscriber = Rc<dyn Fn(&str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle returned by [`NotificationBus::subscribe`], used to unsubscribe later.
pub struct SubscriptionId(u64);

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

#[derive(Clone, Default)]
/// Synchronous warning bus owned by the application.
///
/// Messages reach every subscriber registered at publish time, in subscription order. There is
/// no queue and no replay: a subscriber added after a publish never sees that message. Clones
/// share the same subscriber list.
pub struct NotificationBus {
    inner: Rc<RefCell<BusState>>,
}

impl NotificationBus {
    /// Registers `subscriber` and returns its handle.
    pub fn subscribe(&self, subscriber: impl Fn(&str) + 'static) -> SubscriptionId {
        let mut state = self.inner.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push((id, Rc::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.inner.borrow_mut();
        let before = state.subscribers.len();
        state.subscribers.retain(|(existing, _)| *existing != id);
        state.subscribers.len() != before
    }

    /// Delivers `message` to every current subscriber and returns how many were reached.
    pub fn publish(&self, message: &str) -> usize {
        // Snapshot so subscribers may (un)subscribe while being notified.
        let subscribers = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect::<Vec<_>>();
        for subscriber in &subscribers {
            subscriber(message);
        }
        subscribers.len()
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
