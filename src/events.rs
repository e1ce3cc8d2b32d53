//! In-process publish/subscribe between the scene and the game session
//!
//! Neither side holds a reference to the other. Both get a clone of the same
//! [`EventBus`] and exchange [`Signal`]s:
//!
//! - [`Topic::Session`]: the session announces it became active or inactive;
//!   the scene uses it to decide whether asteroids are simulated and drawn.
//! - [`Topic::Destroyed`]: the scene announces an asteroid was destroyed; the
//!   session counts it.
//!
//! Delivery is synchronous: `publish` pushes into every live subscriber
//! mailbox before it returns, so anything published during a frame is
//! visible to a subscriber the next time it drains. Everything is
//! single-threaded (`Rc`/`RefCell`).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// Channel a signal travels on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Session became active/inactive
    Session,
    /// An asteroid was destroyed by the pointer
    Destroyed,
}

/// A message on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    SessionActive(bool),
    AsteroidDestroyed { id: u32 },
}

impl Signal {
    pub fn topic(&self) -> Topic {
        match self {
            Signal::SessionActive(_) => Topic::Session,
            Signal::AsteroidDestroyed { .. } => Topic::Destroyed,
        }
    }
}

type Mailbox = RefCell<VecDeque<Signal>>;

#[derive(Default)]
struct BusInner {
    subscribers: Vec<(Topic, Weak<Mailbox>)>,
    published: u64,
}

/// Cloneable handle to a shared bus
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("subscribers", &inner.subscribers.len())
            .field("published", &inner.published)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a topic. Dropping the subscription unsubscribes.
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let mailbox = Rc::new(RefCell::new(VecDeque::new()));
        self.inner
            .borrow_mut()
            .subscribers
            .push((topic, Rc::downgrade(&mailbox)));
        Subscription { topic, mailbox }
    }

    /// Deliver a signal to every live subscriber of its topic.
    /// Returns how many subscribers received it (zero is fine).
    pub fn publish(&self, signal: Signal) -> usize {
        let topic = signal.topic();
        let mut inner = self.inner.borrow_mut();
        inner.published += 1;
        inner.subscribers.retain(|(_, mailbox)| mailbox.strong_count() > 0);

        let mut delivered = 0;
        for (_, mailbox) in inner.subscribers.iter().filter(|(t, _)| *t == topic) {
            if let Some(mailbox) = mailbox.upgrade() {
                mailbox.borrow_mut().push_back(signal);
                delivered += 1;
            }
        }
        if delivered == 0 {
            log::trace!("{:?} published with no subscribers", signal);
        }
        delivered
    }

    /// Live subscribers for a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|(t, mailbox)| *t == topic && mailbox.strong_count() > 0)
            .count()
    }
}

/// A subscriber's mailbox for one topic
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    mailbox: Rc<Mailbox>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Take every pending signal, oldest first
    pub fn drain(&self) -> Vec<Signal> {
        self.mailbox.borrow_mut().drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.mailbox.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_by_topic() {
        let bus = EventBus::new();
        let session = bus.subscribe(Topic::Session);
        let destroyed = bus.subscribe(Topic::Destroyed);

        bus.publish(Signal::SessionActive(true));
        bus.publish(Signal::AsteroidDestroyed { id: 3 });
        bus.publish(Signal::AsteroidDestroyed { id: 4 });

        assert_eq!(session.drain(), vec![Signal::SessionActive(true)]);
        assert_eq!(
            destroyed.drain(),
            vec![
                Signal::AsteroidDestroyed { id: 3 },
                Signal::AsteroidDestroyed { id: 4 }
            ]
        );
        assert_eq!(destroyed.pending(), 0);
    }

    #[test]
    fn test_fan_out_to_every_subscriber() {
        let bus = EventBus::new();
        let a = bus.subscribe(Topic::Destroyed);
        let b = bus.subscribe(Topic::Destroyed);
        assert_eq!(bus.publish(Signal::AsteroidDestroyed { id: 1 }), 2);
        assert_eq!(a.pending(), 1);
        assert_eq!(b.pending(), 1);
    }

    #[test]
    fn test_no_subscribers_is_fine() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Signal::SessionActive(false)), 0);
        assert!(format!("{:?}", bus).contains("published: 1"));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = EventBus::new();
        let keep = bus.subscribe(Topic::Session);
        {
            let _gone = bus.subscribe(Topic::Session);
            assert_eq!(bus.subscriber_count(Topic::Session), 2);
        }
        assert_eq!(bus.subscriber_count(Topic::Session), 1);
        assert_eq!(bus.publish(Signal::SessionActive(true)), 1);
        assert_eq!(keep.pending(), 1);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = EventBus::new();
        let other = bus.clone();
        let sub = bus.subscribe(Topic::Destroyed);
        other.publish(Signal::AsteroidDestroyed { id: 9 });
        assert_eq!(sub.drain(), vec![Signal::AsteroidDestroyed { id: 9 }]);
    }
}
