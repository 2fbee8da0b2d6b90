//! Session-scoped lifecycle event bus.
//!
//! Each destructible threat publishes exactly one resolution event (by
//! elimination or by escape) before it is finalized. The bus is an
//! explicit object owned by the session — never process-global — so
//! concurrent sessions (e.g. in tests) cannot cross-contaminate.
//!
//! Delivery: `publish` copies the event into the queue of every
//! subscriber registered at that moment. Subscribers consume their queue
//! with `drain`. Delivery order across subscribers is unspecified;
//! within one subscriber, events arrive in publication order.

use std::collections::VecDeque;

use skyraid_core::events::ResolutionEvent;

/// Handle identifying one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u32);

/// Publish/subscribe channel for threat lifecycle events.
#[derive(Debug, Default)]
pub struct LifecycleBus {
    queues: Vec<(SubscriberId, VecDeque<ResolutionEvent>)>,
    next_id: u32,
}

impl LifecycleBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber with an empty queue.
    pub fn subscribe(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.queues.push((id, VecDeque::new()));
        id
    }

    /// Remove a subscriber and its pending events. Unknown ids are a no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.queues.retain(|(sub, _)| *sub != id);
    }

    /// Deliver an event to every currently-registered subscriber.
    pub fn publish(&mut self, event: ResolutionEvent) {
        for (_, queue) in &mut self.queues {
            queue.push_back(event);
        }
    }

    /// Consume all pending events for one subscriber.
    pub fn drain(&mut self, id: SubscriberId) -> Vec<ResolutionEvent> {
        match self.queues.iter_mut().find(|(sub, _)| *sub == id) {
            Some((_, queue)) => queue.drain(..).collect(),
            None => Vec::new(),
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.queues.len()
    }
}
