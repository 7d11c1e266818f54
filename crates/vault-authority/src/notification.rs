//! Synchronous delivery of read results to registered listeners
//!
//! Listeners are invoked on the calling thread before `process` returns,
//! after every check and store mutation of the call has succeeded. Nothing
//! is queued between calls. Each registration lives as long as the
//! [`Subscription`] returned for it.

use crate::operation::Outcome;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type PayloadListener = Arc<dyn Fn(&[u8]) + Send + Sync>;
type PayloadsListener = Arc<dyn Fn(&[Vec<u8>]) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    single: RwLock<Vec<(u64, PayloadListener)>>,
    many: RwLock<Vec<(u64, PayloadsListener)>>,
}

impl Listeners {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn remove(&self, id: u64) {
        self.single.write().retain(|(entry, _)| *entry != id);
        self.many.write().retain(|(entry, _)| *entry != id);
    }
}

/// Fan-out of delivered payloads to zero or more listeners
#[derive(Default)]
pub struct NotificationChannel {
    listeners: Arc<Listeners>,
}

/// Registration handle; the listener is removed when this is dropped.
#[derive(Debug)]
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

impl NotificationChannel {
    /// Create a channel with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for single-payload deliveries
    pub fn subscribe_payload<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        let id = self.listeners.next_id();
        self.listeners.single.write().push((id, Arc::new(listener)));
        self.handle(id)
    }

    /// Register a listener for drained-queue deliveries
    pub fn subscribe_payloads<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[Vec<u8>]) + Send + Sync + 'static,
    {
        let id = self.listeners.next_id();
        self.listeners.many.write().push((id, Arc::new(listener)));
        self.handle(id)
    }

    fn handle(&self, id: u64) -> Subscription {
        Subscription {
            listeners: Arc::downgrade(&self.listeners),
            id,
        }
    }

    /// Number of registered listeners of both shapes
    pub fn listener_count(&self) -> usize {
        self.listeners.single.read().len() + self.listeners.many.read().len()
    }

    /// Deliver the payload(s) of `outcome`, if any, to every matching listener.
    ///
    /// Listeners run on a snapshot taken before the first call, with no lock
    /// held, so they may subscribe or unsubscribe themselves.
    pub fn emit(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Delivered(payload) => {
                let snapshot: Vec<PayloadListener> = self
                    .listeners
                    .single
                    .read()
                    .iter()
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect();
                for listener in snapshot {
                    listener(payload);
                }
            }
            Outcome::DeliveredMany(payloads) => {
                let snapshot: Vec<PayloadsListener> = self
                    .listeners
                    .many
                    .read()
                    .iter()
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect();
                for listener in snapshot {
                    listener(payloads);
                }
            }
            Outcome::Completed | Outcome::KeyUnique | Outcome::KeyNotUnique => {}
        }
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("payload_listeners", &self.listeners.single.read().len())
            .field("payloads_listeners", &self.listeners.many.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn every_listener_receives_the_same_emission() {
        let channel = NotificationChannel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _subscriptions: Vec<Subscription> = (0..2)
            .map(|_| {
                let seen = Arc::clone(&seen);
                channel.subscribe_payload(move |p| seen.lock().push(p.to_vec()))
            })
            .collect();

        channel.emit(&Outcome::Delivered(b"x".to_vec()));
        assert_eq!(*seen.lock(), vec![b"x".to_vec(), b"x".to_vec()]);
    }

    #[test]
    fn shapes_are_routed_separately() {
        let channel = NotificationChannel::new();
        let singles = Arc::new(AtomicUsize::new(0));
        let batches = Arc::new(AtomicUsize::new(0));
        let _single = {
            let singles = Arc::clone(&singles);
            channel.subscribe_payload(move |_| {
                singles.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _many = {
            let batches = Arc::clone(&batches);
            channel.subscribe_payloads(move |p| {
                batches.fetch_add(p.len(), Ordering::SeqCst);
            })
        };

        channel.emit(&Outcome::DeliveredMany(vec![vec![1], vec![2]]));
        channel.emit(&Outcome::Completed);
        channel.emit(&Outcome::KeyUnique);

        assert_eq!(singles.load(Ordering::SeqCst), 0);
        assert_eq!(batches.load(Ordering::SeqCst), 2);
        assert_eq!(channel.listener_count(), 2);
    }

    #[test]
    fn dropping_subscription_removes_listener() {
        let channel = NotificationChannel::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let calls = Arc::clone(&calls);
            channel.subscribe_payload(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        channel.emit(&Outcome::Delivered(vec![1]));
        drop(subscription);
        channel.emit(&Outcome::Delivered(vec![2]));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_channel_is_harmless() {
        let channel = NotificationChannel::new();
        let subscription = channel.subscribe_payloads(|_| {});
        drop(channel);
        drop(subscription);
    }

    #[test]
    fn listener_may_subscribe_during_emit() {
        let channel = Arc::new(NotificationChannel::new());
        let added = Arc::new(Mutex::new(Vec::new()));
        let _outer = {
            let weak = Arc::downgrade(&channel);
            let added = Arc::clone(&added);
            channel.subscribe_payload(move |_| {
                if let Some(channel) = weak.upgrade() {
                    added.lock().push(channel.subscribe_payload(|_| {}));
                }
            })
        };

        channel.emit(&Outcome::Delivered(vec![7]));
        assert_eq!(added.lock().len(), 1);
        assert_eq!(channel.listener_count(), 2);
    }
}
