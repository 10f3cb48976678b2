//! Subscription management for streams.
//!
//! This module provides subscription IDs and a manager for the callbacks
//! registered on a stream node. Callbacks run in registration order and may
//! fail; the first failure stops delivery of the current value.

use crate::journal::Journal;
use alloc::boxed::Box;
use alloc::vec::Vec;
use streamframe_core::Result;

/// Unique identifier for a subscription on one stream.
pub type SubscriptionId = u64;

/// Callback invoked for every value delivered to a stream, together with the
/// journal of the tick that carries it.
pub type SubscriberFn<T> = Box<dyn FnMut(&T, &mut Journal) -> Result<()>>;

/// A subscription to stream values.
pub struct Subscription<T> {
    /// Unique identifier
    id: SubscriptionId,
    /// Callback to invoke on each value
    callback: SubscriberFn<T>,
}

impl<T> Subscription<T> {
    /// Creates a new subscription.
    pub fn new<F>(id: SubscriptionId, callback: F) -> Self
    where
        F: FnMut(&T, &mut Journal) -> Result<()> + 'static,
    {
        Self {
            id,
            callback: Box::new(callback),
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Delivers a value to this subscription.
    pub fn notify(&mut self, value: &T, journal: &mut Journal) -> Result<()> {
        (self.callback)(value, journal)
    }
}

/// Ordered set of subscriptions for one stream node.
pub struct SubscriptionManager<T> {
    /// Subscriptions in registration order
    subscriptions: Vec<Subscription<T>>,
    /// Next subscription ID to assign
    next_id: SubscriptionId,
}

impl<T> Default for SubscriptionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubscriptionManager<T> {
    /// Creates a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 1,
        }
    }

    /// Subscribes with the given callback.
    ///
    /// Returns the subscription ID that can be used to unsubscribe.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T, &mut Journal) -> Result<()> + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.push(Subscription::new(id, callback));
        id
    }

    /// Unsubscribes by ID.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id() != id);
        self.subscriptions.len() != before
    }

    /// Delivers a value to every subscription, stopping at the first error.
    pub fn notify_all(&mut self, value: &T, journal: &mut Journal) -> Result<()> {
        for sub in self.subscriptions.iter_mut() {
            sub.notify(value, journal)?;
        }
        Ok(())
    }

    /// Returns the number of subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if there are no subscriptions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
