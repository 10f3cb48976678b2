//! Push-based stream nodes.
//!
//! A `Stream<T>` is a shared handle to one node of a synchronous dataflow
//! graph. Every combinator creates a child node and registers a subscriber on
//! its parent that forwards transformed values into the child, so a value
//! passed to `emit` has travelled through the whole downstream graph by the
//! time `emit` returns.
//!
//! Delivery follows registration order. The first error raised by any
//! subscriber aborts the rest of the tick and is returned from `emit`.

use crate::journal::Journal;
use crate::subscription::{SubscriptionId, SubscriptionManager};
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use streamframe_core::{Error, Result};

/// Process-unique identifier of a stream node.
pub type StreamId = u64;

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

struct Node<T> {
    id: StreamId,
    subscribers: RefCell<SubscriptionManager<T>>,
}

/// A node in a push-based dataflow graph.
///
/// Cloning a stream clones the handle, not the node.
pub struct Stream<T> {
    node: Rc<Node<T>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self.node.subscribers.try_borrow().map(|s| s.len()).ok();
        f.debug_struct("Stream")
            .field("id", &self.node.id)
            .field("subscribers", &subscribers)
            .finish()
    }
}

impl<T: 'static> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Stream<T> {
    /// Creates a new source node with no subscribers.
    pub fn new() -> Self {
        Self {
            node: Rc::new(Node {
                id: NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed),
                subscribers: RefCell::new(SubscriptionManager::new()),
            }),
        }
    }

    /// Returns the node identifier.
    #[inline]
    pub fn id(&self) -> StreamId {
        self.node.id
    }

    /// Returns true if both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Stream<T>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Returns the number of subscribers on this node.
    pub fn subscriber_count(&self) -> usize {
        self.node.subscribers.borrow().len()
    }

    /// Registers a callback invoked for every value pushed into this node.
    pub fn subscribe<F>(&self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&T) -> Result<()> + 'static,
    {
        self.subscribe_in_tick(move |x, _| callback(x))
    }

    /// Registers a callback that also receives the journal of the current
    /// tick, for nodes that keep state across values.
    pub fn subscribe_in_tick<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T, &mut Journal) -> Result<()> + 'static,
    {
        self.node.subscribers.borrow_mut().subscribe(callback)
    }

    /// Removes a subscriber.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.node.subscribers.borrow_mut().unsubscribe(id)
    }

    /// Pushes a value through every downstream node.
    ///
    /// A tick is all or nothing: if any subscriber fails, every stateful
    /// node it reached is restored before the error is returned. Emitting
    /// into a node from inside one of its own subscribers is rejected with
    /// `InvalidOperation`.
    pub fn emit(&self, value: T) -> Result<()> {
        let mut journal = Journal::new();
        let result = self.deliver(value, &mut journal);
        if result.is_err() {
            tracing::trace!(stream = self.node.id, undone = journal.len(), "tick aborted");
            journal.rollback();
        }
        result
    }

    /// Pushes a value as part of the tick that owns `journal`.
    pub fn deliver(&self, value: T, journal: &mut Journal) -> Result<()> {
        let mut subscribers = self.node.subscribers.try_borrow_mut().map_err(|_| {
            Error::invalid_operation("re-entrant emit into a stream that is already delivering")
        })?;
        tracing::trace!(stream = self.node.id, subscribers = subscribers.len(), "emit");
        subscribers.notify_all(&value, journal)
    }

    /// Registers a terminal callback.
    pub fn sink<F>(&self, f: F) -> SubscriptionId
    where
        F: FnMut(&T) -> Result<()> + 'static,
    {
        self.subscribe(f)
    }

    /// Creates a child node fed by `forward`, which receives each parent
    /// value, the child handle and the tick journal.
    fn derive<U, F>(&self, mut forward: F) -> Stream<U>
    where
        U: 'static,
        F: FnMut(&T, &Stream<U>, &mut Journal) -> Result<()> + 'static,
    {
        let child = Stream::new();
        let out = child.clone();
        self.subscribe_in_tick(move |x, journal| forward(x, &out, journal));
        tracing::trace!(parent = self.node.id, child = child.id(), "derive");
        child
    }

    /// Applies `f` to every value.
    pub fn map<U, F>(&self, mut f: F) -> Stream<U>
    where
        U: 'static,
        F: FnMut(&T) -> Result<U> + 'static,
    {
        self.derive(move |x, out, journal| out.deliver(f(x)?, journal))
    }

    /// Forwards only the values for which `predicate` holds.
    pub fn filter<F>(&self, mut predicate: F) -> Stream<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool + 'static,
    {
        self.derive(move |x, out, journal| {
            if predicate(x) {
                out.deliver(x.clone(), journal)
            } else {
                Ok(())
            }
        })
    }

    /// Maps every value and forwards the `Some` results.
    pub fn filter_map<U, F>(&self, mut f: F) -> Stream<U>
    where
        U: 'static,
        F: FnMut(&T) -> Result<Option<U>> + 'static,
    {
        self.derive(move |x, out, journal| match f(x)? {
            Some(y) => out.deliver(y, journal),
            None => Ok(()),
        })
    }

    /// Running fold whose state is also the emitted value.
    ///
    /// With `start = None` the first value seeds the state and is emitted
    /// unchanged. State only advances when `f` succeeds, and is restored if
    /// the tick fails further on.
    pub fn accumulate<F>(&self, start: Option<T>, mut f: F) -> Stream<T>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Result<T> + 'static,
    {
        let state = Rc::new(RefCell::new(start));
        self.derive(move |x, out, journal| {
            let next = match &*state.borrow() {
                Some(acc) => f(acc, x)?,
                None => x.clone(),
            };
            commit(&state, Some(next.clone()), journal);
            out.deliver(next, journal)
        })
    }

    /// Running fold with state kept apart from the emitted value.
    ///
    /// `f` returns `(new_state, output)`. State only advances when `f`
    /// succeeds, and is restored if the tick fails further on.
    pub fn scan<S, U, F>(&self, start: S, mut f: F) -> Stream<U>
    where
        S: 'static,
        U: 'static,
        F: FnMut(&S, &T) -> Result<(S, U)> + 'static,
    {
        let state = Rc::new(RefCell::new(start));
        self.derive(move |x, out, journal| {
            let (next, output) = f(&state.borrow(), x)?;
            commit(&state, next, journal);
            out.deliver(output, journal)
        })
    }

    /// Pairs values of two streams in arrival order.
    ///
    /// A pair is emitted once both sides have a buffered value; the faster
    /// side queues without bound. Buffers are restored when a tick fails, so
    /// the two sides stay in step.
    pub fn zip<U>(&self, other: &Stream<U>) -> Stream<(T, U)>
    where
        T: Clone,
        U: Clone + 'static,
    {
        let buffers: Rc<RefCell<(VecDeque<T>, VecDeque<U>)>> =
            Rc::new(RefCell::new((VecDeque::new(), VecDeque::new())));

        let left = buffers.clone();
        let out = self.derive(move |x: &T, out: &Stream<(T, U)>, journal: &mut Journal| {
            let ready = update_buffers(&left, journal, |b| {
                b.0.push_back(x.clone());
                pop_pair(b)
            });
            match ready {
                Some(pair) => out.deliver(pair, journal),
                None => Ok(()),
            }
        });

        let right = buffers;
        let target = out.clone();
        other.subscribe_in_tick(move |y: &U, journal: &mut Journal| {
            let ready = update_buffers(&right, journal, |b| {
                b.1.push_back(y.clone());
                pop_pair(b)
            });
            match ready {
                Some(pair) => target.deliver(pair, journal),
                None => Ok(()),
            }
        });
        out
    }

    /// Zips this stream with any number of streams of the same type.
    ///
    /// Emits `[self, others...]` once every input has a buffered value.
    pub fn zip_all(&self, others: &[Stream<T>]) -> Stream<Vec<T>>
    where
        T: Clone,
    {
        let inputs: Vec<Stream<T>> = core::iter::once(self.clone())
            .chain(others.iter().cloned())
            .collect();
        let buffers: Rc<RefCell<Vec<VecDeque<T>>>> =
            Rc::new(RefCell::new(inputs.iter().map(|_| VecDeque::new()).collect()));

        let out: Stream<Vec<T>> = Stream::new();
        for (slot, input) in inputs.iter().enumerate() {
            let buffers = buffers.clone();
            let target = out.clone();
            input.subscribe_in_tick(move |x: &T, journal: &mut Journal| {
                let ready = update_buffers(&buffers, journal, |b| {
                    b[slot].push_back(x.clone());
                    if b.iter().all(|q| !q.is_empty()) {
                        b.iter_mut().map(|q| q.pop_front()).collect::<Option<Vec<T>>>()
                    } else {
                        None
                    }
                });
                match ready {
                    Some(row) => target.deliver(row, journal),
                    None => Ok(()),
                }
            });
        }
        tracing::trace!(inputs = inputs.len(), child = out.id(), "zip_all");
        out
    }

    /// Collects every value into a shared list.
    pub fn sink_to_list(&self) -> Rc<RefCell<Vec<T>>>
    where
        T: Clone,
    {
        let list = Rc::new(RefCell::new(Vec::new()));
        let target = list.clone();
        self.sink(move |x| {
            target.borrow_mut().push(x.clone());
            Ok(())
        });
        list
    }
}

/// Replaces fold state and journals the previous value.
fn commit<S: 'static>(state: &Rc<RefCell<S>>, next: S, journal: &mut Journal) {
    let prev = state.replace(next);
    let target = state.clone();
    journal.record(move || {
        target.replace(prev);
    });
}

/// Applies `update` to zip buffers after journalling a snapshot of them.
fn update_buffers<B, R>(
    buffers: &Rc<RefCell<B>>,
    journal: &mut Journal,
    update: impl FnOnce(&mut B) -> R,
) -> R
where
    B: Clone + 'static,
{
    let mut b = buffers.borrow_mut();
    let before = b.clone();
    let target = buffers.clone();
    journal.record(move || *target.borrow_mut() = before);
    update(&mut b)
}

fn pop_pair<T, U>(buffers: &mut (VecDeque<T>, VecDeque<U>)) -> Option<(T, U)> {
    if buffers.0.is_empty() || buffers.1.is_empty() {
        return None;
    }
    Some((buffers.0.pop_front()?, buffers.1.pop_front()?))
}
