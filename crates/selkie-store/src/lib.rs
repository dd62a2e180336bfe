#![forbid(unsafe_code)]

//! Observable state container used by `selkie`.
//!
//! A [`Store`] owns a single state value and a list of subscriptions. Each subscription is
//! keyed by a projection function: the listener only fires when the projected slice compares
//! unequal to the slice captured at the previous notification. This gives consumers cheap,
//! fine-grained change detection without the store knowing anything about the state's shape.
//!
//! The container is deliberately single-threaded. All mutations go through `&mut self`, so
//! re-entrant updates from inside a listener are rejected at compile time rather than guarded
//! at runtime.

/// Identifies a subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber<S> {
    id: SubscriptionId,
    // Captures the selector, the last projected slice and the listener. Returns nothing;
    // the closure decides internally whether the slice changed.
    notify: Box<dyn FnMut(&S)>,
}

pub struct Store<S> {
    state: S,
    subscribers: Vec<Subscriber<S>>,
    next_id: u64,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Read-only access to the current state.
    pub fn get(&self) -> &S {
        &self.state
    }

    /// Applies a mutation to the state, then notifies every subscription whose projected
    /// slice changed.
    pub fn update(&mut self, f: impl FnOnce(&mut S)) {
        f(&mut self.state);
        for sub in &mut self.subscribers {
            (sub.notify)(&self.state);
        }
    }

    /// Replaces the whole state value. Equivalent to `update` with an assignment.
    pub fn replace(&mut self, state: S) {
        self.update(|s| *s = state);
    }

    /// Registers a listener keyed by `selector`. The listener fires after an update only when
    /// the projected slice compares unequal to the previously observed slice.
    pub fn subscribe<T, F, L>(&mut self, selector: F, mut listener: L) -> SubscriptionId
    where
        T: PartialEq + Clone + 'static,
        F: Fn(&S) -> T + 'static,
        L: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut last = selector(&self.state);
        let notify = Box::new(move |state: &S| {
            let next = selector(state);
            if next != last {
                listener(&next);
                last = next;
            }
        });

        self.subscribers.push(Subscriber { id, notify });
        id
    }

    /// Removes a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|s| s.id != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
