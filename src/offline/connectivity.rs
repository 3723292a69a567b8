//! Connectivity source
//!
//! Single source of truth for the online/offline flag. Listeners run
//! synchronously, in subscription order, and only when the value changes.

use std::sync::{Arc, Mutex};

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned by [`Connectivity::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct State {
    online: bool,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Observable online/offline state
pub struct Connectivity {
    state: Mutex<State>,
}

impl Connectivity {
    /// Create a source with a defined initial value
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::offline::Connectivity;
    ///
    /// let connectivity = Connectivity::new(false);
    /// assert!(!connectivity.is_online());
    /// connectivity.set_online(true);
    /// assert!(connectivity.is_online());
    /// ```
    pub fn new(online: bool) -> Self {
        Self {
            state: Mutex::new(State {
                online,
                next_id: 0,
                listeners: Vec::new(),
            }),
        }
    }

    /// Current value
    pub fn is_online(&self) -> bool {
        match self.state.lock() {
            Ok(state) => state.online,
            Err(poisoned) => poisoned.into_inner().online,
        }
    }

    /// Update the value, notifying listeners if it changed
    ///
    /// Returns whether the value changed.
    pub fn set_online(&self, online: bool) -> bool {
        let listeners: Vec<Listener> = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            if state.online == online {
                return false;
            }
            state.online = online;
            state.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        tracing::info!(
            "Connectivity changed: {}",
            if online { "online" } else { "offline" }
        );
        for listener in listeners {
            listener(online);
        }
        true
    }

    /// Register a listener called with the new value on every change
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = state.listeners.len();
        state.listeners.retain(|(sid, _)| *sid != id);
        state.listeners.len() != before
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}
