use std::sync::{Arc, PoisonError, RwLock};

use super::{Listener, StoreEvent};

/// Listeners for store events.
///
/// One registry belongs to one [`AppContext`](crate::AppContext) and is
/// shared with its stores through an `Arc`, so separate contexts (tests,
/// multiple accounts) never see each other's events.
///
/// ```rust
/// use std::sync::Arc;
///
/// use nutritrack::events::listeners::LoggingListener;
/// use nutritrack::events::EventRegistry;
///
/// let registry = Arc::new(EventRegistry::new());
/// registry.listen(LoggingListener::new());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Default)]
pub struct EventRegistry {
    listeners: RwLock<Vec<Arc<dyn Listener>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener to receive events.
    ///
    /// Listeners are called in the order they are registered.
    pub fn listen(&self, listener: impl Listener) -> &Self {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
        self
    }

    /// Dispatch an event to all registered listeners.
    ///
    /// If no listeners are registered, this is a no-op.
    pub async fn dispatch(&self, event: StoreEvent) {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for listener in listeners {
            listener.handle(&event).await;
        }
    }

    /// Drops every listener. Later dispatches are no-ops.
    pub fn clear(&self) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
