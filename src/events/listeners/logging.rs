use async_trait::async_trait;

use crate::events::{Listener, StoreEvent};

/// Logs all store events using the `log` crate.
///
/// Snapshots are not logged; they contain the user record and tokens.
///
/// # Example
///
/// ```rust
/// use nutritrack::events::listeners::LoggingListener;
/// use nutritrack::events::EventRegistry;
///
/// let registry = EventRegistry::new();
/// registry.listen(LoggingListener::with_level(log::Level::Debug));
/// ```
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Creates a new logging listener at INFO level.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    /// Creates a new logging listener at the specified level.
    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &StoreEvent) {
        match event {
            StoreEvent::SessionChanged { snapshot, at } => log::log!(
                target: "nutritrack::events",
                self.level,
                "event={} authenticated={} user_id={:?} at={}",
                event.name(),
                snapshot.is_authenticated,
                snapshot.user.as_ref().map(|u| u.id),
                at
            ),
            StoreEvent::AppStateChanged { snapshot, at } => log::log!(
                target: "nutritrack::events",
                self.level,
                "event={} onboarding_completed={} at={}",
                event.name(),
                snapshot.onboarding_completed,
                at
            ),
            _ => log::log!(
                target: "nutritrack::events",
                self.level,
                "event={} at={}",
                event.name(),
                event.timestamp()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionSnapshot;
    use chrono::Utc;

    #[test]
    fn test_logging_listener_default() {
        let listener = LoggingListener::default();
        assert_eq!(listener.level, log::Level::Info);
    }

    #[test]
    fn test_logging_listener_with_level() {
        let listener = LoggingListener::with_level(log::Level::Debug);
        assert_eq!(listener.level, log::Level::Debug);
    }

    #[tokio::test]
    async fn test_logging_listener_handle() {
        let listener = LoggingListener::new();
        let event = StoreEvent::SessionChanged {
            snapshot: SessionSnapshot::default(),
            at: Utc::now(),
        };

        // should not panic
        listener.handle(&event).await;
        listener
            .handle(&StoreEvent::CacheCleared { at: Utc::now() })
            .await;
    }
}
