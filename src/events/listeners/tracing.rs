use async_trait::async_trait;

use crate::events::{Listener, StoreEvent};

/// Emits store events as tracing events.
///
/// Requires the `tracing` feature to be enabled.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &StoreEvent) {
        tracing::info!(
            target: "nutritrack::events",
            event_name = event.name(),
            at = %event.timestamp(),
            "store event"
        );
    }
}
