use async_trait::async_trait;

use super::StoreEvent;

/// Trait for reacting to store changes asynchronously.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use nutritrack::events::{Listener, StoreEvent};
///
/// struct SyncBadge;
///
/// #[async_trait]
/// impl Listener for SyncBadge {
///     async fn handle(&self, event: &StoreEvent) {
///         if let StoreEvent::SessionChanged { snapshot, .. } = event {
///             println!("signed in: {}", snapshot.is_authenticated);
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event, in registration order.
    async fn handle(&self, event: &StoreEvent);
}
