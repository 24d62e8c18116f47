//! Store change notifications.
//!
//! The session, nutrition and app-state stores dispatch a [`StoreEvent`]
//! after every change. Persistence is one listener among others: the stores
//! themselves never touch the key-value store.
//!
//! # Custom Listeners
//!
//! Implement the [`Listener`] trait to create custom event handlers:
//!
//! ```rust
//! use async_trait::async_trait;
//! use nutritrack::events::{Listener, StoreEvent};
//!
//! struct LogoutCounter;
//!
//! #[async_trait]
//! impl Listener for LogoutCounter {
//!     async fn handle(&self, event: &StoreEvent) {
//!         match event {
//!             StoreEvent::SessionChanged { snapshot, .. } if !snapshot.is_authenticated => {
//!                 // increment a counter
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::StoreEvent;
pub use listener::Listener;
pub use registry::EventRegistry;
