//! Built-in event listeners.
//!
//! [`PersistenceListener`] is what keeps the key-value store in step with
//! the in-memory stores; [`AppContext`](crate::AppContext) registers it
//! together with a [`LoggingListener`].

mod logging;
mod persistence;
#[cfg(feature = "tracing")]
mod tracing;

pub use logging::LoggingListener;
pub use persistence::PersistenceListener;
#[cfg(feature = "tracing")]
pub use self::tracing::TracingListener;
