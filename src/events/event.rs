use chrono::{DateTime, Utc};

use crate::session::SessionSnapshot;
use crate::state::{AppStateSnapshot, NutritionSnapshot};

/// Change notifications emitted by the in-memory stores.
///
/// Every store mutation dispatches one event carrying the persisted subset
/// of the store after the change. Listeners registered on the
/// [`EventRegistry`](super::EventRegistry) decide what to do with it.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    SessionChanged {
        snapshot: SessionSnapshot,
        at: DateTime<Utc>,
    },
    NutritionChanged {
        snapshot: NutritionSnapshot,
        at: DateTime<Utc>,
    },
    AppStateChanged {
        snapshot: AppStateSnapshot,
        at: DateTime<Utc>,
    },
    /// The query cache dropped every entry (logout, teardown).
    CacheCleared { at: DateTime<Utc> },
}

impl StoreEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionChanged { .. } => "store.session.changed",
            Self::NutritionChanged { .. } => "store.nutrition.changed",
            Self::AppStateChanged { .. } => "store.app.changed",
            Self::CacheCleared { .. } => "cache.cleared",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SessionChanged { at, .. }
            | Self::NutritionChanged { at, .. }
            | Self::AppStateChanged { at, .. }
            | Self::CacheCleared { at } => *at,
        }
    }
}
