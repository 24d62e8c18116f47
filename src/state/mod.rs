//! Nutrition and app-state stores.
//!
//! Both follow the session store's shape: a cloneable handle over shared
//! state, one [`StoreEvent`](crate::events::StoreEvent) per change.

mod app;
mod nutrition;

pub use app::{AppStateSnapshot, AppStore};
pub use nutrition::{NutritionSnapshot, NutritionStore};
