//! Request executor and backend schemas.
//!
//! [`NutritionApi`] is the seam between the client core and the backend.
//! [`ApiClient`] implements it over HTTP; [`MockNutritionApi`] implements it
//! in memory for tests (`mocks` feature).

mod client;
pub mod endpoints;
mod service;
mod types;

#[cfg(any(test, feature = "mocks"))]
mod mock;

pub use client::{ApiClient, ApiRequest};
pub use service::NutritionApi;
pub use types::*;

#[cfg(any(test, feature = "mocks"))]
pub use mock::{MockBackend, MockNutritionApi};
