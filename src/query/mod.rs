//! Query cache and the cached backend reads.
//!
//! | Read | Key | Stale time |
//! |---|---|---|
//! | current user | `currentUser` | 5 min |
//! | user profile | `userProfile` | 5 min |
//! | active goal | `activeFitnessGoal` | 10 min |
//! | today's targets | `todayTargets` | 5 min |
//! | scanned foods | `scannedFoods` | 2 min |
//! | AI stats | `userStats` | 5 min |
//! | today's log | `todayLog` | 1 min |
//! | nutrition summary | `nutritionSummary` | 5 min |
//! | log by date | `dailyLog, <date>` | 5 min |
//! | food search | `foodSearch, <query>` | 5 min |
//!
//! Mutations in [`actions`](crate::actions) update or invalidate these keys.

mod cache;
mod key;
mod options;
mod queries;

pub use cache::{QueryCache, DEFAULT_GC_TIME};
pub use key::{resources, QueryKey, Resource};
pub use options::QueryOptions;
pub use queries::{OnboardingStatus, Queries};
