use std::fmt;
use std::time::Duration;

/// Ordered tuple identifying a cached read, e.g. `["dailyLog", "2024-05-01"]`.
///
/// Invalidation matches by prefix: `["dailyLog"]` covers every date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Appends a part, e.g. a date or a search term.
    pub fn with(mut self, part: impl Into<String>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// True if `self` equals `other` or is a leading part of it.
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<&str> for QueryKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A cached backend read: its key name and how long a fetched value stays
/// fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub stale_time: Duration,
}

impl Resource {
    const fn new(name: &'static str, stale_time: Duration) -> Self {
        Self { name, stale_time }
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.name)
    }
}

pub mod resources {
    //! Every cached read.

    use std::time::Duration;

    use super::Resource;

    pub const CURRENT_USER: Resource = Resource::new("currentUser", Duration::from_secs(5 * 60));
    pub const USER_PROFILE: Resource = Resource::new("userProfile", Duration::from_secs(5 * 60));
    pub const ACTIVE_FITNESS_GOAL: Resource =
        Resource::new("activeFitnessGoal", Duration::from_secs(10 * 60));
    pub const TODAY_TARGETS: Resource = Resource::new("todayTargets", Duration::from_secs(5 * 60));
    pub const SCANNED_FOODS: Resource = Resource::new("scannedFoods", Duration::from_secs(2 * 60));
    pub const USER_STATS: Resource = Resource::new("userStats", Duration::from_secs(5 * 60));
    pub const TODAY_LOG: Resource = Resource::new("todayLog", Duration::from_secs(60));
    pub const NUTRITION_SUMMARY: Resource =
        Resource::new("nutritionSummary", Duration::from_secs(5 * 60));
    pub const DAILY_LOG: Resource = Resource::new("dailyLog", Duration::from_secs(5 * 60));
    pub const FOOD_SEARCH: Resource = Resource::new("foodSearch", Duration::from_secs(5 * 60));
}
