use crate::query::{resources, QueryCache};

/// Pull-to-refresh: marks the dashboard reads stale so the next read of
/// each fetches again.
pub struct RefreshAllAction {
    cache: QueryCache,
}

impl RefreshAllAction {
    pub fn new(cache: QueryCache) -> Self {
        RefreshAllAction { cache }
    }

    /// Returns how many cached values were marked stale.
    pub fn execute(&self) -> usize {
        let affected: usize = [
            resources::TODAY_LOG,
            resources::TODAY_TARGETS,
            resources::USER_PROFILE,
            resources::ACTIVE_FITNESS_GOAL,
            resources::NUTRITION_SUMMARY,
        ]
        .iter()
        .map(|resource| self.cache.invalidate(&resource.key()))
        .sum();

        log::debug!(target: "nutritrack", "msg=\"refresh all\" affected={affected}");
        affected
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_refresh_all_leaves_other_reads() {
        let cache = QueryCache::new();
        let minute = Duration::from_secs(60);
        cache.set_query_data(&resources::TODAY_LOG.key(), 1u8, minute);
        cache.set_query_data(&resources::ACTIVE_FITNESS_GOAL.key(), 1u8, minute);
        cache.set_query_data(&resources::SCANNED_FOODS.key(), 1u8, minute);

        assert_eq!(RefreshAllAction::new(cache.clone()).execute(), 2);

        assert_eq!(cache.is_stale(&resources::TODAY_LOG.key()), Some(true));
        assert_eq!(cache.is_stale(&resources::ACTIVE_FITNESS_GOAL.key()), Some(true));
        assert_eq!(cache.is_stale(&resources::SCANNED_FOODS.key()), Some(false));
    }
}
