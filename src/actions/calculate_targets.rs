use crate::api::{CalculateTargetsRequest, NutritionApi, NutritionTargets};
use crate::query::{resources, QueryCache};
use crate::state::NutritionStore;
use crate::ClientError;

/// Asks the backend to compute targets for a date. The result replaces
/// `todayTargets`.
pub struct CalculateTargetsAction<A: NutritionApi> {
    api: A,
    cache: QueryCache,
    nutrition: NutritionStore,
}

impl<A: NutritionApi> CalculateTargetsAction<A> {
    pub fn new(api: A, cache: QueryCache, nutrition: NutritionStore) -> Self {
        CalculateTargetsAction {
            api,
            cache,
            nutrition,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "calculate_targets", skip_all, err)
    )]
    pub async fn execute(
        &self,
        request: &CalculateTargetsRequest,
    ) -> Result<NutritionTargets, ClientError> {
        let targets = self.api.calculate_targets(request).await?;

        self.cache.set_query_data(
            &resources::TODAY_TARGETS.key(),
            targets.clone(),
            resources::TODAY_TARGETS.stale_time,
        );
        self.nutrition.set_targets(targets.clone()).await;

        log::info!(
            target: "nutritrack",
            "msg=\"targets calculated\" date={} calories={}",
            targets.date,
            targets.calories
        );

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::api::{Gender, GoalType, ProfileData};
    use crate::events::EventRegistry;
    use crate::MockNutritionApi;

    #[tokio::test]
    async fn test_targets_cached_and_stored() {
        let api = MockNutritionApi::new();
        let cache = QueryCache::new();
        let nutrition = NutritionStore::new(Arc::new(EventRegistry::new()));
        let action = CalculateTargetsAction::new(api, cache.clone(), nutrition.clone());

        let request = CalculateTargetsRequest {
            profile_data: ProfileData {
                weight: 70.0,
                height: 175.0,
                age: 30,
                gender: Gender::Male,
                activity_level: 1.55,
            },
            goal_type: GoalType::Maintenance,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let targets = action.execute(&request).await.unwrap();

        assert_eq!(targets.date, request.date);
        assert_eq!(
            cache.get_query_data::<NutritionTargets>(&resources::TODAY_TARGETS.key()),
            Some(targets.clone())
        );
        assert_eq!(nutrition.targets(), Some(targets));
    }
}
