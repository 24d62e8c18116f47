use crate::api::{FitnessGoal, GoalType, NutritionApi};
use crate::query::{resources, QueryCache};
use crate::state::NutritionStore;
use crate::ClientError;

pub struct CreateGoalAction<A: NutritionApi> {
    api: A,
    cache: QueryCache,
    nutrition: NutritionStore,
}

impl<A: NutritionApi> CreateGoalAction<A> {
    pub fn new(api: A, cache: QueryCache, nutrition: NutritionStore) -> Self {
        CreateGoalAction {
            api,
            cache,
            nutrition,
        }
    }

    /// Creates the goal; the backend makes it the active one.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_goal", skip_all, err)
    )]
    pub async fn execute(&self, goal_type: GoalType) -> Result<FitnessGoal, ClientError> {
        let goal = self.api.create_fitness_goal(goal_type).await?;

        self.cache.set_query_data(
            &resources::ACTIVE_FITNESS_GOAL.key(),
            goal.clone(),
            resources::ACTIVE_FITNESS_GOAL.stale_time,
        );
        self.nutrition.set_fitness_goal(goal.clone()).await;

        log::info!(
            target: "nutritrack",
            "msg=\"fitness goal created\" goal_type={goal_type}"
        );

        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::EventRegistry;
    use crate::MockNutritionApi;

    #[tokio::test]
    async fn test_create_goal_becomes_active_goal() {
        let api = MockNutritionApi::new();
        let cache = QueryCache::new();
        let nutrition = NutritionStore::new(Arc::new(EventRegistry::new()));
        let action = CreateGoalAction::new(api, cache.clone(), nutrition.clone());

        let goal = action.execute(GoalType::WeightLoss).await.unwrap();

        assert!(goal.is_active);
        assert_eq!(
            cache
                .get_query_data::<FitnessGoal>(&resources::ACTIVE_FITNESS_GOAL.key())
                .map(|g| g.goal_type),
            Some(GoalType::WeightLoss)
        );
        assert_eq!(nutrition.fitness_goal(), Some(goal));
    }
}
