use chrono::Local;

use super::{CalculateTargetsAction, CreateGoalAction, UpdateProfileAction};
use crate::api::{CalculateTargetsRequest, NutritionApi, NutritionTargets};
use crate::query::QueryCache;
use crate::state::{AppStore, NutritionStore};
use crate::validators::OnboardingForm;
use crate::ClientError;

/// Submits the onboarding form.
///
/// Steps run in order and stop at the first failure; the onboarding flag is
/// only set once all three backend calls have succeeded:
///
/// 1. update the profile (names and physical data)
/// 2. create the fitness goal
/// 3. calculate targets for today
/// 4. mark onboarding completed
pub struct CompleteOnboardingAction<A: NutritionApi + Clone> {
    update_profile: UpdateProfileAction<A>,
    create_goal: CreateGoalAction<A>,
    calculate_targets: CalculateTargetsAction<A>,
    app: AppStore,
}

impl<A: NutritionApi + Clone> CompleteOnboardingAction<A> {
    pub fn new(api: A, cache: QueryCache, nutrition: NutritionStore, app: AppStore) -> Self {
        CompleteOnboardingAction {
            update_profile: UpdateProfileAction::new(api.clone(), cache.clone(), nutrition.clone()),
            create_goal: CreateGoalAction::new(api.clone(), cache.clone(), nutrition.clone()),
            calculate_targets: CalculateTargetsAction::new(api, cache, nutrition),
            app,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "complete_onboarding", skip_all, err)
    )]
    pub async fn execute(&self, form: &OnboardingForm) -> Result<NutritionTargets, ClientError> {
        let submission = form.validate()?;

        self.update_profile.execute(&submission.profile).await?;
        self.create_goal.execute(submission.goal_type).await?;
        let targets = self
            .calculate_targets
            .execute(&CalculateTargetsRequest {
                profile_data: submission.profile_data,
                goal_type: submission.goal_type,
                date: Local::now().date_naive(),
            })
            .await?;

        self.app.set_onboarding_completed(true).await;

        log::info!(target: "nutritrack", "msg=\"onboarding completed\"");

        Ok(targets)
    }
}
