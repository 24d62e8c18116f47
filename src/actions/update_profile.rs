use crate::api::{NutritionApi, ProfileUpdateRequest, UserProfile};
use crate::query::{resources, QueryCache};
use crate::state::NutritionStore;
use crate::validators::validate_profile_update;
use crate::ClientError;

pub struct UpdateProfileAction<A: NutritionApi> {
    api: A,
    cache: QueryCache,
    nutrition: NutritionStore,
}

impl<A: NutritionApi> UpdateProfileAction<A> {
    pub fn new(api: A, cache: QueryCache, nutrition: NutritionStore) -> Self {
        UpdateProfileAction {
            api,
            cache,
            nutrition,
        }
    }

    /// Sends the present fields and stores the returned profile as the
    /// fresh `userProfile` value.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_profile", skip_all, err)
    )]
    pub async fn execute(&self, request: &ProfileUpdateRequest) -> Result<UserProfile, ClientError> {
        validate_profile_update(request)?;

        let profile = self.api.update_user_profile(request).await?;

        self.cache.set_query_data(
            &resources::USER_PROFILE.key(),
            profile.clone(),
            resources::USER_PROFILE.stale_time,
        );
        self.nutrition.set_profile(profile.clone()).await;

        log::info!(target: "nutritrack", "msg=\"profile updated\"");

        Ok(profile)
    }
}
