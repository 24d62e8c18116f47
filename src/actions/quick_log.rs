use crate::api::{NutritionApi, QuickLogRequest, QuickLogResponse};
use crate::query::{resources, QueryCache};
use crate::validators::validate_quick_log;
use crate::ClientError;

/// Logs a food item for a meal.
///
/// On success the day's log, targets and the summary are invalidated, as is
/// the per-date log of the logged day. The profile is left alone.
pub struct QuickLogAction<A: NutritionApi> {
    api: A,
    cache: QueryCache,
}

impl<A: NutritionApi> QuickLogAction<A> {
    pub fn new(api: A, cache: QueryCache) -> Self {
        QuickLogAction { api, cache }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "quick_log", skip_all, err)
    )]
    pub async fn execute(&self, request: &QuickLogRequest) -> Result<QuickLogResponse, ClientError> {
        validate_quick_log(request)?;

        let response = self.api.quick_log_food(request).await?;

        for key in [
            resources::TODAY_LOG.key(),
            resources::TODAY_TARGETS.key(),
            resources::NUTRITION_SUMMARY.key(),
            resources::DAILY_LOG
                .key()
                .with(request.date.format("%Y-%m-%d").to_string()),
        ] {
            self.cache.invalidate(&key);
        }

        log::info!(
            target: "nutritrack",
            "msg=\"food logged\" meal_type={} date={}",
            request.meal_type.as_str(),
            request.date
        );

        Ok(response)
    }
}
