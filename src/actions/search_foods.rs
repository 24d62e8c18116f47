use crate::api::{endpoints, FoodSearchResponse, NutritionApi};
use crate::query::{resources, QueryCache, QueryOptions};
use crate::validators::{FieldErrors, ValidationError};
use crate::ClientError;

/// Searches the food database. Results are cached per trimmed query, so
/// repeating a search within the stale time sends nothing.
pub struct SearchFoodsAction<A: NutritionApi> {
    api: A,
    cache: QueryCache,
}

impl<A: NutritionApi + Clone + 'static> SearchFoodsAction<A> {
    pub fn new(api: A, cache: QueryCache) -> Self {
        SearchFoodsAction { api, cache }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "search_foods", skip_all, err)
    )]
    pub async fn execute(&self, query: &str) -> Result<FoodSearchResponse, ClientError> {
        let query = query.trim().to_owned();
        if query.is_empty() {
            return Err(FieldErrors::single("query", ValidationError::Required).into());
        }

        let key = resources::FOOD_SEARCH.key().with(query.clone());
        let options = QueryOptions::new(resources::FOOD_SEARCH.stale_time);
        let api = self.api.clone();

        self.cache
            .fetch(&key, &options, move || {
                let api = api.clone();
                let query = query.clone();
                async move { api.search_foods(&query, endpoints::DEFAULT_SEARCH_LIMIT).await }
            })
            .await
    }
}
