use crate::api::{endpoints, AnalyzeImageRequest, AnalyzeImageResponse, NutritionApi};
use crate::query::{resources, QueryCache};
use crate::validators::{FieldErrors, ValidationError};
use crate::ClientError;

/// Sends a photo for food recognition. The new scan shows up in
/// `scannedFoods` on its next read.
pub struct AnalyzeImageAction<A: NutritionApi> {
    api: A,
    cache: QueryCache,
}

impl<A: NutritionApi> AnalyzeImageAction<A> {
    pub fn new(api: A, cache: QueryCache) -> Self {
        AnalyzeImageAction { api, cache }
    }

    /// `image_data` is base64 without a data-URL prefix; `image_format`
    /// defaults to `jpeg`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "analyze_image", skip_all, err)
    )]
    pub async fn execute(
        &self,
        image_data: &str,
        image_format: Option<&str>,
    ) -> Result<AnalyzeImageResponse, ClientError> {
        if image_data.trim().is_empty() {
            return Err(FieldErrors::single("image_data", ValidationError::Required).into());
        }

        let request = AnalyzeImageRequest {
            image_data: image_data.to_owned(),
            image_format: image_format
                .unwrap_or(endpoints::DEFAULT_IMAGE_FORMAT)
                .to_owned(),
        };
        let response = self.api.analyze_image(&request).await?;

        self.cache.invalidate(&resources::SCANNED_FOODS.key());

        log::info!(
            target: "nutritrack",
            "msg=\"image analyzed\" identified={}",
            response.scanned_food.is_some()
        );

        Ok(response)
    }
}
