mod dto;
#[cfg(test)]
pub(crate) mod fake;
mod http;

use async_trait::async_trait;
use bytes::Bytes;

use crate::analysis::{AnalysisResult, IngredientAnalysisRequest};
use crate::error::RemoteFailure;
use crate::images::SelectedImage;
use crate::meal_plan::MealPlan;
use crate::profile::ProfilePayload;

pub use dto::HealthStatus;
pub use http::HttpAnalysisApi;

/// Contract of the remote analysis service.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn analyze_ingredients(
        &self,
        request: &IngredientAnalysisRequest,
    ) -> Result<AnalysisResult, RemoteFailure>;

    async fn analyze_photo(
        &self,
        image: &SelectedImage,
        profile: &ProfilePayload,
    ) -> Result<AnalysisResult, RemoteFailure>;

    async fn generate_meal_plan(&self, profile: &ProfilePayload) -> Result<MealPlan, RemoteFailure>;

    async fn export_pdf(&self, plan: &MealPlan) -> Result<Bytes, RemoteFailure>;

    async fn health(&self) -> Result<HealthStatus, RemoteFailure>;
}
