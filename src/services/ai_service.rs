use crate::error::AnalysisError;
use crate::models::AnalysisRequest;

/// Trait for AI services that can describe a food photo.
///
/// Implementations return the model's raw analysis text; turning it into
/// JSON is the caller's job.
#[async_trait::async_trait]
pub trait AIService: Send + Sync {
    async fn analyze_food_image(&self, request: &AnalysisRequest) -> Result<String, AnalysisError>;
}
