use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResult, ExtractionOutcome};
use crate::services::{extract_analysis, AIService};

/// Sends one photo upstream and turns the reply into a JSON object.
pub struct AnalysisHandler {
    ai: Arc<dyn AIService>,
}

impl AnalysisHandler {
    pub fn new(ai: Arc<dyn AIService>) -> Self {
        Self { ai }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<Map<String, Value>, AnalysisError> {
        log::info!(
            "🍽️ Analyzing food image ({}, {} bytes)",
            request.mime_type,
            request.image_bytes.len()
        );

        let text = self.ai.analyze_food_image(&request).await?;

        match extract_analysis(&text) {
            ExtractionOutcome::Parsed { analysis, stage } => {
                match AnalysisResult::from_map(&analysis) {
                    Some(result) => log::info!("✅ Analysis ({}): {}", stage, result.summary()),
                    None => log::warn!(
                        "⚠️ Analysis object does not match the requested fields, returning it as-is"
                    ),
                }
                Ok(analysis)
            }
            ExtractionOutcome::Failed { raw } => Err(AnalysisError::ExtractionFailure { raw }),
        }
    }
}
