use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AnalysisError, GENERIC_UPSTREAM_MESSAGE};
use crate::models::AnalysisRequest;
use crate::services::ai_service::AIService;
use crate::services::prompt::food_analysis_prompt;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiService {
    api_key: String,
    endpoint: String,
    temperature: f32,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            endpoint: config.generate_content_url(),
            temperature: config.temperature,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, request: &AnalysisRequest) -> GenerateContentRequest {
        let base64_image = general_purpose::STANDARD.encode(&request.image_bytes);

        log::debug!("📊 Image size: {} bytes", request.image_bytes.len());
        log::debug!("🔄 Base64 encoded size: {} bytes", base64_image.len());

        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text {
                        text: food_analysis_prompt().to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type.clone(),
                            data: base64_image,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait::async_trait]
impl AIService for GeminiService {
    async fn analyze_food_image(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let body = self.build_request(request);

        log::info!("🤖 Sending request to Gemini API ({})", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                log::error!("❌ Gemini request failed without a response: {}", e);
                AnalysisError::Unreachable(e)
            })?;

        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Gemini API error response ({}): {}", status, error_text);
            return Err(AnalysisError::UpstreamError {
                status: Some(status.as_u16()),
                message: upstream_error_message(&error_text),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AnalysisError::Unreachable(e.without_url()))?;
        log::debug!("📄 Raw Gemini response size: {} bytes", response_text.len());

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text).map_err(|e| {
            log::error!("❌ Gemini response is not the expected JSON: {} | body: {}", e, response_text);
            AnalysisError::MalformedUpstreamShape
        })?;

        let block_reason = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone());

        match parsed.into_first_text() {
            Some(text) => {
                log::info!("💬 Raw Gemini analysis text: {}", text);
                Ok(text)
            }
            None => {
                log::error!(
                    "❌ Unexpected Gemini response structure (block reason: {}): {}",
                    block_reason.as_deref().unwrap_or("none"),
                    response_text
                );
                Err(AnalysisError::MalformedUpstreamShape)
            }
        }
    }
}

/// `error.message` from a Gemini error body, or a generic message.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string())
}
