use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorBody;

pub const GENERIC_UPSTREAM_MESSAGE: &str = "Unknown error from Gemini API";

/// Every way a `/analyze-food` request can fail. All of them end the request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No image uploaded.")]
    NoFile,

    #[error("Invalid upload: {message}")]
    InvalidUpload { status: StatusCode, message: String },

    #[error("No response received from the Gemini service.")]
    Unreachable(#[source] reqwest::Error),

    #[error("Gemini API error: {message}")]
    UpstreamError { status: Option<u16>, message: String },

    #[error("Unexpected response structure from the Gemini API.")]
    MalformedUpstreamShape,

    #[error("The Gemini response did not contain a recognizable or parseable JSON object.")]
    ExtractionFailure { raw: String },
}

impl AnalysisError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::NoFile => StatusCode::BAD_REQUEST,
            AnalysisError::InvalidUpload { status, .. } => *status,
            AnalysisError::UpstreamError { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AnalysisError::Unreachable(_)
            | AnalysisError::MalformedUpstreamShape
            | AnalysisError::ExtractionFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AnalysisError::ExtractionFailure { raw } => Some(raw),
            _ => None,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::error!("❌ Responding {} to /analyze-food: {}", status, self);

        let body = ErrorBody {
            error: self.to_string(),
            raw_response: self.raw_response().map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}

/// Problems with the process environment found at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}
