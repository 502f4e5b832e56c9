use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::error::AnalysisError;
use crate::models::AnalysisRequest;

pub const FOOD_IMAGE_FIELD: &str = "foodImage";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Pulls the single `foodImage` file out of a multipart body, in memory.
///
/// Other fields are skipped. A `foodImage` part without a filename is a
/// plain form value, not a file, and is skipped too. A part with an empty
/// filename and no bytes is what a browser sends for an empty file input,
/// so it counts as no file.
pub async fn read_food_image(multipart: &mut Multipart) -> Result<AnalysisRequest, AnalysisError> {
    let mut found: Option<AnalysisRequest> = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != FOOD_IMAGE_FIELD {
            log::debug!("Skipping multipart field '{}'", field_name);
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => {
                log::debug!("'{}' sent as a text field, ignoring", FOOD_IMAGE_FIELD);
                continue;
            }
        };

        if found.is_some() {
            return Err(AnalysisError::InvalidUpload {
                status: StatusCode::BAD_REQUEST,
                message: format!("only one '{}' file is accepted", FOOD_IMAGE_FIELD),
            });
        }

        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;

        if bytes.is_empty() && file_name.is_empty() {
            log::debug!("Empty '{}' part without a filename, ignoring", FOOD_IMAGE_FIELD);
            continue;
        }

        log::info!(
            "📸 Received image '{}' ({}, {} bytes)",
            file_name,
            mime_type,
            bytes.len()
        );
        found = Some(AnalysisRequest::new(bytes.to_vec(), mime_type));
    }

    found.ok_or(AnalysisError::NoFile)
}

fn upload_error(err: MultipartError) -> AnalysisError {
    AnalysisError::InvalidUpload {
        status: err.status(),
        message: err.body_text(),
    }
}
