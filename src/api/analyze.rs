//! Fishing-spot image analysis endpoints

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use tracing::info;

use super::state::AppState;
use super::types::{AnalyzeResponse, ApiError, Json};
use crate::domain::vision::{
    validate_content_type, validate_size, ImagePayload, UploadValidationError,
};
use crate::infrastructure::vision::AnalysisOutcome;

const FILE_FIELD: &str = "file";

/// `POST /analyze-smart`: primary when quota allows, otherwise fallback
pub async fn analyze_smart(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image = read_image_upload(multipart, state.max_upload_bytes).await?;
    let outcome = state.router.analyze_smart(&image).await;

    Ok(respond("smart", &image, outcome))
}

/// `POST /analyze-gemini`: primary only, subject to quota
pub async fn analyze_primary(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image = read_image_upload(multipart, state.max_upload_bytes).await?;
    let outcome = state.router.analyze_primary(&image).await;

    Ok(respond("primary", &image, outcome))
}

/// `POST /analyze-hf`: secondary only
pub async fn analyze_secondary(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image = read_image_upload(multipart, state.max_upload_bytes).await?;
    let outcome = state.router.analyze_secondary(&image).await;

    Ok(respond("secondary", &image, outcome))
}

fn respond(route: &str, image: &ImagePayload, outcome: AnalysisOutcome) -> Json<AnalyzeResponse> {
    info!(
        route,
        provider = %outcome.provider,
        success = outcome.is_success(),
        fallback = outcome.notice.is_some(),
        bytes = image.len(),
        "Image analyzed"
    );

    Json(AnalyzeResponse::from_outcome(
        outcome,
        image.filename().map(str::to_string),
    ))
}

/// Read and validate the uploaded image.
///
/// Uses the `file` field, or the first field carrying a file name.
async fn read_image_upload(
    multipart: Result<Multipart, MultipartRejection>,
    max_bytes: usize,
) -> Result<ImagePayload, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        ApiError::bad_request(rejection.body_text()).with_code("invalid_multipart")
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if is_image_field(&field) {
            return read_field(field, max_bytes).await;
        }
    }

    Err(UploadValidationError::MissingFile.into())
}

fn is_image_field(field: &Field<'_>) -> bool {
    field.name() == Some(FILE_FIELD) || field.file_name().is_some()
}

async fn read_field(field: Field<'_>, max_bytes: usize) -> Result<ImagePayload, ApiError> {
    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    validate_content_type(content_type.as_deref())?;

    let bytes = field.bytes().await.map_err(multipart_error)?;
    validate_size(bytes.len(), max_bytes)?;

    let mut image = ImagePayload::new(bytes, content_type.unwrap_or_default());
    if let Some(filename) = filename {
        image = image.with_filename(filename);
    }

    Ok(image)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(err.body_text())
    } else {
        ApiError::bad_request(err.body_text()).with_code("invalid_multipart")
    }
}
