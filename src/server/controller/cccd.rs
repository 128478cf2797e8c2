use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use dioxus_logger::tracing;

use crate::{
    model::{api::ErrorDto, cccd::CccdExtractResponseDto},
    server::{
        error::{ocr::OcrError, AppError},
        service::cccd::CccdService,
        state::AppState,
    },
};

/// Tag for grouping CCCD endpoints in OpenAPI documentation
pub static CCCD_TAG: &str = "cccd";

/// Multipart field carrying the card image.
const IMAGE_FIELD: &str = "cccdImage";

/// Upload size limit for the card image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit: one full-size image plus multipart framing and other fields.
pub const MAX_UPLOAD_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Read the fields of a CCCD card image for the registration form.
///
/// The image is forwarded to the OCR provider and discarded; nothing is stored.
///
/// # Access Control
/// - Public
///
/// # Arguments
/// - `state` - Application state containing the HTTP client and config
/// - `multipart` - Upload with a `cccdImage` file part (at most 10 MB)
///
/// # Returns
/// - `200 OK` - Extracted fields and whether the number is already registered
/// - `400 Bad Request` - No image uploaded, or the image is larger than 10 MB
/// - `500 Internal Server Error` - Extraction failed
#[utoipa::path(
    post,
    path = "/api/cccd/register",
    tag = CCCD_TAG,
    request_body(content_type = "multipart/form-data", description = "`cccdImage` file part"),
    responses(
        (status = 200, description = "Extracted card fields", body = CccdExtractResponseDto),
        (status = 400, description = "No image uploaded or image too large", body = ErrorDto),
        (status = 500, description = "Extraction failed", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut image = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            image = Some((filename, bytes));
            break;
        }
    }

    let Some((filename, bytes)) = image.filter(|(_, bytes)| !bytes.is_empty()) else {
        return Err(OcrError::MissingImage.into());
    };

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(OcrError::ImageTooLarge.into());
    }

    tracing::debug!("Extracting CCCD from {} ({} bytes)", filename, bytes.len());

    let (extracted, exists) = CccdService::new(&state.db, &state.http_client, &state.config)
        .extract(&filename, &bytes)
        .await?;

    Ok(Json(CccdExtractResponseDto {
        success: true,
        extracted,
        exists,
    }))
}
