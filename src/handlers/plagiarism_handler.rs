use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::upload::read_multipart,
    middleware::get_request_id,
    models::dto::request::PlagiarismUpload,
    services::http_helpers::success_json,
};

pub const DOCUMENT_FIELD: &str = "document";

#[post("/api/check-plagiarism")]
async fn check_plagiarism(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();

    let mut parsed = read_multipart(
        payload,
        &[DOCUMENT_FIELD],
        state.config.limits.max_upload_bytes,
    )
    .await?;

    let document = parsed
        .take_file(DOCUMENT_FIELD)
        .ok_or_else(|| AppError::InvalidInput("PDF document is required.".to_string()))?;

    log::info!("[{}] Plagiarism check accepted for '{}'", request_id, document.file_name);

    let verdict = state
        .plagiarism_service
        .check(PlagiarismUpload {
            document,
            custom_prompt: parsed.custom_prompt,
        })
        .await?;

    Ok(success_json(verdict))
}
