use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::upload::read_multipart,
    middleware::get_request_id,
    models::dto::request::QuestionPaperUpload,
    services::http_helpers::pdf_attachment,
};

pub const PYQ_FIELD: &str = "pyq";
pub const SYLLABUS_FIELD: &str = "syllabus";

#[post("/api/generate-question-paper")]
async fn generate_question_paper(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();

    let mut parsed = read_multipart(
        payload,
        &[PYQ_FIELD, SYLLABUS_FIELD],
        state.config.limits.max_upload_bytes,
    )
    .await?;

    let (Some(pyq), Some(syllabus)) = (parsed.take_file(PYQ_FIELD), parsed.take_file(SYLLABUS_FIELD))
    else {
        return Err(AppError::InvalidInput(
            "Two PDFs (PYQ & Syllabus) are required.".to_string(),
        ));
    };

    log::info!("[{}] Question paper request accepted", request_id);

    let generated = state
        .question_paper_service
        .generate(QuestionPaperUpload {
            pyq,
            syllabus,
            custom_prompt: parsed.custom_prompt,
        })
        .await?;

    Ok(pdf_attachment(generated.pdf, &generated.paper.file_name()))
}
