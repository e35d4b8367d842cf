use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    HttpResponse,
};

use crate::models::domain::upload::PDF_MIME_TYPE;

/// Creates a success JSON response
pub fn success_json<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

/// Streams `bytes` back as a downloadable PDF named `file_name`.
pub fn pdf_attachment(bytes: Vec<u8>, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(PDF_MIME_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name.to_string())],
        })
        .body(bytes)
}
