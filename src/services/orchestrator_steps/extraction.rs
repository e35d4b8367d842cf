use crate::{
    constants::prompts::TEXT_EXTRACTION_PROMPT,
    errors::{AppError, AppResult},
    models::domain::UploadedDocument,
    services::model_service::{GenerationRequest, GenerativeModel},
};

/// Asks the model for the plain text of `document`. Empty output is fatal.
pub async fn extract_text(
    model: &dyn GenerativeModel,
    document: &UploadedDocument,
) -> AppResult<String> {
    let request = GenerationRequest::new()
        .with_document(document)
        .with_text(TEXT_EXTRACTION_PROMPT);

    let text = model.generate(request).await.map_err(|e| {
        log::error!("Text extraction call failed for '{}': {}", document.file_name, e);
        AppError::ExtractionFailed(format!("Failed to extract text from PDF: {}", e))
    })?;

    if text.trim().is_empty() {
        log::error!("Model returned no text for '{}'", document.file_name);
        return Err(AppError::ExtractionFailed(
            "Failed to extract text from PDF.".to_string(),
        ));
    }

    log::info!(
        "Extracted {} characters from '{}'",
        text.chars().count(),
        document.file_name
    );
    Ok(text)
}
