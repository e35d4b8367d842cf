use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{upload::validate_pdf_mime, UploadedDocument},
        dto::request::CustomPrompt,
    },
};

pub const CUSTOM_PROMPT_FIELD: &str = "customPrompt";

// Text fields are small; anything bigger is not a prompt.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// File parts keyed by field name, plus the optional custom prompt.
#[derive(Debug, Default)]
pub struct ParsedUpload {
    files: HashMap<String, UploadedDocument>,
    pub custom_prompt: CustomPrompt,
}

impl ParsedUpload {
    pub fn take_file(&mut self, field_name: &str) -> Option<UploadedDocument> {
        self.files.remove(field_name)
    }
}

async fn read_limited(field: &mut Field, limit: usize, label: &str) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::InvalidInput(format!(
                "'{}' exceeds the maximum upload size of {} bytes",
                label, limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

/// Reads every part of `payload`. Only the names in `file_fields` may carry
/// files, each at most once; each file must be a non-empty PDF no larger than
/// `max_file_bytes`. Missing files are left for the caller to report.
pub async fn read_multipart(
    mut payload: Multipart,
    file_fields: &[&str],
    max_file_bytes: usize,
) -> AppResult<ParsedUpload> {
    let mut upload = ParsedUpload::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let Some(file_name) = file_name else {
            if name == CUSTOM_PROMPT_FIELD {
                let raw = read_limited(&mut field, MAX_TEXT_FIELD_BYTES, &name).await?;
                let text = String::from_utf8(raw).map_err(|_| {
                    AppError::InvalidInput("customPrompt must be valid UTF-8".to_string())
                })?;
                upload.custom_prompt = CustomPrompt::new(Some(text));
            } else {
                log::debug!("Ignoring unknown form field '{}'", name);
                read_limited(&mut field, MAX_TEXT_FIELD_BYTES, &name).await?;
            }
            continue;
        };

        if !file_fields.contains(&name.as_str()) {
            return Err(AppError::InvalidInput(format!(
                "Unexpected file field '{}'; expected {}",
                name,
                file_fields.join(", ")
            )));
        }
        if upload.files.contains_key(&name) {
            return Err(AppError::InvalidInput(format!(
                "File field '{}' was sent more than once",
                name
            )));
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        if validate_pdf_mime(&content_type).is_err() {
            return Err(AppError::InvalidInput(format!(
                "'{}' must be a PDF document",
                file_name
            )));
        }

        let bytes = read_limited(&mut field, max_file_bytes, &file_name).await?;
        let document = UploadedDocument::new(&name, &file_name, &content_type, bytes);
        document.validate()?;

        log::debug!(
            "Received '{}' as '{}' ({} bytes)",
            document.file_name,
            name,
            document.size()
        );
        upload.files.insert(name, document);
    }

    upload.custom_prompt.validate()?;
    Ok(upload)
}
