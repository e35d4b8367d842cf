use sha2::{Digest, Sha256};
use validator::{Validate, ValidationError};

pub const PDF_MIME_TYPE: &str = "application/pdf";

pub fn validate_pdf_mime(content_type: &str) -> Result<(), ValidationError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();

    if essence.eq_ignore_ascii_case(PDF_MIME_TYPE) {
        Ok(())
    } else {
        let mut err = ValidationError::new("pdf_mime");
        err.message = Some(format!("expected {}, got '{}'", PDF_MIME_TYPE, content_type).into());
        Err(err)
    }
}

/// A file part received in an upload, fully buffered.
#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct UploadedDocument {
    pub field_name: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(custom(function = "validate_pdf_mime"))]
    pub content_type: String,
    #[validate(length(min = 1))]
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(field_name: &str, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        UploadedDocument {
            field_name: field_name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Hex SHA-256 of the raw bytes, used to key archived reports.
    pub fn sha256_hex(&self) -> String {
        format!("{:x}", Sha256::digest(&self.bytes))
    }
}
