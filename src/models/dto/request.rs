use validator::Validate;

use crate::models::domain::UploadedDocument;

pub const MAX_CUSTOM_PROMPT_CHARS: u64 = 4000;

/// Free-text instruction submitted next to the files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CustomPrompt {
    #[validate(length(max = MAX_CUSTOM_PROMPT_CHARS))]
    pub text: Option<String>,
}

impl CustomPrompt {
    pub fn new(text: Option<String>) -> Self {
        CustomPrompt {
            text: text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct QuestionPaperUpload {
    pub pyq: UploadedDocument,
    pub syllabus: UploadedDocument,
    pub custom_prompt: CustomPrompt,
}

impl QuestionPaperUpload {
    pub fn file_names(&self) -> Vec<&str> {
        vec![self.pyq.file_name.as_str(), self.syllabus.file_name.as_str()]
    }
}

#[derive(Debug, Clone)]
pub struct PlagiarismUpload {
    pub document: UploadedDocument,
    pub custom_prompt: CustomPrompt,
}
