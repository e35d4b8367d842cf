use serde::{Deserialize, Serialize};

pub const DEFAULT_PAPER_TITLE: &str = "Question Paper";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionPaper {
    pub title: String,
    pub body: String,
}

impl QuestionPaper {
    pub fn new(title: &str, body: &str) -> Self {
        QuestionPaper {
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    /// Attachment name derived from the title, e.g. `physics_question_paper.pdf`.
    pub fn file_name(&self) -> String {
        let slug = self
            .title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect::<String>()
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        if slug.is_empty() {
            "question_paper.pdf".to_string()
        } else if slug.ends_with("question_paper") {
            format!("{}.pdf", slug)
        } else {
            format!("{}_question_paper.pdf", slug)
        }
    }
}
