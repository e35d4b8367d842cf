use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{PlagiarismVerdict, QuestionPaper, UploadedDocument};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    QuestionPaper,
    Plagiarism,
}

/// Summary of one finished request, archived when persistence is enabled.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ReportRecord {
    pub id: String,
    pub kind: ReportKind,
    pub title: String,
    pub goal: Option<String>,
    pub participants: Vec<String>,
    pub document_sha256: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_similarity: Option<f64>,
    pub sources_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReportRecord {
    fn new(kind: ReportKind, title: &str, goal: Option<&str>, documents: &[&UploadedDocument]) -> Self {
        ReportRecord {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: title.to_string(),
            goal: goal.map(str::to_string),
            participants: documents.iter().map(|d| d.file_name.clone()).collect(),
            document_sha256: documents.iter().map(|d| d.sha256_hex()).collect(),
            overall_similarity: None,
            sources_found: 0,
            created_at: Some(Utc::now()),
        }
    }

    pub fn for_question_paper(
        paper: &QuestionPaper,
        goal: Option<&str>,
        documents: &[&UploadedDocument],
    ) -> Self {
        Self::new(ReportKind::QuestionPaper, &paper.title, goal, documents)
    }

    pub fn for_plagiarism(
        verdict: &PlagiarismVerdict,
        goal: Option<&str>,
        document: &UploadedDocument,
    ) -> Self {
        let mut record = Self::new(ReportKind::Plagiarism, &document.file_name, goal, &[document]);
        record.overall_similarity = Some(verdict.overall_similarity);
        record.sources_found = verdict.sources.len();
        record
    }
}
