pub mod candidate_source;
pub mod question_paper;
pub mod report;
pub mod upload;
pub mod verdict;
pub use candidate_source::{CandidateSource, RepositoryHit, SourceOrigin, WebSearchHit};
pub use question_paper::QuestionPaper;
pub use report::{ReportKind, ReportRecord};
pub use upload::UploadedDocument;
pub use verdict::{MatchedSource, PlagiarismVerdict};
