use std::sync::Arc;

use crate::{
    config::PipelineLimits,
    errors::AppResult,
    models::{
        domain::{PlagiarismVerdict, ReportRecord},
        dto::request::PlagiarismUpload,
    },
    services::{
        model_service::GenerativeModel,
        orchestrator_steps::{
            enrichment::{derive_queries, gather_candidates},
            extraction::extract_text,
            synthesis::analyze_plagiarism,
        },
        report_service::ReportService,
        repository_search_service::CodeRepositorySearch,
        web_search_service::WebSearch,
    },
};

pub struct PlagiarismService {
    model: Arc<dyn GenerativeModel>,
    web: Arc<dyn WebSearch>,
    repositories: Arc<dyn CodeRepositorySearch>,
    reports: Arc<ReportService>,
    limits: PipelineLimits,
}

impl PlagiarismService {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        web: Arc<dyn WebSearch>,
        repositories: Arc<dyn CodeRepositorySearch>,
        reports: Arc<ReportService>,
        limits: PipelineLimits,
    ) -> Self {
        Self {
            model,
            web,
            repositories,
            reports,
            limits,
        }
    }

    /// Extract, enrich, analyze. Only extraction can fail the request.
    pub async fn check(&self, upload: PlagiarismUpload) -> AppResult<PlagiarismVerdict> {
        log::info!("Checking '{}' for plagiarism", upload.document.file_name);

        let text = extract_text(self.model.as_ref(), &upload.document).await?;

        let queries = derive_queries(self.model.as_ref(), &text, &self.limits).await;
        let enrichment = gather_candidates(
            self.web.as_ref(),
            self.repositories.as_ref(),
            &queries,
            &self.limits,
        )
        .await;

        let verdict = analyze_plagiarism(
            self.model.as_ref(),
            &text,
            &enrichment,
            upload.custom_prompt.as_deref(),
            &self.limits,
        )
        .await;

        log::info!(
            "Plagiarism check of '{}' finished: {:.1}% over {} source(s)",
            upload.document.file_name,
            verdict.overall_similarity,
            verdict.sources.len()
        );

        let record = ReportRecord::for_plagiarism(
            &verdict,
            upload.custom_prompt.as_deref(),
            &upload.document,
        );
        self.reports.archive(record).await;

        Ok(verdict)
    }
}
