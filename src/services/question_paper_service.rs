use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{QuestionPaper, ReportRecord},
        dto::request::QuestionPaperUpload,
    },
    services::{
        model_service::GenerativeModel,
        orchestrator_steps::synthesis::{generate_paper_title, generate_question_paper_body},
        pdf_renderer::PdfRenderer,
        report_service::ReportService,
    },
};

pub struct GeneratedPaper {
    pub paper: QuestionPaper,
    pub pdf: Vec<u8>,
}

pub struct QuestionPaperService {
    model: Arc<dyn GenerativeModel>,
    renderer: Arc<dyn PdfRenderer>,
    reports: Arc<ReportService>,
}

impl QuestionPaperService {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        renderer: Arc<dyn PdfRenderer>,
        reports: Arc<ReportService>,
    ) -> Self {
        Self {
            model,
            renderer,
            reports,
        }
    }

    pub async fn generate(&self, upload: QuestionPaperUpload) -> AppResult<GeneratedPaper> {
        log::info!(
            "Generating question paper from '{}' and '{}'",
            upload.pyq.file_name,
            upload.syllabus.file_name
        );

        let body = generate_question_paper_body(self.model.as_ref(), &upload).await?;
        let title = generate_paper_title(self.model.as_ref(), &upload.file_names()).await;
        let paper = QuestionPaper::new(&title, &body);

        let pdf = self.render(paper.clone()).await?;
        log::info!("Rendered '{}' ({} bytes)", paper.title, pdf.len());

        let record = ReportRecord::for_question_paper(
            &paper,
            upload.custom_prompt.as_deref(),
            &[&upload.pyq, &upload.syllabus],
        );
        self.reports.archive(record).await;

        Ok(GeneratedPaper { paper, pdf })
    }

    async fn render(&self, paper: QuestionPaper) -> AppResult<Vec<u8>> {
        let renderer = Arc::clone(&self.renderer);

        tokio::task::spawn_blocking(move || renderer.render(&paper))
            .await
            .map_err(|e| AppError::InternalError(format!("Rendering task failed: {}", e)))?
            .map_err(|e| {
                log::error!("PDF rendering failed: {}", e);
                e
            })
    }
}
