use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoReportRepository, ReportRepository},
    services::{
        model_service::{GenerativeModel, OpenAiCompatibleModel},
        pdf_renderer::{LopdfRenderer, PdfRenderer},
        plagiarism_service::PlagiarismService,
        question_paper_service::QuestionPaperService,
        report_service::ReportService,
        repository_search_service::{CodeRepositorySearch, GithubRepositorySearch},
        web_search_service::{SerperWebSearch, WebSearch},
    },
};

/// External collaborators the pipelines are built from.
pub struct Collaborators {
    pub model: Arc<dyn GenerativeModel>,
    pub web: Arc<dyn WebSearch>,
    pub repositories: Arc<dyn CodeRepositorySearch>,
    pub renderer: Arc<dyn PdfRenderer>,
    pub reports: Option<Arc<dyn ReportRepository>>,
}

#[derive(Clone)]
pub struct AppState {
    pub question_paper_service: Arc<QuestionPaperService>,
    pub plagiarism_service: Arc<PlagiarismService>,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = if config.archive_configured() {
            connect_archive(&config).await
        } else {
            None
        };

        let reports = match &db {
            Some(db) => {
                let repository = MongoReportRepository::new(db, &config.reports_collection);
                if let Err(e) = repository.ensure_indexes().await {
                    log::warn!("Could not create report indexes: {}", e);
                }
                Some(Arc::new(repository) as Arc<dyn ReportRepository>)
            }
            None => None,
        };

        let collaborators = Collaborators {
            model: Arc::new(OpenAiCompatibleModel::new(&config)),
            web: Arc::new(SerperWebSearch::new(&config, reqwest::Client::new())),
            repositories: Arc::new(GithubRepositorySearch::new(&config)?),
            renderer: Arc::new(LopdfRenderer::new()),
            reports,
        };

        Ok(Self::from_collaborators(config, collaborators, db))
    }

    pub fn from_collaborators(
        config: Config,
        collaborators: Collaborators,
        db: Option<Database>,
    ) -> Self {
        let reports = Arc::new(match collaborators.reports {
            Some(repository) => ReportService::new(repository),
            None => ReportService::disabled(),
        });

        let question_paper_service = Arc::new(QuestionPaperService::new(
            Arc::clone(&collaborators.model),
            collaborators.renderer,
            Arc::clone(&reports),
        ));
        let plagiarism_service = Arc::new(PlagiarismService::new(
            collaborators.model,
            collaborators.web,
            collaborators.repositories,
            reports,
            config.limits.clone(),
        ));

        Self {
            question_paper_service,
            plagiarism_service,
            db,
            config: Arc::new(config),
        }
    }
}

/// The archive is optional, so a failed connection only disables it.
async fn connect_archive(config: &Config) -> Option<Database> {
    let conn_string = config.mongo_conn_string.as_deref()?;

    match Database::connect(conn_string, &config.mongo_db_name).await {
        Ok(db) => Some(db),
        Err(e) => {
            log::warn!("Report archive unavailable, continuing without it: {}", e);
            None
        }
    }
}
