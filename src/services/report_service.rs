use std::sync::Arc;

use crate::{models::domain::ReportRecord, repositories::ReportRepository};

/// Best-effort archive of finished requests. A missing repository means
/// archiving is disabled; write failures are logged and swallowed.
pub struct ReportService {
    repository: Option<Arc<dyn ReportRepository>>,
}

impl ReportService {
    pub fn new(repository: Arc<dyn ReportRepository>) -> Self {
        Self {
            repository: Some(repository),
        }
    }

    pub fn disabled() -> Self {
        Self { repository: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.repository.is_some()
    }

    pub async fn archive(&self, record: ReportRecord) {
        let Some(repository) = &self.repository else {
            return;
        };

        let id = record.id.clone();
        match repository.insert(record).await {
            Ok(()) => log::debug!("Archived report {}", id),
            Err(e) => log::warn!("Failed to archive report {}: {}", id, e),
        }
    }
}
