use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::ReportRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, record: ReportRecord) -> AppResult<()>;
}

pub struct MongoReportRepository {
    collection: Collection<ReportRecord>,
}

impl MongoReportRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!(
            "Creating indexes for {} collection",
            self.collection.name()
        );

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let kind_created_index = IndexModel::builder()
            .keys(doc! { "kind": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("kind_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(kind_created_index).await?;

        log::info!(
            "Successfully created indexes for {} collection",
            self.collection.name()
        );
        Ok(())
    }
}

#[async_trait]
impl ReportRepository for MongoReportRepository {
    async fn insert(&self, record: ReportRecord) -> AppResult<()> {
        self.collection.insert_one(&record).await?;
        Ok(())
    }
}
