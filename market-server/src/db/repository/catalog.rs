//! Catalog Repository
//!
//! Read side of the catalog collaborator. Writes exist for seeding demo
//! data and tests; item authoring is not part of this server.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::CatalogItem;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "catalog_item";

#[derive(Clone)]
pub struct CatalogRepository {
    base: BaseRepository,
}

impl CatalogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find an item by bare record key
    pub async fn find_by_key(&self, key: &str) -> RepoResult<Option<CatalogItem>> {
        let item: Option<CatalogItem> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, key))
            .await?;
        Ok(item)
    }

    /// Create an item, honouring a caller-chosen record key when set
    pub async fn create(&self, mut item: CatalogItem) -> RepoResult<CatalogItem> {
        let target = item.id.take();
        let created: Option<CatalogItem> = match target {
            Some(id) => self.base.db().create(id).content(item).await?,
            None => self.base.db().create(TABLE).content(item).await?,
        };
        created.ok_or_else(|| RepoError::Database("Failed to create catalog item".to_string()))
    }
}
