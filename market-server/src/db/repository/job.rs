//! Job Repository
//!
//! Same conditional-update discipline as orders. The two moves that write
//! price fields (quote, complete) fold the price into the guarded statement
//! so a quote can never land on a job that left REQUESTED.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Job;
use shared::models::JobStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "service_job";

#[derive(Clone)]
pub struct JobRepository {
    base: BaseRepository,
}

impl JobRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(id, TABLE)
    }

    pub async fn create(&self, job: Job) -> RepoResult<Job> {
        let created: Option<Job> = self.base.db().create(TABLE).content(job).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create job".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Job>> {
        let thing = Self::parse_id(id)?;
        let job: Option<Job> = self.base.db().select(thing).await?;
        Ok(job)
    }

    pub async fn list_for_buyer(&self, buyer: &str) -> RepoResult<Vec<Job>> {
        let jobs: Vec<Job> = self
            .base
            .db()
            .query("SELECT * FROM service_job WHERE buyer = $buyer ORDER BY created_at DESC")
            .bind(("buyer", buyer.to_string()))
            .await?
            .take(0)?;
        Ok(jobs)
    }

    pub async fn list_for_seller(&self, seller: &str) -> RepoResult<Vec<Job>> {
        let jobs: Vec<Job> = self
            .base
            .db()
            .query("SELECT * FROM service_job WHERE seller = $seller ORDER BY created_at DESC")
            .bind(("seller", seller.to_string()))
            .await?
            .take(0)?;
        Ok(jobs)
    }

    /// Move a job from `from` to `to` if and only if it still sits at `from`
    pub async fn transition(
        &self,
        id: &RecordId,
        from: JobStatus,
        to: JobStatus,
        now: i64,
    ) -> RepoResult<Option<Job>> {
        let query = match to.timestamp_field() {
            Some(field) => format!(
                "UPDATE $id SET status = $to, updated_at = $now, {field} = $now \
                 WHERE status = $from RETURN AFTER"
            ),
            None => "UPDATE $id SET status = $to, updated_at = $now \
                     WHERE status = $from RETURN AFTER"
                .to_string(),
        };
        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("id", id.clone()))
            .bind(("to", to))
            .bind(("from", from))
            .bind(("now", now))
            .await?;
        let jobs: Vec<Job> = result.take(0)?;
        Ok(jobs.into_iter().next())
    }

    /// REQUESTED -> QUOTED with the quote folded into the guard
    pub async fn quote(&self, id: &RecordId, price: f64, now: i64) -> RepoResult<Option<Job>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $to, quoted_price = $price, quoted_at = $now, \
                 updated_at = $now WHERE status = $from RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("to", JobStatus::Quoted))
            .bind(("from", JobStatus::Requested))
            .bind(("price", price))
            .bind(("now", now))
            .await?;
        let jobs: Vec<Job> = result.take(0)?;
        Ok(jobs.into_iter().next())
    }

    /// ONGOING -> COMPLETED, writing the final price and commission
    pub async fn complete(
        &self,
        id: &RecordId,
        final_price: f64,
        commission: f64,
        now: i64,
    ) -> RepoResult<Option<Job>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $to, final_price = $price, commission = $commission, \
                 completed_at = $now, updated_at = $now WHERE status = $from RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("to", JobStatus::Completed))
            .bind(("from", JobStatus::Ongoing))
            .bind(("price", final_price))
            .bind(("commission", commission))
            .bind(("now", now))
            .await?;
        let jobs: Vec<Job> = result.take(0)?;
        Ok(jobs.into_iter().next())
    }

    /// Mark a completed job as settled, once
    pub async fn settle(&self, id: &RecordId, now: i64) -> RepoResult<Option<Job>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET settled = true, settled_at = $now, updated_at = $now \
                 WHERE status = $status AND settled = false RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("status", JobStatus::Completed))
            .bind(("now", now))
            .await?;
        let jobs: Vec<Job> = result.take(0)?;
        Ok(jobs.into_iter().next())
    }

    /// Completed jobs of one seller, for the earnings scan
    pub async fn find_completed_for_seller(&self, seller: &str) -> RepoResult<Vec<Job>> {
        let jobs: Vec<Job> = self
            .base
            .db()
            .query("SELECT * FROM service_job WHERE seller = $seller AND status = $status")
            .bind(("seller", seller.to_string()))
            .bind(("status", JobStatus::Completed))
            .await?
            .take(0)?;
        Ok(jobs)
    }
}
