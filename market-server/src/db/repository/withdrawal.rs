//! Withdrawal Repository
//!
//! The balance guard and the insert run inside one database transaction:
//! the outstanding sum cannot drift between the check and the new row, so
//! two concurrent requests can never jointly overdraw a seller.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::WithdrawalRequest;
use shared::models::{BankDetails, WithdrawalStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "withdrawal_request";

#[derive(Clone)]
pub struct WithdrawalRepository {
    base: BaseRepository,
}

impl WithdrawalRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(id, TABLE)
    }

    /// Insert a request if the seller's withdrawable balance covers it
    ///
    /// `available` is the settled net balance computed by the caller. The
    /// transaction re-sums outstanding requests and inserts in one step;
    /// `None` means the guard failed and nothing was written.
    pub async fn create_checked(
        &self,
        seller: &str,
        amount: f64,
        bank: BankDetails,
        available: f64,
        now: i64,
    ) -> RepoResult<Option<WithdrawalRequest>> {
        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $outstanding = math::sum(( \
                     SELECT VALUE amount FROM withdrawal_request \
                     WHERE seller = $seller AND status IN ['PENDING', 'PROCESSING'] \
                 )); \
                 LET $created = IF $amount > $available - $outstanding { \
                     NONE \
                 } ELSE { \
                     (CREATE ONLY withdrawal_request CONTENT { \
                         seller: $seller, \
                         amount: $amount, \
                         bank: $bank, \
                         status: 'PENDING', \
                         created_at: $now, \
                         updated_at: $now \
                     }) \
                 }; \
                 RETURN $created; \
                 COMMIT TRANSACTION;",
            )
            .bind(("seller", seller.to_string()))
            .bind(("amount", amount))
            .bind(("bank", bank))
            .bind(("available", available))
            .bind(("now", now))
            .await?;
        let created: Option<WithdrawalRequest> = result.take(0)?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<WithdrawalRequest>> {
        let thing = Self::parse_id(id)?;
        let request: Option<WithdrawalRequest> = self.base.db().select(thing).await?;
        Ok(request)
    }

    pub async fn list_for_seller(&self, seller: &str) -> RepoResult<Vec<WithdrawalRequest>> {
        let requests: Vec<WithdrawalRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM withdrawal_request WHERE seller = $seller \
                 ORDER BY created_at DESC",
            )
            .bind(("seller", seller.to_string()))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Review queue: requests not yet in a terminal status, oldest first
    pub async fn list_outstanding(&self) -> RepoResult<Vec<WithdrawalRequest>> {
        let requests: Vec<WithdrawalRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM withdrawal_request \
                 WHERE status IN ['PENDING', 'PROCESSING'] \
                 ORDER BY created_at ASC",
            )
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Sum of requests still counting against the seller's balance
    pub async fn outstanding_total(&self, seller: &str) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "RETURN math::sum(( \
                     SELECT VALUE amount FROM withdrawal_request \
                     WHERE seller = $seller AND status IN ['PENDING', 'PROCESSING'] \
                 ));",
            )
            .bind(("seller", seller.to_string()))
            .await?;
        let total: Option<f64> = result.take(0)?;
        Ok(total.unwrap_or(0.0))
    }

    /// Move a request from `from` to `to` if and only if it still sits at `from`
    ///
    /// An incoming note replaces the stored one only when present.
    pub async fn advance(
        &self,
        id: &RecordId,
        from: WithdrawalStatus,
        to: WithdrawalStatus,
        note: Option<String>,
        now: i64,
    ) -> RepoResult<Option<WithdrawalRequest>> {
        let query = match to.timestamp_field() {
            Some(field) => format!(
                "UPDATE $id SET status = $to, note = $note OR note, updated_at = $now, \
                 {field} = $now WHERE status = $from RETURN AFTER"
            ),
            None => "UPDATE $id SET status = $to, note = $note OR note, updated_at = $now \
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
            .bind(("note", note))
            .bind(("now", now))
            .await?;
        let requests: Vec<WithdrawalRequest> = result.take(0)?;
        Ok(requests.into_iter().next())
    }
}
