//! Repository Module
//!
//! Storage access for the marketplace tables. Every multi-step invariant
//! (add-or-increment, guarded transitions, the withdrawal balance check)
//! is pushed into a single SurrealDB statement or transaction so the server
//! never needs an in-process lock around storage.

pub mod cart;
pub mod catalog;
pub mod job;
pub mod order;
pub mod withdrawal;

pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use job::JobRepository;
pub use order::OrderRepository;
pub use withdrawal::WithdrawalRepository;

use shared::error::ApiError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage engine unreachable; the caller may retry
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        match err {
            surrealdb::Error::Api(surrealdb::error::Api::ConnectionUninitialised) => {
                RepoError::Unavailable("Database connection not initialised".to_string())
            }
            other => RepoError::Database(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => ApiError::not_found(msg),
            RepoError::Duplicate(msg) => ApiError::conflict(msg),
            RepoError::Database(msg) => ApiError::database(msg),
            RepoError::Validation(msg) => ApiError::validation(msg),
            RepoError::Unavailable(msg) => ApiError::store_unavailable(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings everywhere outside storage
// =============================================================================
//
// surrealdb::RecordId handles all IDs:
//   - parse:       let id: RecordId = "customer_order:abc".parse()?;
//   - construct:   let id = RecordId::from_table_key("cart_line", key);
//   - table name:  id.table()
//   - bare key:    id.key().to_string()
//   - CRUD:        db.select(id) / db.delete(id) take RecordId directly

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an API-supplied `table:id` string, enforcing the expected table
pub(crate) fn parse_record_id(id: &str, table: &str) -> RepoResult<surrealdb::RecordId> {
    let record: surrealdb::RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
    if record.table() != table {
        return Err(RepoError::Validation(format!(
            "Invalid ID: expected a {} record, got {}",
            table, id
        )));
    }
    Ok(record)
}
