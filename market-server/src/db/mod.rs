//! Database Module
//!
//! Embedded SurrealDB storage. Production runs RocksDB under the work
//! directory; `:memory:` (and tests) run the in-memory engine. Both yield
//! the same `Surreal<Db>` handle, so repositories never know the difference.

pub mod models;
pub mod repository;

use shared::{ApiError, ApiResult};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "market";
const DATABASE: &str = "main";

/// Idempotent schema bootstrap
///
/// Tables stay schemaless; the indexes back the hot lookups (buyer carts,
/// seller order books, outstanding withdrawals).
const SCHEMA: &str = "
DEFINE TABLE IF NOT EXISTS cart_line SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_cart_line_buyer ON TABLE cart_line FIELDS buyer;
DEFINE INDEX IF NOT EXISTS idx_cart_line_buyer_seller ON TABLE cart_line FIELDS buyer, seller;

DEFINE TABLE IF NOT EXISTS catalog_item SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_catalog_item_seller ON TABLE catalog_item FIELDS seller;

DEFINE TABLE IF NOT EXISTS customer_order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_customer_order_buyer ON TABLE customer_order FIELDS buyer;
DEFINE INDEX IF NOT EXISTS idx_customer_order_seller ON TABLE customer_order FIELDS seller;
DEFINE INDEX IF NOT EXISTS idx_customer_order_seller_status ON TABLE customer_order FIELDS seller, status;

DEFINE TABLE IF NOT EXISTS service_job SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_service_job_buyer ON TABLE service_job FIELDS buyer;
DEFINE INDEX IF NOT EXISTS idx_service_job_seller ON TABLE service_job FIELDS seller;
DEFINE INDEX IF NOT EXISTS idx_service_job_seller_status ON TABLE service_job FIELDS seller, status;

DEFINE TABLE IF NOT EXISTS withdrawal_request SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_withdrawal_seller_status ON TABLE withdrawal_request FIELDS seller, status;
";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database under the work directory
    ///
    /// `work_dir = ":memory:"` selects the in-memory engine.
    pub async fn new(work_dir: &str) -> ApiResult<Self> {
        if work_dir == ":memory:" {
            return Self::memory().await;
        }

        let path = format!("{}/database", work_dir);
        let db = Surreal::new::<RocksDb>(path.as_str())
            .await
            .map_err(|e| ApiError::store_unavailable(format!("Failed to open database: {e}")))?;

        Self::prepare(db).await
    }

    /// In-memory database, used by `:memory:` mode and tests
    pub async fn memory() -> ApiResult<Self> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| ApiError::store_unavailable(format!("Failed to open database: {e}")))?;

        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> ApiResult<Self> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| ApiError::store_unavailable(format!("Failed to select database: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| ApiError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| ApiError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database ready (namespace={}, database={})", NAMESPACE, DATABASE);

        Ok(Self { db })
    }
}
