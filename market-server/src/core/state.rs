use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::cart::GuestCartStore;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{AutoApprovePayments, PaymentGateway};

/// Server state - shared handles for every service
///
/// Cloning is shallow: the database handle and the Arc-wrapped services are
/// reference-counted, so handlers receive cheap copies.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | db | Surreal<Db> | Embedded database |
/// | guest_carts | Arc<GuestCartStore> | Device-local cart backend |
/// | payments | Arc<dyn PaymentGateway> | Payment collaborator seam |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Device-local carts, lost on restart by design
    pub guest_carts: Arc<GuestCartStore>,
    /// Payment collaborator
    pub payments: Arc<dyn PaymentGateway>,
}

impl ServerState {
    /// Create server state from already-built parts
    ///
    /// Most callers want [`ServerState::initialize`] instead
    pub fn new(config: Config, db: Surreal<Db>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            config,
            db,
            guest_carts: Arc::new(GuestCartStore::new()),
            payments,
        }
    }

    /// Initialize all services from configuration
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db_service = DbService::new(&config.work_dir).await?;

        tracing::info!(
            work_dir = %config.work_dir,
            environment = %config.environment,
            "Server state initialized"
        );

        Ok(Self::new(
            config.clone(),
            db_service.db,
            Arc::new(AutoApprovePayments::new()),
        ))
    }

    /// In-memory state for tests: memory database, auto-approving payments
    pub async fn in_memory() -> anyhow::Result<Self> {
        let db_service = DbService::memory().await?;
        let config = Config::with_overrides(":memory:", 0);
        Ok(Self::new(
            config,
            db_service.db,
            Arc::new(AutoApprovePayments::new()),
        ))
    }

    /// Swap the payment collaborator (tests inject declining gateways)
    pub fn with_payments(mut self, payments: Arc<dyn PaymentGateway>) -> Self {
        self.payments = payments;
        self
    }
}
