//! Earnings & Withdrawals
//!
//! The seller's money view. Nothing here keeps a running balance: every
//! snapshot is recomputed from delivered orders and completed jobs, split
//! into available and pending by the settlement flag. Withdrawal requests
//! reserve against the available side; the balance guard lives in the
//! repository transaction, so a racing pair of requests cannot jointly
//! overdraw.

use rust_decimal::Decimal;

use shared::models::{BankDetails, EarningsSnapshot, Role, WithdrawalStatus};
use shared::{ApiError, ApiResult};

use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::WithdrawalRequest;
use crate::db::repository::{JobRepository, OrderRepository, WithdrawalRepository};
use crate::pricing::money;
use crate::utils::time::now_millis;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_amount, validate_optional_text, validate_required_text,
};

pub struct EarningsService {
    orders: OrderRepository,
    jobs: JobRepository,
    withdrawals: WithdrawalRepository,
}

impl EarningsService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            orders: OrderRepository::new(state.db.clone()),
            jobs: JobRepository::new(state.db.clone()),
            withdrawals: WithdrawalRepository::new(state.db.clone()),
        }
    }

    /// The caller's earnings snapshot
    pub async fn earnings(&self, actor: &Actor) -> ApiResult<EarningsSnapshot> {
        actor.require_business()?;
        self.snapshot_for(&actor.profile_id).await
    }

    /// Recompute a seller's snapshot from the books
    async fn snapshot_for(&self, seller: &str) -> ApiResult<EarningsSnapshot> {
        let orders = self.orders.find_delivered_for_seller(seller).await?;
        let jobs = self.jobs.find_completed_for_seller(seller).await?;

        let mut gross = Decimal::ZERO;
        let mut commission = Decimal::ZERO;
        let mut available = Decimal::ZERO;
        let mut pending = Decimal::ZERO;

        for order in &orders {
            let total = money::to_decimal(order.total);
            let cut = money::to_decimal(order.commission);
            gross += total;
            commission += cut;
            if order.settled {
                available += total - cut;
            } else {
                pending += total - cut;
            }
        }
        for job in &jobs {
            let total = money::to_decimal(job.final_price.unwrap_or(0.0));
            let cut = money::to_decimal(job.commission);
            gross += total;
            commission += cut;
            if job.settled {
                available += total - cut;
            } else {
                pending += total - cut;
            }
        }

        Ok(EarningsSnapshot {
            gross_revenue: money::to_f64(gross),
            total_commission: money::to_f64(commission),
            net_revenue: money::to_f64(gross - commission),
            available_balance: money::to_f64(available),
            pending_balance: money::to_f64(pending),
        })
    }

    /// Ask for a payout against the available balance
    ///
    /// The request must fit inside `available - outstanding`, where
    /// outstanding covers every request still PENDING or PROCESSING.
    pub async fn request_withdrawal(
        &self,
        actor: &Actor,
        amount: f64,
        bank: BankDetails,
    ) -> ApiResult<WithdrawalRequest> {
        actor.require_business()?;
        validate_amount(amount, "Withdrawal amount")?;
        validate_required_text(&bank.bank_name, "Bank name", MAX_NAME_LEN)?;
        validate_required_text(&bank.account_number, "Account number", MAX_NAME_LEN)?;
        validate_required_text(&bank.account_name, "Account name", MAX_NAME_LEN)?;

        let snapshot = self.snapshot_for(&actor.profile_id).await?;
        let created = self
            .withdrawals
            .create_checked(
                &actor.profile_id,
                amount,
                bank,
                snapshot.available_balance,
                now_millis(),
            )
            .await?;
        match created {
            Some(request) => {
                tracing::info!(
                    withdrawal = %request.id_string(),
                    seller = %actor.profile_id,
                    amount = %amount,
                    "Withdrawal requested"
                );
                Ok(request)
            }
            None => {
                let outstanding = self
                    .withdrawals
                    .outstanding_total(&actor.profile_id)
                    .await?;
                Err(ApiError::insufficient_balance(format!(
                    "Requested {amount:.2} but only {:.2} is withdrawable \
                     (available {:.2}, outstanding requests {outstanding:.2})",
                    snapshot.available_balance - outstanding,
                    snapshot.available_balance,
                )))
            }
        }
    }

    /// The caller's withdrawal book; admins see the open review queue
    pub async fn list_withdrawals(&self, actor: &Actor) -> ApiResult<Vec<WithdrawalRequest>> {
        match actor.role {
            Role::Business => Ok(self.withdrawals.list_for_seller(&actor.profile_id).await?),
            Role::Admin => Ok(self.withdrawals.list_outstanding().await?),
            Role::Customer => Err(ApiError::forbidden("Withdrawals are a seller feature")),
        }
    }

    /// Fetch one request; the owning seller and admins may see it
    pub async fn get_withdrawal(&self, actor: &Actor, id: &str) -> ApiResult<WithdrawalRequest> {
        let request = self
            .withdrawals
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Withdrawal {id}")))?;
        if actor.role != Role::Admin && request.seller != actor.profile_id {
            return Err(ApiError::forbidden("Not a party to this withdrawal"));
        }
        Ok(request)
    }

    /// Admin decision: move a request along its lifecycle
    pub async fn advance(
        &self,
        actor: &Actor,
        id: &str,
        to: WithdrawalStatus,
        note: Option<String>,
    ) -> ApiResult<WithdrawalRequest> {
        actor.require_admin()?;
        validate_optional_text(&note, "Note", MAX_NOTE_LEN)?;
        let request = self
            .withdrawals
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Withdrawal {id}")))?;

        let from = request.status;
        if !WithdrawalStatus::can_transition(from, actor.role, to) {
            return Err(ApiError::invalid_transition(format!(
                "Cannot move withdrawal from {from} to {to}"
            )));
        }

        let record = request
            .id
            .clone()
            .ok_or_else(|| ApiError::internal("Withdrawal record has no id"))?;
        match self
            .withdrawals
            .advance(&record, from, to, note, now_millis())
            .await?
        {
            Some(updated) => {
                tracing::info!(withdrawal = %id, from = %from, to = %to, "Withdrawal advanced");
                Ok(updated)
            }
            None => Err(ApiError::stale_transition(format!(
                "Withdrawal {id} changed status while this request ran"
            ))),
        }
    }
}
