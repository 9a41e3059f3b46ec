//! Job Fulfilment
//!
//! Service requests negotiated between buyer and seller: request, quote,
//! accept, perform, complete. Price fields only move inside the two guarded
//! updates that own them: `quote` while the job still sits in REQUESTED,
//! `complete` when ONGOING work is done. The commission percent is
//! snapshotted at request time; the amount is computed at completion from
//! the final price.

use shared::models::{BudgetRange, JobStatus, Role};
use shared::{ApiError, ApiResult};

use super::party_for;
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{ItemKind, Job, JobCreate};
use crate::db::repository::{CatalogRepository, JobRepository};
use crate::pricing::{DEFAULT_COMMISSION_PERCENT, job_commission};
use crate::utils::time::now_millis;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};

pub struct JobService {
    repo: JobRepository,
    catalog: CatalogRepository,
}

impl JobService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            repo: JobRepository::new(state.db.clone()),
            catalog: CatalogRepository::new(state.db.clone()),
        }
    }

    /// Raise a job request against a seller
    ///
    /// When the request names a catalog service, the seller and commission
    /// percent come off that item; otherwise the seller is named directly
    /// and the commission percent is the platform default.
    pub async fn create(&self, actor: &Actor, input: JobCreate) -> ApiResult<Job> {
        validate_required_text(&input.title, "Title", MAX_NAME_LEN)?;
        validate_required_text(&input.description, "Description", MAX_NOTE_LEN)?;
        validate_optional_text(&input.location, "Location", MAX_ADDRESS_LEN)?;
        if !input.budget_min.is_finite() || !input.budget_max.is_finite() {
            return Err(ApiError::validation("Budget must be a number"));
        }
        if input.budget_min < 0.0 {
            return Err(ApiError::validation("Budget must not be negative"));
        }
        if input.budget_max < input.budget_min {
            return Err(ApiError::validation(
                "Budget maximum must not be below the minimum",
            ));
        }

        let (seller, commission_percent) = match &input.service {
            Some(key) => {
                let item = self
                    .catalog
                    .find_by_key(key)
                    .await?
                    .ok_or_else(|| ApiError::not_found(format!("Catalog item {key}")))?;
                if item.kind != ItemKind::Service {
                    return Err(ApiError::validation(format!(
                        "Catalog item {key} is not a service"
                    )));
                }
                if !item.available {
                    return Err(ApiError::validation(format!(
                        "Catalog item {key} is currently unavailable"
                    )));
                }
                (
                    item.seller,
                    item.commission_percent.unwrap_or(DEFAULT_COMMISSION_PERCENT),
                )
            }
            None => {
                let seller = input
                    .seller
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        ApiError::validation("Provide a seller or a catalog service")
                    })?;
                (seller, DEFAULT_COMMISSION_PERCENT)
            }
        };
        if seller == actor.profile_id {
            return Err(ApiError::validation("You cannot request your own service"));
        }

        let now = now_millis();
        let job = self
            .repo
            .create(Job {
                id: None,
                buyer: actor.profile_id.clone(),
                seller,
                service: input.service,
                title: input.title,
                description: input.description,
                location: input.location,
                budget: BudgetRange {
                    min: input.budget_min,
                    max: input.budget_max,
                },
                commission_percent,
                quoted_price: None,
                final_price: None,
                commission: 0.0,
                status: Default::default(),
                settled: false,
                created_at: now,
                updated_at: now,
                quoted_at: None,
                accepted_at: None,
                started_at: None,
                completed_at: None,
                cancelled_at: None,
                rejected_at: None,
                disputed_at: None,
                settled_at: None,
            })
            .await?;

        tracing::info!(job = %job.id_string(), buyer = %job.buyer, seller = %job.seller, "Job requested");
        Ok(job)
    }

    /// Fetch one job; only its parties (and admins) may see it
    pub async fn get(&self, actor: &Actor, id: &str) -> ApiResult<Job> {
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Job {id}")))?;
        party_for(actor, &job.buyer, &job.seller)?;
        Ok(job)
    }

    /// The caller's job book: buyers see requests, sellers see work
    pub async fn list(&self, actor: &Actor) -> ApiResult<Vec<Job>> {
        match actor.role {
            Role::Business => Ok(self.repo.list_for_seller(&actor.profile_id).await?),
            Role::Customer => Ok(self.repo.list_for_buyer(&actor.profile_id).await?),
            Role::Admin => Err(ApiError::forbidden("Admins look up jobs by id, not by list")),
        }
    }

    /// Quote a price; only the seller, only while the job sits in REQUESTED
    pub async fn quote(&self, actor: &Actor, id: &str, price: f64) -> ApiResult<Job> {
        validate_amount(price, "Quoted price")?;
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Job {id}")))?;
        let party = party_for(actor, &job.buyer, &job.seller)?;
        if party != Role::Business {
            return Err(ApiError::forbidden("Only the seller quotes a job"));
        }
        if !job.status.accepts_quote() {
            return Err(ApiError::invalid_transition(format!(
                "Cannot quote a job in {}",
                job.status
            )));
        }

        let record = job
            .id
            .clone()
            .ok_or_else(|| ApiError::internal("Job record has no id"))?;
        match self.repo.quote(&record, price, now_millis()).await? {
            Some(updated) => {
                tracing::info!(job = %id, price = %price, "Job quoted");
                Ok(updated)
            }
            None => Err(ApiError::stale_transition(format!(
                "Job {id} changed status while this request ran"
            ))),
        }
    }

    /// Move a job to `to`, if the table allows it for this caller
    pub async fn transition(&self, actor: &Actor, id: &str, to: JobStatus) -> ApiResult<Job> {
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Job {id}")))?;
        let party = party_for(actor, &job.buyer, &job.seller)?;

        let from = job.status;
        if !JobStatus::can_transition(from, party, to) {
            return Err(ApiError::invalid_transition(format!(
                "Cannot move job from {from} to {to} as {party}"
            )));
        }

        let record = job
            .id
            .clone()
            .ok_or_else(|| ApiError::internal("Job record has no id"))?;
        match self.repo.transition(&record, from, to, now_millis()).await? {
            Some(updated) => {
                tracing::info!(job = %id, from = %from, to = %to, party = %party, "Job transition");
                Ok(updated)
            }
            None => Err(ApiError::stale_transition(format!(
                "Job {id} changed status while this request ran"
            ))),
        }
    }

    /// Complete ONGOING work, fixing the final price and commission
    ///
    /// Without an explicit final price the quote stands.
    pub async fn complete(
        &self,
        actor: &Actor,
        id: &str,
        final_price: Option<f64>,
    ) -> ApiResult<Job> {
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Job {id}")))?;
        let party = party_for(actor, &job.buyer, &job.seller)?;
        if !JobStatus::can_transition(job.status, party, JobStatus::Completed) {
            return Err(ApiError::invalid_transition(format!(
                "Cannot complete a job in {} as {party}",
                job.status
            )));
        }

        let final_price = match final_price {
            Some(price) => {
                validate_amount(price, "Final price")?;
                price
            }
            None => job.quoted_price.ok_or_else(|| {
                ApiError::validation("Job has no quoted price; supply a final price")
            })?,
        };
        let commission = job_commission(final_price, job.commission_percent);

        let record = job
            .id
            .clone()
            .ok_or_else(|| ApiError::internal("Job record has no id"))?;
        match self
            .repo
            .complete(&record, final_price, commission, now_millis())
            .await?
        {
            Some(updated) => {
                tracing::info!(
                    job = %id,
                    final_price = %final_price,
                    commission = %commission,
                    "Job completed"
                );
                Ok(updated)
            }
            None => Err(ApiError::stale_transition(format!(
                "Job {id} changed status while this request ran"
            ))),
        }
    }

    /// Release a completed job's funds into the seller's available balance
    pub async fn settle(&self, actor: &Actor, id: &str) -> ApiResult<Job> {
        actor.require_admin()?;
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Job {id}")))?;
        if job.status != JobStatus::Completed {
            return Err(ApiError::invalid_transition(format!(
                "Only completed jobs settle; job {id} is {}",
                job.status
            )));
        }
        if job.settled {
            return Err(ApiError::validation(format!("Job {id} is already settled")));
        }

        let record = job
            .id
            .clone()
            .ok_or_else(|| ApiError::internal("Job record has no id"))?;
        match self.repo.settle(&record, now_millis()).await? {
            Some(updated) => Ok(updated),
            None => Err(ApiError::stale_transition(format!(
                "Job {id} changed while this request ran"
            ))),
        }
    }
}
