//! Job Model
//!
//! Service-job lifecycle: the buyer requests work, the seller quotes a
//! price, the buyer accepts, the seller performs and completes. Same table
//! discipline as orders: one `(from, actor)` table, one entry point.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Job status
///
/// `REQUESTED → QUOTED → ACCEPTED → ONGOING → COMPLETED`, with terminal
/// `CANCELLED`, `REJECTED` and `DISPUTED` side exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Requested,
    Quoted,
    Accepted,
    Ongoing,
    Completed,
    Cancelled,
    Rejected,
    Disputed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        Self::Requested,
        Self::Quoted,
        Self::Accepted,
        Self::Ongoing,
        Self::Completed,
        Self::Cancelled,
        Self::Rejected,
        Self::Disputed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Quoted => "QUOTED",
            Self::Accepted => "ACCEPTED",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
            Self::Disputed => "DISPUTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::Rejected | Self::Disputed
        )
    }

    /// Storage field stamped when a job arrives at this status
    ///
    /// `ONGOING` stamps `started_at`; `REQUESTED` is stamped by creation.
    pub fn timestamp_field(&self) -> Option<&'static str> {
        match self {
            Self::Requested => None,
            Self::Quoted => Some("quoted_at"),
            Self::Accepted => Some("accepted_at"),
            Self::Ongoing => Some("started_at"),
            Self::Completed => Some("completed_at"),
            Self::Cancelled => Some("cancelled_at"),
            Self::Rejected => Some("rejected_at"),
            Self::Disputed => Some("disputed_at"),
        }
    }

    /// Destinations the given role may move a job to from `from`
    ///
    /// The seller quotes, starts and completes the work, and may turn a
    /// request down; the buyer accepts a quote or backs out any time before
    /// work starts; the admin moves contested jobs to `DISPUTED`.
    pub fn destinations(from: JobStatus, role: Role) -> &'static [JobStatus] {
        match (from, role) {
            (Self::Requested, Role::Business) => &[Self::Quoted, Self::Rejected],
            (Self::Requested, Role::Customer) => &[Self::Cancelled],
            (Self::Quoted, Role::Customer) => &[Self::Accepted, Self::Cancelled],
            (Self::Accepted, Role::Business) => &[Self::Ongoing],
            (Self::Accepted, Role::Customer) => &[Self::Cancelled],
            (Self::Ongoing, Role::Business) => &[Self::Completed],
            (
                Self::Requested | Self::Quoted | Self::Accepted | Self::Ongoing,
                Role::Admin,
            ) => &[Self::Disputed],
            _ => &[],
        }
    }

    /// Consult the transition table for one `(from, actor) -> to` move
    pub fn can_transition(from: JobStatus, role: Role, to: JobStatus) -> bool {
        Self::destinations(from, role).contains(&to)
    }

    /// `quoted_price` is only settable while the job still sits here
    pub fn accepts_quote(&self) -> bool {
        matches!(self, Self::Requested)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buyer's budget range attached to a job request, in currency unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_walks_the_chain() {
        use JobStatus::*;
        assert!(JobStatus::can_transition(Requested, Role::Business, Quoted));
        assert!(JobStatus::can_transition(Quoted, Role::Customer, Accepted));
        assert!(JobStatus::can_transition(Accepted, Role::Business, Ongoing));
        assert!(JobStatus::can_transition(Ongoing, Role::Business, Completed));
    }

    #[test]
    fn test_no_step_skipping() {
        use JobStatus::*;
        assert!(!JobStatus::can_transition(Requested, Role::Business, Ongoing));
        assert!(!JobStatus::can_transition(Requested, Role::Customer, Accepted));
        assert!(!JobStatus::can_transition(Quoted, Role::Business, Completed));
        assert!(!JobStatus::can_transition(Accepted, Role::Business, Completed));
    }

    #[test]
    fn test_seller_rejects_only_fresh_requests() {
        use JobStatus::*;
        assert!(JobStatus::can_transition(Requested, Role::Business, Rejected));
        assert!(!JobStatus::can_transition(Quoted, Role::Business, Rejected));
        assert!(!JobStatus::can_transition(Accepted, Role::Business, Rejected));
    }

    #[test]
    fn test_buyer_cancels_before_work_starts() {
        use JobStatus::*;
        assert!(JobStatus::can_transition(Requested, Role::Customer, Cancelled));
        assert!(JobStatus::can_transition(Quoted, Role::Customer, Cancelled));
        assert!(JobStatus::can_transition(Accepted, Role::Customer, Cancelled));
        assert!(!JobStatus::can_transition(Ongoing, Role::Customer, Cancelled));
    }

    #[test]
    fn test_admin_disputes_any_non_terminal() {
        use JobStatus::*;
        for from in [Requested, Quoted, Accepted, Ongoing] {
            assert!(JobStatus::can_transition(from, Role::Admin, Disputed));
        }
        for from in [Completed, Cancelled, Rejected, Disputed] {
            assert!(JobStatus::destinations(from, Role::Admin).is_empty());
        }
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        use JobStatus::*;
        for from in [Completed, Cancelled, Rejected, Disputed] {
            for role in [Role::Customer, Role::Business, Role::Admin] {
                assert!(JobStatus::destinations(from, role).is_empty());
            }
        }
    }

    #[test]
    fn test_quote_window_is_requested_only() {
        assert!(JobStatus::Requested.accepts_quote());
        for status in JobStatus::ALL {
            if status != JobStatus::Requested {
                assert!(!status.accepts_quote());
            }
        }
    }
}
