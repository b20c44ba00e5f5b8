use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{OrderRequest, OrderWindow};
use super::scoring::{ScoredTailor, StrategyMode};
use super::team::TeamPlan;

/// Classified, recoverable problem reported alongside a (possibly empty) result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationIssue {
    DataUnavailable { message: String },
    NoEligibleCandidates { message: String },
    CapacityShortfall { message: String },
}

impl AllocationIssue {
    pub fn message(&self) -> &str {
        match self {
            AllocationIssue::DataUnavailable { message }
            | AllocationIssue::NoEligibleCandidates { message }
            | AllocationIssue::CapacityShortfall { message } => message,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            AllocationIssue::DataUnavailable { .. } => "data_unavailable",
            AllocationIssue::NoEligibleCandidates { .. } => "no_eligible_candidates",
            AllocationIssue::CapacityShortfall { .. } => "capacity_shortfall",
        }
    }
}

/// Ranked tailors for one order. Owned by the caller, who may keep it across
/// interactions and later feed it to the team composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub order: OrderRequest,
    pub evaluated_on: NaiveDate,
    pub window: OrderWindow,
    pub mode: StrategyMode,
    pub candidates: Vec<ScoredTailor>,
    pub summary: String,
    pub issue: Option<AllocationIssue>,
}

impl Recommendation {
    pub fn top(&self) -> Option<&ScoredTailor> {
        self.candidates.first()
    }

    /// The best-ranked tailor, provided they are idle and can finish the order alone.
    pub fn solo_pick(&self) -> Option<&ScoredTailor> {
        self.top()
            .filter(|tailor| tailor.is_idle() && tailor.can_meet_deadline)
    }

    /// True when there are candidates but no idle one can carry the order alone.
    pub fn needs_team(&self) -> bool {
        !self.candidates.is_empty() && self.solo_pick().is_none()
    }

    pub fn idle_candidates(&self) -> impl Iterator<Item = &ScoredTailor> {
        self.candidates.iter().filter(|tailor| tailor.is_idle())
    }
}

/// Recommendation plus the team composed for it, when one was needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub recommendation: Recommendation,
    pub team: Option<TeamPlan>,
}

impl AllocationPlan {
    /// The most relevant issue: a scoring issue first, otherwise a team shortfall.
    pub fn issue(&self) -> Option<AllocationIssue> {
        self.recommendation
            .issue
            .clone()
            .or_else(|| self.team.as_ref().and_then(TeamPlan::issue))
    }
}
