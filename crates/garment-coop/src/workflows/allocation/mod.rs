//! Tailor allocation: ranks the roster for an incoming order and, when nobody can finish
//! it alone, forms a team and splits the pieces under a per-person cap.

pub mod availability;
pub mod domain;
mod outcome;
pub mod router;
pub mod scoring;
pub mod service;
pub mod team;
pub mod views;

#[cfg(test)]
mod tests;

pub use availability::{
    join_roster, AvailabilityError, AvailabilityProvider, AvailabilitySnapshot,
};
pub use domain::{
    AttributeScores, GarmentCategory, OrderError, OrderRequest, OrderWindow, RosterEntry,
    SpeedColumn, TailorId, TailorProfile, TailorStatus, UnknownCategory,
};
pub use outcome::{AllocationIssue, AllocationPlan, Recommendation};
pub use router::{allocation_router, AllocationRequest, TeamRequest, TeamResponse};
pub use scoring::{ScoreBreakdown, ScoredTailor, ScoringEngine, ScoringPolicy, StrategyMode};
pub use service::AllocationService;
pub use team::{TeamComposer, TeamMember, TeamPlan, TeamWarning};
pub use views::{CandidateView, RecommendationView, TeamMemberView, TeamPlanView};
