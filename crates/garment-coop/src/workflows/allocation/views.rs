use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{GarmentCategory, TailorId};
use super::outcome::{AllocationIssue, Recommendation};
use super::scoring::{ScoreBreakdown, ScoredTailor, StrategyMode};
use super::team::{TeamMember, TeamPlan};

#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub rank: usize,
    pub tailor_id: TailorId,
    pub name: String,
    pub status: &'static str,
    pub effective_speed: f64,
    pub can_meet_deadline: bool,
    pub distance_km: f64,
    pub final_score: f64,
    pub breakdown: ScoreBreakdown,
}

impl CandidateView {
    fn from_scored(rank: usize, tailor: &ScoredTailor) -> Self {
        Self {
            rank,
            tailor_id: tailor.profile.id.clone(),
            name: tailor.profile.name.clone(),
            status: tailor.status.label(),
            effective_speed: tailor.effective_speed,
            can_meet_deadline: tailor.can_meet_deadline,
            distance_km: tailor.profile.home_distance_km,
            final_score: tailor.final_score,
            breakdown: tailor.breakdown,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub category: GarmentCategory,
    pub quantity: u32,
    pub deadline: NaiveDate,
    pub evaluated_on: NaiveDate,
    pub remaining_days: u32,
    pub target_daily_throughput: f64,
    pub mode: StrategyMode,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<AllocationIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solo_pick: Option<String>,
    pub total_candidates: usize,
    pub candidates: Vec<CandidateView>,
}

impl RecommendationView {
    /// `limit` only trims what is displayed; ranks are those of the full list.
    pub fn from_recommendation(recommendation: &Recommendation, limit: Option<usize>) -> Self {
        let shown = limit.unwrap_or(recommendation.candidates.len());
        Self {
            category: recommendation.order.category,
            quantity: recommendation.order.quantity,
            deadline: recommendation.order.deadline,
            evaluated_on: recommendation.evaluated_on,
            remaining_days: recommendation.window.remaining_days,
            target_daily_throughput: recommendation.window.target_daily_throughput,
            mode: recommendation.mode,
            summary: recommendation.summary.clone(),
            issue: recommendation.issue.clone(),
            solo_pick: recommendation
                .solo_pick()
                .map(|tailor| tailor.profile.name.clone()),
            total_candidates: recommendation.candidates.len(),
            candidates: recommendation
                .candidates
                .iter()
                .take(shown)
                .enumerate()
                .map(|(index, tailor)| CandidateView::from_scored(index + 1, tailor))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberView {
    pub tailor_id: TailorId,
    pub name: String,
    pub effective_speed: f64,
    pub final_score: f64,
    pub assigned_pieces: u32,
}

impl From<&TeamMember> for TeamMemberView {
    fn from(member: &TeamMember) -> Self {
        Self {
            tailor_id: member.tailor.profile.id.clone(),
            name: member.tailor.profile.name.clone(),
            effective_speed: member.tailor.effective_speed,
            final_score: member.tailor.final_score,
            assigned_pieces: member.assigned_pieces,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamPlanView {
    pub members: Vec<TeamMemberView>,
    pub per_person_cap: u32,
    pub total_capacity_per_day: f64,
    pub target_daily_throughput: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days_to_complete: Option<f64>,
    pub remaining_days: u32,
    pub feasible_within_deadline: bool,
    pub assigned_pieces: u32,
    pub unallocated_pieces: u32,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<AllocationIssue>,
}

impl From<&TeamPlan> for TeamPlanView {
    fn from(plan: &TeamPlan) -> Self {
        Self {
            members: plan.members.iter().map(TeamMemberView::from).collect(),
            per_person_cap: plan.per_person_cap,
            total_capacity_per_day: plan.total_capacity_per_day,
            target_daily_throughput: plan.target_daily_throughput,
            estimated_days_to_complete: plan.estimated_days_to_complete,
            remaining_days: plan.remaining_days,
            feasible_within_deadline: plan.feasible_within_deadline,
            assigned_pieces: plan.assigned_pieces,
            unallocated_pieces: plan.unallocated_pieces,
            warnings: plan.warnings.iter().map(|warning| warning.summary()).collect(),
            issue: plan.issue(),
        }
    }
}
