mod distribution;
mod sizing;

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::domain::OrderWindow;
use super::outcome::{AllocationIssue, Recommendation};
use super::scoring::ScoredTailor;

/// Builds a team of idle tailors for an order no single tailor can finish in time.
#[derive(Debug, Clone, Copy)]
pub struct TeamComposer {
    per_person_cap: NonZeroU32,
}

impl TeamComposer {
    pub fn new(per_person_cap: NonZeroU32) -> Self {
        Self { per_person_cap }
    }

    pub fn per_person_cap(&self) -> NonZeroU32 {
        self.per_person_cap
    }

    pub fn compose(&self, recommendation: &Recommendation) -> TeamPlan {
        self.compose_from(
            &recommendation.candidates,
            recommendation.order.quantity,
            recommendation.window,
        )
    }

    /// Picks idle candidates in ranked order and splits `quantity` between them.
    pub fn compose_from(
        &self,
        ranked: &[ScoredTailor],
        quantity: u32,
        window: OrderWindow,
    ) -> TeamPlan {
        let cap = self.per_person_cap.get();
        let target = window.target_daily_throughput;
        let idle: Vec<&ScoredTailor> = ranked.iter().filter(|tailor| tailor.is_idle()).collect();

        if idle.is_empty() {
            return TeamPlan {
                members: Vec::new(),
                per_person_cap: cap,
                target_daily_throughput: target,
                total_capacity_per_day: 0.0,
                estimated_days_to_complete: None,
                remaining_days: window.remaining_days,
                feasible_within_deadline: false,
                assigned_pieces: 0,
                unallocated_pieces: quantity,
                warnings: vec![TeamWarning::NoIdleTailors],
            };
        }

        let idle_speeds: Vec<f64> = idle.iter().map(|tailor| tailor.effective_speed).collect();
        let size = sizing::team_size(quantity, cap, &idle_speeds, target);
        let chosen = &idle[..size.members];
        let speeds = &idle_speeds[..size.members];

        let distribution = distribution::water_fill(speeds, quantity, cap);
        let total_capacity_per_day: f64 = speeds.iter().sum();
        let estimated_days_to_complete = if total_capacity_per_day > 0.0 {
            Some(f64::from(quantity) / total_capacity_per_day)
        } else {
            None
        };
        let feasible_within_deadline = estimated_days_to_complete
            .map(|days| days <= f64::from(window.remaining_days))
            .unwrap_or(false);

        let mut warnings = Vec::new();
        if size.capacity_bound > chosen.len() {
            warnings.push(TeamWarning::InsufficientHeadcount {
                required: size.capacity_bound,
                available: chosen.len(),
            });
        }
        if total_capacity_per_day < target {
            warnings.push(TeamWarning::ThroughputShortfall {
                target,
                capacity: total_capacity_per_day,
            });
        }
        if distribution.unallocated > 0 {
            warnings.push(TeamWarning::UnallocatedPieces {
                pieces: distribution.unallocated,
            });
        }

        let members: Vec<TeamMember> = chosen
            .iter()
            .zip(distribution.assigned)
            .map(|(tailor, assigned_pieces)| TeamMember {
                tailor: (*tailor).clone(),
                assigned_pieces,
            })
            .collect();

        TeamPlan {
            assigned_pieces: quantity - distribution.unallocated,
            members,
            per_person_cap: cap,
            target_daily_throughput: target,
            total_capacity_per_day,
            estimated_days_to_complete,
            remaining_days: window.remaining_days,
            feasible_within_deadline,
            unallocated_pieces: distribution.unallocated,
            warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub tailor: ScoredTailor,
    pub assigned_pieces: u32,
}

/// Team selected for an order, with each member's share of the pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPlan {
    pub members: Vec<TeamMember>,
    pub per_person_cap: u32,
    pub target_daily_throughput: f64,
    pub total_capacity_per_day: f64,
    /// `None` when the team has no measurable speed for the category.
    pub estimated_days_to_complete: Option<f64>,
    pub remaining_days: u32,
    pub feasible_within_deadline: bool,
    pub assigned_pieces: u32,
    pub unallocated_pieces: u32,
    pub warnings: Vec<TeamWarning>,
}

impl TeamPlan {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn has_shortfall(&self) -> bool {
        self.warnings.iter().any(TeamWarning::is_shortfall)
    }

    pub fn issue(&self) -> Option<AllocationIssue> {
        if self.warnings.contains(&TeamWarning::NoIdleTailors) {
            return Some(AllocationIssue::NoEligibleCandidates {
                message: TeamWarning::NoIdleTailors.summary(),
            });
        }

        let shortfalls: Vec<String> = self
            .warnings
            .iter()
            .filter(|warning| warning.is_shortfall())
            .map(TeamWarning::summary)
            .collect();

        if shortfalls.is_empty() {
            None
        } else {
            Some(AllocationIssue::CapacityShortfall {
                message: shortfalls.join("; "),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TeamWarning {
    NoIdleTailors,
    InsufficientHeadcount { required: usize, available: usize },
    ThroughputShortfall { target: f64, capacity: f64 },
    UnallocatedPieces { pieces: u32 },
}

impl TeamWarning {
    pub fn is_shortfall(&self) -> bool {
        !matches!(self, TeamWarning::NoIdleTailors)
    }

    pub fn summary(&self) -> String {
        match self {
            TeamWarning::NoIdleTailors => "no idle tailors are available to form a team".to_string(),
            TeamWarning::InsufficientHeadcount {
                required,
                available,
            } => format!(
                "per-person cap needs {required} tailor(s) but only {available} idle tailor(s) exist"
            ),
            TeamWarning::ThroughputShortfall { target, capacity } => format!(
                "team capacity {capacity:.1} pcs/day is below the target of {target:.1} pcs/day"
            ),
            TeamWarning::UnallocatedPieces { pieces } => {
                format!("{pieces} piece(s) could not be assigned without exceeding the cap")
            }
        }
    }
}
