mod config;
mod policy;
mod rules;

pub use config::{AttitudeBlend, ModeWeights, ScoringPolicy};
pub use policy::StrategyMode;

use super::domain::{OrderRequest, OrderWindow, RosterEntry, TailorProfile, TailorStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) use policy::strategy_summary;

/// Stateless scorer applying a [`ScoringPolicy`] to a roster snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn mode_for(&self, window: &OrderWindow) -> StrategyMode {
        policy::select_mode(window, &self.policy)
    }

    /// Scores every eligible tailor and returns them best first. Nothing is truncated.
    pub fn score(
        &self,
        order: &OrderRequest,
        roster: &[RosterEntry],
        today: NaiveDate,
    ) -> ScoringRun {
        let window = order.window(today);
        let mode = self.mode_for(&window);
        let weights = policy::mode_weights(mode, &self.policy);
        debug!(?mode, target = window.target_daily_throughput, "selected scoring mode");

        let pool: Vec<(RosterEntry, f64)> = roster
            .iter()
            .map(|entry| (entry.clone(), entry.profile.effective_speed(order.category)))
            .filter(|(_, speed)| !order.category.requires_capability() || *speed > 0.0)
            .collect();
        let (entries, speeds): (Vec<RosterEntry>, Vec<f64>) = pool.into_iter().unzip();

        let capability = rules::capability_scores(&speeds);
        let age = rules::age_scores(&entries, self.policy.ideal_age);
        let location = rules::location_scores(&entries, order.quantity, &self.policy);

        let mut candidates: Vec<ScoredTailor> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let effective_speed = speeds[index];
                let can_meet_deadline =
                    policy::can_meet_deadline(effective_speed, &window, &self.policy);
                let breakdown = ScoreBreakdown {
                    capability: capability[index],
                    attitude: rules::attitude_score(
                        &entry.profile.attributes,
                        &self.policy.attitude_blend,
                    ),
                    location: location[index],
                    age: age[index],
                    specialty: rules::specialty_score(order.category, &entry.profile.specialty),
                    penalty: policy::penalty_for(entry.status, can_meet_deadline, &self.policy),
                };
                let final_score = breakdown.capability * weights.capability
                    + breakdown.attitude * weights.attitude
                    + breakdown.location * self.policy.location_weight
                    + breakdown.age * self.policy.age_weight
                    + breakdown.specialty * self.policy.specialty_weight
                    - breakdown.penalty;

                ScoredTailor {
                    profile: entry.profile,
                    status: entry.status,
                    effective_speed,
                    can_meet_deadline,
                    breakdown,
                    final_score,
                }
            })
            .collect();

        // `sort_by` is stable, so equal scores keep roster order.
        candidates.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        ScoringRun {
            window,
            mode,
            candidates,
        }
    }
}

/// Output of one scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRun {
    pub window: OrderWindow,
    pub mode: StrategyMode,
    pub candidates: Vec<ScoredTailor>,
}

/// Normalised component scores behind a tailor's final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub capability: f64,
    pub attitude: f64,
    pub location: f64,
    pub age: f64,
    pub specialty: f64,
    pub penalty: f64,
}

/// A tailor's fitness for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTailor {
    pub profile: TailorProfile,
    pub status: TailorStatus,
    pub effective_speed: f64,
    pub can_meet_deadline: bool,
    pub breakdown: ScoreBreakdown,
    pub final_score: f64,
}

impl ScoredTailor {
    pub fn is_idle(&self) -> bool {
        self.status == TailorStatus::Idle
    }
}
