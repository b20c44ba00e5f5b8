use super::super::domain::{OrderRequest, OrderWindow, TailorStatus};
use super::config::{ModeWeights, ScoringPolicy};
use serde::{Deserialize, Serialize};

/// Weighting regime picked from the order's daily target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    HighSpeed,
    QualityFocus,
}

impl StrategyMode {
    pub const fn label(self) -> &'static str {
        match self {
            StrategyMode::HighSpeed => "HIGH SPEED (demanding target)",
            StrategyMode::QualityFocus => "QUALITY FOCUS (relaxed target)",
        }
    }
}

pub(crate) fn select_mode(window: &OrderWindow, policy: &ScoringPolicy) -> StrategyMode {
    if window.target_daily_throughput > policy.urgent_throughput {
        StrategyMode::HighSpeed
    } else {
        StrategyMode::QualityFocus
    }
}

pub(crate) fn mode_weights(mode: StrategyMode, policy: &ScoringPolicy) -> ModeWeights {
    match mode {
        StrategyMode::HighSpeed => policy.high_speed,
        StrategyMode::QualityFocus => policy.quality_focus,
    }
}

/// Penalty large enough to push busy or too-slow tailors below every feasible idle tailor.
pub(crate) fn penalty_for(
    status: TailorStatus,
    can_meet_deadline: bool,
    policy: &ScoringPolicy,
) -> f64 {
    let mut penalty = 0.0;
    if status == TailorStatus::Working {
        penalty += policy.working_penalty;
    }
    if !can_meet_deadline {
        penalty += policy.infeasible_penalty;
    }
    penalty
}

pub(crate) fn can_meet_deadline(
    effective_speed: f64,
    window: &OrderWindow,
    policy: &ScoringPolicy,
) -> bool {
    effective_speed >= window.target_daily_throughput * policy.deadline_tolerance
}

/// Human-readable description of how the order was scored.
pub(crate) fn strategy_summary(
    order: &OrderRequest,
    window: &OrderWindow,
    mode: StrategyMode,
) -> String {
    let mut lines = vec![format!("Mode: {}", mode.label())];
    if window.due_now {
        lines.push("Deadline is today!".to_string());
    } else {
        lines.push(format!("Time left: {} day(s)", window.remaining_days));
    }
    lines.push(format!(
        "Target: {} pcs in {} day(s)",
        order.quantity, window.remaining_days
    ));
    lines.push(format!(
        "Minimum speed: {:.1} pcs/day",
        window.target_daily_throughput
    ));
    lines.join("\n")
}
