use serde::{Deserialize, Serialize};

/// Weights, thresholds and penalties used by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Share of the daily target a tailor must reach to be counted as able to finish alone.
    pub deadline_tolerance: f64,
    /// Daily target (pieces/day) above which an order switches to high-speed weighting.
    pub urgent_throughput: f64,
    pub high_speed: ModeWeights,
    pub quality_focus: ModeWeights,
    pub location_weight: f64,
    pub age_weight: f64,
    pub specialty_weight: f64,
    pub attitude_blend: AttitudeBlend,
    pub ideal_age: f64,
    /// Orders below this many pieces favour tailors living close by.
    pub small_order_below: u32,
    /// Orders above this many pieces tolerate distance.
    pub large_order_above: u32,
    pub working_penalty: f64,
    pub infeasible_penalty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeWeights {
    pub capability: f64,
    pub attitude: f64,
}

/// Raw multipliers for the attitude attributes. The blended score is not normalised to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeBlend {
    pub neatness: f64,
    pub commitment: f64,
    pub punctuality: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            deadline_tolerance: 0.9,
            urgent_throughput: 8.0,
            high_speed: ModeWeights {
                capability: 40.0,
                attitude: 15.0,
            },
            quality_focus: ModeWeights {
                capability: 15.0,
                attitude: 40.0,
            },
            location_weight: 15.0,
            age_weight: 10.0,
            specialty_weight: 20.0,
            attitude_blend: AttitudeBlend {
                neatness: 30.0,
                commitment: 25.0,
                punctuality: 20.0,
            },
            ideal_age: 40.0,
            small_order_below: 20,
            large_order_above: 50,
            working_penalty: 10_000.0,
            infeasible_penalty: 5_000.0,
        }
    }
}
