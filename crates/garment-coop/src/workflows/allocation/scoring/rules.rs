use super::super::domain::{AttributeScores, GarmentCategory, RosterEntry};
use super::config::{AttitudeBlend, ScoringPolicy};

/// Scales values into [0, 1] over the pool. A pool without spread maps everything to 0.
pub(crate) fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|value| {
            if range > 0.0 {
                (value - min) / range
            } else {
                0.0
            }
        })
        .collect()
}

pub(crate) fn capability_scores(effective_speeds: &[f64]) -> Vec<f64> {
    min_max_normalize(effective_speeds)
}

/// Ages closer to the policy's ideal age score higher.
pub(crate) fn age_scores(pool: &[RosterEntry], ideal_age: f64) -> Vec<f64> {
    let gaps: Vec<f64> = pool
        .iter()
        .map(|entry| (f64::from(entry.profile.age) - ideal_age).abs())
        .collect();

    min_max_normalize(&gaps)
        .into_iter()
        .map(|gap| 1.0 - gap)
        .collect()
}

pub(crate) fn location_scores(
    pool: &[RosterEntry],
    quantity: u32,
    policy: &ScoringPolicy,
) -> Vec<f64> {
    let distances: Vec<f64> = pool
        .iter()
        .map(|entry| entry.profile.home_distance_km)
        .collect();

    min_max_normalize(&distances)
        .into_iter()
        .map(|distance| {
            if quantity < policy.small_order_below {
                1.0 - distance
            } else if quantity > policy.large_order_above {
                distance * 0.5 + 0.5
            } else {
                0.5
            }
        })
        .collect()
}

/// Attributes are ratings in [0, 1]; anything outside is clamped so the blend stays bounded
/// by the sum of its multipliers.
pub(crate) fn attitude_score(attributes: &AttributeScores, blend: &AttitudeBlend) -> f64 {
    unit(attributes.neatness) * blend.neatness
        + unit(attributes.commitment) * blend.commitment
        + unit(attributes.punctuality) * blend.punctuality
}

fn unit(rating: f64) -> f64 {
    if rating.is_finite() {
        rating.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

const UNIFORM_WORDS: &[&str] = &["seragam", "uniform", "uniforms"];
const GENERALIST_WORDS: &[&str] = &["semua", "all", "everything"];
const SKIRT_WORDS: &[&str] = &["rok", "skirt", "skirts"];

/// Match between the order category and the tailor's free-text specialty tag.
pub(crate) fn specialty_score(category: GarmentCategory, specialty: &str) -> f64 {
    let lowered = specialty.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let mentions = |vocabulary: &[&str]| words.iter().any(|word| vocabulary.contains(word));

    if category.is_uniform() && mentions(UNIFORM_WORDS) {
        1.0
    } else if mentions(GENERALIST_WORDS) {
        0.9
    } else if category == GarmentCategory::Skirt && mentions(SKIRT_WORDS) {
        1.0
    } else {
        0.3
    }
}
