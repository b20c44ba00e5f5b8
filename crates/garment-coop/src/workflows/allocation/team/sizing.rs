/// Members needed so that nobody exceeds the per-person cap.
pub(crate) fn capacity_bound(quantity: u32, per_person_cap: u32) -> usize {
    quantity.div_ceil(per_person_cap.max(1)) as usize
}

/// Smallest ranked prefix whose combined speed reaches the daily target, or every
/// candidate when the target is out of reach.
pub(crate) fn throughput_bound(speeds: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    for (index, speed) in speeds.iter().enumerate() {
        if cumulative >= target {
            return index;
        }
        cumulative += speed;
    }
    speeds.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TeamSize {
    pub(crate) capacity_bound: usize,
    pub(crate) throughput_bound: usize,
    pub(crate) members: usize,
}

pub(crate) fn team_size(
    quantity: u32,
    per_person_cap: u32,
    speeds: &[f64],
    target: f64,
) -> TeamSize {
    let capacity_bound = capacity_bound(quantity, per_person_cap);
    let throughput_bound = throughput_bound(speeds, target);

    TeamSize {
        capacity_bound,
        throughput_bound,
        members: capacity_bound.max(throughput_bound).min(speeds.len()),
    }
}
