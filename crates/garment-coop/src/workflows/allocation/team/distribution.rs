/// Pieces handed to each member (same order as the input speeds) and whatever could not be
/// placed under the cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Distribution {
    pub(crate) assigned: Vec<u32>,
    pub(crate) unallocated: u32,
}

/// Splits `quantity` proportionally to speed, caps every share at `cap`, then tops members
/// up one piece at a time, fastest first, until the order is placed or everyone is full.
pub(crate) fn water_fill(speeds: &[f64], quantity: u32, cap: u32) -> Distribution {
    if speeds.is_empty() {
        return Distribution {
            assigned: Vec::new(),
            unallocated: quantity,
        };
    }

    let total_speed: f64 = speeds.iter().sum();
    let mut assigned: Vec<u32> = speeds
        .iter()
        .map(|speed| {
            let ideal = if total_speed > 0.0 {
                (speed / total_speed * f64::from(quantity)).floor()
            } else {
                0.0
            };
            (ideal.clamp(0.0, f64::from(quantity)) as u32).min(cap)
        })
        .collect();

    let mut by_speed: Vec<usize> = (0..speeds.len()).collect();
    by_speed.sort_by(|&a, &b| speeds[b].total_cmp(&speeds[a]));

    trim_rounding_overflow(&mut assigned, &by_speed, quantity);

    let placed: u64 = assigned.iter().map(|&pieces| u64::from(pieces)).sum();
    let mut shortfall = quantity - placed as u32;

    while shortfall > 0 {
        let mut progressed = false;
        for &index in &by_speed {
            if shortfall == 0 {
                break;
            }
            if assigned[index] < cap {
                assigned[index] += 1;
                shortfall -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    Distribution {
        assigned,
        unallocated: shortfall,
    }
}

/// Floating-point shares can in rare cases floor one piece above the exact share; take any
/// excess back from the slowest members.
fn trim_rounding_overflow(assigned: &mut [u32], by_speed: &[usize], quantity: u32) {
    let placed: u64 = assigned.iter().map(|&pieces| u64::from(pieces)).sum();
    let mut excess = placed.saturating_sub(u64::from(quantity));

    for &index in by_speed.iter().rev() {
        if excess == 0 {
            break;
        }
        let taken = u64::from(assigned[index]).min(excess);
        assigned[index] -= taken as u32;
        excess -= taken;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_shares_fill_the_order_exactly() {
        let distribution = water_fill(&[10.0, 5.0, 5.0], 100, 60);

        assert_eq!(distribution.assigned, vec![50, 25, 25]);
        assert_eq!(distribution.unallocated, 0);
    }

    #[test]
    fn rounding_remainder_goes_to_fastest_members_first() {
        let distribution = water_fill(&[3.0, 3.0, 3.0], 10, 10);

        assert_eq!(distribution.assigned, vec![4, 3, 3]);
        assert_eq!(distribution.unallocated, 0);
    }

    #[test]
    fn capped_shares_spill_over_to_slower_members() {
        let distribution = water_fill(&[20.0, 4.0, 1.0], 60, 30);

        assert_eq!(distribution.assigned, vec![30, 19, 11]);
        assert_eq!(distribution.unallocated, 0);
    }

    #[test]
    fn leftover_is_reported_when_everyone_is_capped() {
        let distribution = water_fill(&[20.0, 15.0, 10.0], 100, 30);

        assert_eq!(distribution.assigned, vec![30, 30, 30]);
        assert_eq!(distribution.unallocated, 10);
    }

    #[test]
    fn zero_speed_team_is_filled_round_robin() {
        let distribution = water_fill(&[0.0, 0.0], 5, 10);

        assert_eq!(distribution.assigned, vec![3, 2]);
        assert_eq!(distribution.unallocated, 0);
    }

    #[test]
    fn empty_team_leaves_everything_unallocated() {
        let distribution = water_fill(&[], 12, 10);

        assert!(distribution.assigned.is_empty());
        assert_eq!(distribution.unallocated, 12);
    }
}
