//! Scoring module - combo-scaled points per cascade round
//!
//! Round `i` of a cascade (1-based combo index) scores `cleared * base_points * i`, so
//! chain reactions pay more than isolated matches. The multiplier is not capped.
//! All arithmetic saturates at `u32::MAX`.

/// Points for one round
pub fn round_points(cleared: usize, base_points: u32, combo_index: u32) -> u32 {
    let cleared = u32::try_from(cleared).unwrap_or(u32::MAX);
    cleared
        .saturating_mul(base_points)
        .saturating_mul(combo_index)
}

/// Points for a whole cascade given each round's cleared count, in round order
pub fn cascade_points(match_counts: &[usize], base_points: u32) -> u32 {
    match_counts
        .iter()
        .enumerate()
        .fold(0u32, |total, (i, &cleared)| {
            total.saturating_add(round_points(cleared, base_points, i as u32 + 1))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BASE_POINTS;

    #[test]
    fn test_single_round() {
        assert_eq!(round_points(3, BASE_POINTS, 1), 30);
        assert_eq!(round_points(5, BASE_POINTS, 1), 50);
        assert_eq!(round_points(0, BASE_POINTS, 1), 0);
    }

    #[test]
    fn test_combo_multiplier() {
        assert_eq!(round_points(3, BASE_POINTS, 2), 60);
        assert_eq!(round_points(4, BASE_POINTS, 3), 120);
    }

    #[test]
    fn test_cascade_law() {
        // 10*4*1 + 10*3*2
        assert_eq!(cascade_points(&[4, 3], BASE_POINTS), 100);
        assert_eq!(cascade_points(&[3], BASE_POINTS), 30);
        assert_eq!(cascade_points(&[], BASE_POINTS), 0);
        assert_eq!(cascade_points(&[3, 3, 3], 1), 3 + 6 + 9);
    }

    #[test]
    fn test_saturates() {
        assert_eq!(round_points(usize::MAX, BASE_POINTS, 2), u32::MAX);
        assert_eq!(cascade_points(&[u32::MAX as usize, 1], 1), u32::MAX);
    }
}
