pub mod aggregator;
pub mod builds;
pub mod leaderboard;
pub mod structures;

/// Percentage fields (pick/win/ban rate) round to one decimal.
pub fn round_rate(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// KDA rounds to two decimals.
pub fn round_kda(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rate_rounding() {
        assert_abs_diff_eq!(round_rate(33.333), 33.3);
        assert_abs_diff_eq!(round_rate(66.666), 66.7);
    }

    #[test]
    fn test_kda_rounding() {
        assert_abs_diff_eq!(round_kda(2.6666), 2.67);
        assert_abs_diff_eq!(round_kda(0.875), 0.88);
    }
}
