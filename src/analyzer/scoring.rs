//! Score aggregation and classification bands

use crate::models::{Classification, Signal};

/// Upper bound (inclusive) of each band
pub const EDGE_TRIGGERED_MAX: i32 = -3;
pub const MOSTLY_EDGE_MAX: i32 = 0;
pub const MOSTLY_SOTW_MAX: i32 = 3;

pub fn score(signals: &[Signal]) -> i32 {
    signals.iter().map(|s| s.score).sum()
}

pub fn classify(score: i32) -> Classification {
    match score {
        s if s <= EDGE_TRIGGERED_MAX => Classification::EdgeTriggered,
        s if s <= MOSTLY_EDGE_MAX => Classification::MostlyEdge,
        s if s <= MOSTLY_SOTW_MAX => Classification::MostlySotw,
        _ => Classification::Sotw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalKind;

    #[test]
    fn test_empty_is_mostly_edge() {
        assert_eq!(score(&[]), 0);
        assert_eq!(classify(0), Classification::MostlyEdge);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify(-10), Classification::EdgeTriggered);
        assert_eq!(classify(-3), Classification::EdgeTriggered);
        assert_eq!(classify(-2), Classification::MostlyEdge);
        assert_eq!(classify(1), Classification::MostlySotw);
        assert_eq!(classify(3), Classification::MostlySotw);
        assert_eq!(classify(4), Classification::Sotw);
    }

    #[test]
    fn test_classify_is_monotone() {
        let labels: Vec<_> = (-8..=8).map(classify).collect();
        assert!(labels.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_score_sums() {
        let signals = vec![
            Signal::new(SignalKind::UnscopedList, 1, String::new()),
            Signal::new(SignalKind::LoopWrite, 2, String::new()),
            Signal::new(SignalKind::SingleWrite, 3, String::new()),
        ];
        assert_eq!(score(&signals), 5);
        assert_eq!(classify(score(&signals)), Classification::Sotw);
    }
}
