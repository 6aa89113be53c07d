//! Window-size and ordering properties of RollingDist

use amt_stats::RollingDist;
use proptest::prelude::*;

proptest! {
    /// The window never exceeds its capacity and fills exactly once enough
    /// samples have been pushed.
    #[test]
    fn size_never_exceeds_capacity(
        capacity in 1usize..64,
        samples in prop::collection::vec(-1e6f64..1e6, 0..256),
    ) {
        let mut dist = RollingDist::new(capacity);
        for (pushed, v) in samples.iter().enumerate() {
            dist.push(*v);
            prop_assert!(dist.len() <= capacity);
            prop_assert_eq!(dist.len(), (pushed + 1).min(capacity));
        }
        if samples.len() >= capacity {
            prop_assert_eq!(dist.len(), capacity);
        }
    }

    /// The window holds exactly the most recent samples, oldest first.
    #[test]
    fn window_holds_latest_samples(
        capacity in 1usize..32,
        samples in prop::collection::vec(-1e3f64..1e3, 1..128),
    ) {
        let mut dist = RollingDist::new(capacity);
        for v in &samples {
            dist.push(*v);
        }
        let start = samples.len().saturating_sub(capacity);
        let expected: Vec<f64> = samples[start..].to_vec();
        prop_assert_eq!(dist.values().collect::<Vec<_>>(), expected);
    }

    /// Percentile ranks stay in [0, 100] whenever they exist.
    #[test]
    fn percentile_rank_is_bounded(
        samples in prop::collection::vec(-1e3f64..1e3, 2..64),
        query in -1e4f64..1e4,
    ) {
        let mut dist = RollingDist::new(64);
        for v in &samples {
            dist.push(*v);
        }
        if let Some(p) = dist.try_percentile(query) {
            prop_assert!((0.0..=100.0).contains(&p));
        }
        if let Some(p) = dist.empirical_percentile(query) {
            prop_assert!((0.0..=100.0).contains(&p));
        }
    }

    /// Extreme detection never fires on a small window.
    #[test]
    fn is_extreme_false_below_ten_samples(
        samples in prop::collection::vec(-1e3f64..1e3, 0..10),
        query in -1e9f64..1e9,
    ) {
        let mut dist = RollingDist::new(100);
        for v in &samples {
            dist.push(*v);
        }
        prop_assert!(!dist.is_extreme(query));
    }
}
