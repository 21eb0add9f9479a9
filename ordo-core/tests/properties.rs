use ordo_core::{fit_exponential, fit_linear, Pair, PreferenceAggregator};
use proptest::prelude::*;

/// Answer every pending pair according to a hidden total order (`order[i]` is
/// the item at rank i) until nothing is pending. Returns how many questions
/// were asked.
fn run_to_completion(agg: &mut PreferenceAggregator, order: &[usize]) -> usize {
    let rank_of = |item: usize| order.iter().position(|&i| i == item).unwrap();
    let mut asked = 0;
    while let Some(pair) = agg.next_pair() {
        let (winner, loser) = if rank_of(pair.low()) < rank_of(pair.high()) {
            (pair.low(), pair.high())
        } else {
            (pair.high(), pair.low())
        };
        agg.record_decision(winner, loser);
        asked += 1;
    }
    asked
}

fn permutation(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    (2..=max_len).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

proptest! {
    #[test]
    fn linear_hits_both_endpoints(low in 0u32..100_000, gap in 1u32..100_000, n in 2usize..200) {
        let high = f64::from(low) + f64::from(gap);
        let low = f64::from(low);
        let values = fit_linear(high, low, n);

        prop_assert_eq!(values.len(), n);
        prop_assert_eq!(values[0], high);
        prop_assert_eq!(values[n - 1], low);
        prop_assert!(values.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn exponential_is_non_increasing(
        low in 0u32..1000,
        gap_low in 1u32..1000,
        gap_high in 1u32..1000,
        n in 3usize..60,
    ) {
        let low = f64::from(low);
        let mid = low + f64::from(gap_low);
        let high = mid + f64::from(gap_high);

        let values = fit_exponential(high, mid, low, n).unwrap();
        prop_assert_eq!(values.len(), n);
        prop_assert!(values.iter().all(|v| v.is_finite()));
        prop_assert!(values.windows(2).all(|w| w[0] >= w[1]));

        let again = fit_exponential(high, mid, low, n).unwrap();
        prop_assert_eq!(values, again);
    }

    #[test]
    fn consistent_answers_recover_hidden_order(order in permutation(12)) {
        let n = order.len();
        let mut agg = PreferenceAggregator::new(n);
        let asked = run_to_completion(&mut agg, &order);

        prop_assert!(asked <= n * (n - 1) / 2);
        prop_assert!(agg.next_pending_pairs().is_empty());
        prop_assert_eq!(agg.known_pair_count(), n * (n - 1) / 2);
        prop_assert_eq!(agg.compute_ranking(), order);
    }

    #[test]
    fn ranking_is_a_permutation_with_skips(
        order in permutation(9),
        skip_mask in proptest::collection::vec(any::<bool>(), 64),
    ) {
        let n = order.len();
        let rank_of = |item: usize| order.iter().position(|&i| i == item).unwrap();
        let mut agg = PreferenceAggregator::new(n);

        let mut step = 0;
        while let Some(pair) = agg.next_pair() {
            if skip_mask[step % skip_mask.len()] && !agg.is_skipped(pair) {
                agg.record_skip(pair);
            } else if rank_of(pair.low()) < rank_of(pair.high()) {
                agg.record_decision(pair.low(), pair.high());
            } else {
                agg.record_decision(pair.high(), pair.low());
            }
            step += 1;
            prop_assert!(step <= 2 * n * n, "session did not terminate");
        }

        let mut ranking = agg.compute_ranking();
        prop_assert_eq!(&ranking, &order);
        ranking.sort_unstable();
        prop_assert_eq!(ranking, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn skipped_pair_stays_in_queue(n in 3usize..10, a in 0usize..10, b in 0usize..10) {
        prop_assume!(a < n && b < n && a != b);
        let pair = Pair::new(a, b);
        let mut agg = PreferenceAggregator::new(n);
        agg.record_skip(pair);

        let pending = agg.next_pending_pairs();
        prop_assert_ne!(pending[0], pair);
        prop_assert_eq!(pending.last().copied(), Some(pair));
        prop_assert_eq!(pending.len(), n * (n - 1) / 2);
    }

    #[test]
    fn arbitrary_decisions_never_hang(
        n in 2usize..8,
        decisions in proptest::collection::vec((0usize..8, 0usize..8), 0..40),
    ) {
        let mut agg = PreferenceAggregator::new(n);
        for (w, l) in decisions {
            if w < n && l < n && w != l {
                agg.record_decision(w, l);
            }
        }
        for item in 0..n {
            prop_assert!(!agg.is_better(item, item));
        }
        prop_assert!(agg.pending_count() <= n * (n - 1) / 2);
    }
}
