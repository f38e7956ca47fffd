//! Property-based tests comparing the interval tree against a linear scan.

use proptest::prelude::*;
use schedule_engine::IntervalTree;

fn arb_intervals() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec(
        (-50i32..50, 0i32..30).prop_map(|(from, len)| (from, from + len)),
        0..40,
    )
}

fn build(intervals: &[(i32, i32)]) -> IntervalTree<i32, usize> {
    let mut tree = IntervalTree::new();
    for (i, &(from, to)) in intervals.iter().enumerate() {
        tree.add(from, to, i).unwrap();
    }
    tree
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn point_query_matches_linear_scan(intervals in arb_intervals(), point in -60i32..90) {
        let tree = build(&intervals);
        let mut got: Vec<usize> = tree.query(&point).into_iter().copied().collect();
        got.sort_unstable();
        let expected: Vec<usize> = intervals
            .iter()
            .enumerate()
            .filter(|(_, &(from, to))| from <= point && point <= to)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn forward_query_is_sorted_and_complete(
        intervals in arb_intervals(),
        a in -60i32..90,
        len in 0i32..40,
    ) {
        let b = a + len;
        let tree = build(&intervals);
        let got: Vec<usize> = tree.query_forward(&a, &b).into_iter().copied().collect();

        for pair in got.windows(2) {
            let (x, y) = (intervals[pair[0]], intervals[pair[1]]);
            prop_assert!(x <= y, "not ascending: {:?} then {:?}", x, y);
        }

        let mut got_set = got.clone();
        got_set.sort_unstable();
        let expected: Vec<usize> = intervals
            .iter()
            .enumerate()
            .filter(|(_, &(from, to))| from <= b && a <= to)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(got_set, expected);
    }

    #[test]
    fn backward_query_is_descending(
        intervals in arb_intervals(),
        a in -60i32..90,
        len in 0i32..40,
    ) {
        let b = a + len;
        let tree = build(&intervals);
        let got: Vec<usize> = tree.query_backward(&a, &b).into_iter().copied().collect();
        for pair in got.windows(2) {
            let (x, y) = (intervals[pair[0]], intervals[pair[1]]);
            prop_assert!(x >= y, "not descending: {:?} then {:?}", x, y);
        }
        prop_assert_eq!(got.len(), tree.query_forward(&a, &b).len());
    }
}
