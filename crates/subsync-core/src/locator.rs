//! Active-interval lookup.
//!
//! Called once per rendered frame, so the search stays O(log n) over the
//! sorted, non-overlapping interval list.

use crate::subtitle::SubtitleInterval;

/// Index of the interval whose `[start, end)` contains `t`.
pub fn locate_index(intervals: &[SubtitleInterval], t: f64) -> Option<usize> {
    if intervals.is_empty() || !t.is_finite() {
        return None;
    }
    let mut lo = 0usize;
    let mut hi = intervals.len() - 1;
    loop {
        let mid = lo + (hi - lo) / 2;
        let interval = &intervals[mid];
        if t < interval.start_time {
            if mid == 0 {
                return None;
            }
            hi = mid - 1;
        } else if t >= interval.end_time {
            lo = mid + 1;
        } else {
            return Some(mid);
        }
        if lo > hi {
            return None;
        }
    }
}

pub fn locate(intervals: &[SubtitleInterval], t: f64) -> Option<&SubtitleInterval> {
    locate_index(intervals, t).map(|idx| &intervals[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn build(ranges: &[(f64, f64)]) -> Vec<SubtitleInterval> {
        ranges
            .iter()
            .enumerate()
            .map(|(idx, (start, end))| {
                SubtitleInterval::new(idx as u64, *start, *end, format!("line {idx}"), "")
            })
            .collect()
    }

    fn linear(intervals: &[SubtitleInterval], t: f64) -> Option<usize> {
        intervals.iter().position(|interval| interval.contains(t))
    }

    #[test]
    fn empty_list_has_no_active_interval() {
        assert_eq!(locate(&[], 3.0), None);
    }

    #[test]
    fn boundaries_are_half_open() {
        let subs = build(&[(0.0, 2.0), (2.0, 4.0), (6.0, 8.0)]);
        assert_eq!(locate_index(&subs, 0.0), Some(0));
        assert_eq!(locate_index(&subs, 1.999), Some(0));
        assert_eq!(locate_index(&subs, 2.0), Some(1));
        assert_eq!(locate_index(&subs, 4.0), None);
        assert_eq!(locate_index(&subs, 5.0), None);
        assert_eq!(locate_index(&subs, 7.5), Some(2));
        assert_eq!(locate_index(&subs, 8.0), None);
        assert_eq!(locate_index(&subs, -0.5), None);
        assert_eq!(locate_index(&subs, f64::NAN), None);
    }

    /// Sorted ranges built from (gap, length) steps; gaps of zero make
    /// adjacent intervals.
    fn track_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
        proptest::collection::vec(
            (
                prop_oneof![Just(0.0), 0.0f64..2.0],
                0.05f64..4.0,
            ),
            0..40,
        )
        .prop_map(|steps| {
            let mut cursor = 0.0;
            steps
                .into_iter()
                .map(|(gap, len)| {
                    let start = cursor + gap;
                    cursor = start + len;
                    (start, cursor)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn matches_linear_scan(ranges in track_strategy(), t in -1.0f64..200.0) {
            let subs = build(&ranges);
            prop_assert_eq!(locate_index(&subs, t), linear(&subs, t));
        }

        #[test]
        fn exact_boundaries_match_linear_scan(ranges in track_strategy()) {
            let subs = build(&ranges);
            for (start, end) in &ranges {
                prop_assert_eq!(locate_index(&subs, *start), linear(&subs, *start));
                prop_assert_eq!(locate_index(&subs, *end), linear(&subs, *end));
            }
        }
    }
}
