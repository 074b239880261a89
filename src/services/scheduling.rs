//! Interval arithmetic for sitter calendars.
//!
//! Everything here is pure and works on half-open intervals `[start, end)`,
//! so two intervals that only touch (`a.end == b.start`) do not overlap.
//! The visit service uses it for conflict detection and pricing, the sitter
//! profile service for free-slot generation.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Returns `None` unless `end > start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Sort and coalesce overlapping or adjacent intervals.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                if interval.end > last.end {
                    last.end = interval.end;
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Free time: `available` minus `busy`, both merged first.
pub fn subtract(available: &[Interval], busy: &[Interval]) -> Vec<Interval> {
    let busy = merge(busy);
    let mut free = Vec::new();

    for window in merge(available) {
        let mut cursor = window.start;
        for b in busy.iter().filter(|b| b.overlaps(&window)) {
            if b.start > cursor {
                free.push(Interval {
                    start: cursor,
                    end: b.start,
                });
            }
            if b.end > cursor {
                cursor = b.end;
            }
        }
        if cursor < window.end {
            free.push(Interval {
                start: cursor,
                end: window.end,
            });
        }
    }
    free
}

/// Restrict intervals to `window`, dropping those outside it.
pub fn clip(intervals: &[Interval], window: &Interval) -> Vec<Interval> {
    intervals
        .iter()
        .filter_map(|i| Interval::new(i.start.max(window.start), i.end.min(window.end)))
        .collect()
}

/// Every `[t, t + duration)` that fits inside a free interval.
///
/// Slots start at each free interval's start and advance by `step`.
/// Non-positive durations or steps yield no slots. Generation stops at the
/// end of the representable time range.
pub fn slots(free: &[Interval], duration: Duration, step: Duration) -> Vec<Interval> {
    if duration <= Duration::zero() || step <= Duration::zero() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for window in free {
        let mut start = window.start;
        while let Some(end) = start.checked_add_signed(duration) {
            if end > window.end {
                break;
            }
            out.push(Interval { start, end });
            match start.checked_add_signed(step) {
                Some(next) => start = next,
                None => break,
            }
        }
    }
    out
}

/// Busy intervals that overlap `candidate`.
pub fn conflicts(candidate: &Interval, busy: &[Interval]) -> Vec<Interval> {
    busy.iter()
        .filter(|b| b.overlaps(candidate))
        .copied()
        .collect()
}

/// Whether `candidate` lies entirely inside one merged availability window.
pub fn covered(candidate: &Interval, availability: &[Interval]) -> bool {
    merge(availability).iter().any(|w| w.contains(candidate))
}

/// Price of an interval at an hourly rate, billed per second and rounded up
/// to the next cent. `None` if the amount does not fit in an `i64`.
pub fn price_cents(interval: &Interval, hourly_rate_cents: i64) -> Option<i64> {
    let seconds = interval.duration().num_seconds();
    seconds
        .checked_mul(hourly_rate_cents)?
        .checked_add(3599)
        .map(|scaled| scaled / 3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn iv(from: (u32, u32), to: (u32, u32)) -> Interval {
        Interval::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    #[test]
    fn empty_or_inverted_interval_is_rejected() {
        assert!(Interval::new(at(9, 0), at(9, 0)).is_none());
        assert!(Interval::new(at(10, 0), at(9, 0)).is_none());
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!iv((9, 0), (10, 0)).overlaps(&iv((10, 0), (11, 0))));
        assert!(iv((9, 0), (10, 1)).overlaps(&iv((10, 0), (11, 0))));
    }

    #[test]
    fn merge_coalesces_overlapping_and_adjacent() {
        let merged = merge(&[
            iv((13, 0), (14, 0)),
            iv((9, 0), (10, 0)),
            iv((10, 0), (11, 0)),
            iv((9, 30), (10, 30)),
        ]);
        assert_eq!(merged, vec![iv((9, 0), (11, 0)), iv((13, 0), (14, 0))]);
    }

    #[test]
    fn merge_keeps_contained_interval_inside_outer() {
        let merged = merge(&[iv((9, 0), (17, 0)), iv((10, 0), (11, 0))]);
        assert_eq!(merged, vec![iv((9, 0), (17, 0))]);
    }

    #[test]
    fn subtract_carves_busy_time_out_of_availability() {
        let free = subtract(
            &[iv((9, 0), (17, 0))],
            &[iv((10, 0), (11, 0)), iv((12, 0), (13, 30))],
        );
        assert_eq!(
            free,
            vec![
                iv((9, 0), (10, 0)),
                iv((11, 0), (12, 0)),
                iv((13, 30), (17, 0))
            ]
        );
    }

    #[test]
    fn subtract_handles_busy_spanning_window_edges() {
        let free = subtract(
            &[iv((9, 0), (12, 0)), iv((14, 0), (16, 0))],
            &[iv((8, 0), (9, 30)), iv((11, 0), (15, 0))],
        );
        assert_eq!(free, vec![iv((9, 30), (11, 0)), iv((15, 0), (16, 0))]);
    }

    #[test]
    fn subtract_fully_busy_window_leaves_nothing() {
        assert!(subtract(&[iv((9, 0), (10, 0))], &[iv((8, 0), (11, 0))]).is_empty());
    }

    #[test]
    fn clip_restricts_to_window() {
        let clipped = clip(
            &[iv((8, 0), (10, 0)), iv((11, 0), (12, 0)), iv((15, 0), (16, 0))],
            &iv((9, 0), (11, 30)),
        );
        assert_eq!(clipped, vec![iv((9, 0), (10, 0)), iv((11, 0), (11, 30))]);
    }

    #[test]
    fn slots_fit_inside_free_time() {
        let generated = slots(
            &[iv((9, 0), (10, 45))],
            Duration::minutes(30),
            Duration::minutes(30),
        );
        assert_eq!(
            generated,
            vec![
                iv((9, 0), (9, 30)),
                iv((9, 30), (10, 0)),
                iv((10, 0), (10, 30))
            ]
        );
    }

    #[test]
    fn slots_with_smaller_step_overlap_each_other() {
        let generated = slots(
            &[iv((9, 0), (10, 0))],
            Duration::minutes(60),
            Duration::minutes(15),
        );
        assert_eq!(generated, vec![iv((9, 0), (10, 0))]);

        let generated = slots(
            &[iv((9, 0), (10, 30))],
            Duration::minutes(60),
            Duration::minutes(15),
        );
        assert_eq!(generated.len(), 3);
        assert_eq!(generated[2], iv((9, 30), (10, 30)));
    }

    #[test]
    fn slots_reject_non_positive_lengths() {
        let free = [iv((9, 0), (10, 0))];
        assert!(slots(&free, Duration::zero(), Duration::minutes(15)).is_empty());
        assert!(slots(&free, Duration::minutes(15), Duration::zero()).is_empty());
    }

    #[test]
    fn conflicts_lists_overlapping_busy_intervals() {
        let busy = [iv((9, 0), (10, 0)), iv((10, 0), (11, 0)), iv((12, 0), (13, 0))];
        let found = conflicts(&iv((9, 30), (10, 15)), &busy);
        assert_eq!(found, vec![iv((9, 0), (10, 0)), iv((10, 0), (11, 0))]);
        assert!(conflicts(&iv((11, 0), (12, 0)), &busy).is_empty());
    }

    #[test]
    fn covered_requires_a_single_merged_window() {
        let availability = [iv((9, 0), (12, 0)), iv((12, 0), (14, 0)), iv((15, 0), (16, 0))];
        assert!(covered(&iv((11, 0), (13, 0)), &availability));
        assert!(!covered(&iv((13, 30), (15, 30)), &availability));
        assert!(!covered(&iv((8, 0), (9, 30)), &availability));
    }

    #[test]
    fn price_rounds_up_to_next_cent() {
        assert_eq!(price_cents(&iv((9, 0), (11, 0)), 2000), Some(4000));
        assert_eq!(price_cents(&iv((9, 0), (9, 45)), 2000), Some(1500));
        // 10 minutes at 1999/h = 333.17 cents
        assert_eq!(price_cents(&iv((9, 0), (9, 10)), 1999), Some(334));
    }

    #[test]
    fn price_bills_leftover_seconds() {
        let start = at(9, 0);
        let visit = Interval::new(start, start + Duration::seconds(30 * 60 + 59)).unwrap();
        // 1859 s at 3600/h = 1859 cents, not the 1800 of whole minutes
        assert_eq!(price_cents(&visit, 3600), Some(1859));
    }

    #[test]
    fn price_overflow_is_reported() {
        assert_eq!(price_cents(&iv((9, 0), (10, 0)), i64::MAX / 2), None);
    }

    #[test]
    fn slots_stop_at_the_end_of_time() {
        let free = [iv((9, 0), (17, 0))];
        let huge = Duration::minutes(100_000_000_000_000);
        assert!(slots(&free, huge, Duration::minutes(30)).is_empty());

        let generated = slots(&free, Duration::hours(8), huge);
        assert_eq!(generated, vec![iv((9, 0), (17, 0))]);

        let last = DateTime::<Utc>::MAX_UTC;
        let edge = Interval::new(last - Duration::hours(2), last).unwrap();
        assert_eq!(slots(&[edge], Duration::hours(1), Duration::hours(1)).len(), 2);
    }
}
