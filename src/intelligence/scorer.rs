/// Purchase interval arithmetic
///
/// Whole days between purchases and the running average interval.

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub struct Scorer;

impl Scorer {
    /// Whole days from `earlier` to `later`, rounded down
    pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
        (later - earlier).num_milliseconds().div_euclid(MILLIS_PER_DAY)
    }

    /// Fold one more interval into the stored average
    ///
    /// `round((old_average * old_count + days_since_last) / (old_count + 1))`,
    /// halves rounding up. Only the aggregates are stored, so rounding error
    /// carries into every later update.
    pub fn running_average(old_average: i64, old_count: i64, days_since_last: i64) -> i64 {
        let total = old_average * old_count + days_since_last;
        let n = old_count + 1;

        // floor(total / n + 1/2) in integers
        (2 * total + n).div_euclid(2 * n)
    }

    /// Due when there is a learned interval and at least that long has passed
    pub fn is_due(average_frequency_days: i64, days_since_last: i64) -> bool {
        average_frequency_days > 0 && days_since_last >= average_frequency_days
    }
}
