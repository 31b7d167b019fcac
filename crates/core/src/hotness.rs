//! Hot-score ranking.
//!
//! The score favours items that collect views, comments and votes quickly,
//! and decays with age. Recent edits slow the decay.

use chrono::{DateTime, Utc};

/// Only items created within this many days are rescored; older items keep
/// their last stored score.
pub const HOT_IN_DAYS: i64 = 90;

/// Stored scores are `ceil(score * HOT_SCORE_SCALE)`.
pub const HOT_SCORE_SCALE: f64 = 10_000.0;

/// Page size used when walking items for a batch rescore.
pub const HOT_SCORE_BATCH_SIZE: i64 = 100;

/// Inputs to the hot-score formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotInputs {
    pub view_count: i64,
    pub comment_count: i64,
    pub vote_count: i64,
    /// Sum of answer votes. Currently always zero.
    pub answer_score: i64,
    /// Whole hours since creation.
    pub age_hours: i64,
    /// Whole hours since last update.
    pub updated_hours: i64,
}

impl HotInputs {
    /// Derive ages from row timestamps. An `updated_at` before the Unix epoch
    /// is treated as "never updated" and falls back to `created_at`.
    pub fn from_timestamps(
        view_count: i64,
        comment_count: i64,
        vote_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let updated = if updated_at.timestamp() < 0 {
            created_at.timestamp()
        } else {
            updated_at.timestamp()
        };
        let now = now.timestamp();
        Self {
            view_count,
            comment_count,
            vote_count,
            answer_score: 0,
            age_hours: (now - created_at.timestamp()) / 3600,
            updated_hours: (now - updated) / 3600,
        }
    }
}

/// Raw (unscaled) score.
///
/// `(ln(V)*4 + C*S/5 + A) / (g + 1 - (g - u)/2)^1.5`
///
/// `ln(0)` is not special-cased: zero views yields negative infinity, which
/// [`hot_score`] clamps to zero.
pub fn raw_score(inputs: &HotInputs) -> f64 {
    let views = inputs.view_count as f64;
    let comments = inputs.comment_count as f64;
    let votes = inputs.vote_count as f64;
    let answers = inputs.answer_score as f64;
    let age = inputs.age_hours as f64;
    let updated = inputs.updated_hours as f64;

    let numerator = views.ln() * 4.0 + (comments * votes) / 5.0 + answers;
    let denominator = ((age + 1.0) - (age - updated) / 2.0).powf(1.5);
    numerator / denominator
}

/// Scaled integer score as stored in `hot_score`. Never negative.
pub fn hot_score(inputs: &HotInputs) -> i32 {
    let mut score = raw_score(inputs);
    if score < 0.0 {
        score = 0.0;
    }
    // NaN and overflow saturate through the float-to-int cast.
    (score * HOT_SCORE_SCALE).ceil() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn inputs(v: i64, c: i64, s: i64, g: i64, u: i64) -> HotInputs {
        HotInputs {
            view_count: v,
            comment_count: c,
            vote_count: s,
            answer_score: 0,
            age_hours: g,
            updated_hours: u,
        }
    }

    #[test]
    fn reference_case_matches_float_computation() {
        let i = inputs(100, 5, 10, 24, 1);
        let expected = (100f64.ln() * 4.0 + 50.0 / 5.0) / (25.0f64 - 23.0 / 2.0).powf(1.5);
        assert!((raw_score(&i) - expected).abs() < 1e-12);
        assert_eq!(hot_score(&i), (expected * 10_000.0).ceil() as i32);
        assert_eq!(hot_score(&i), 5730);
    }

    #[test]
    fn score_is_never_negative() {
        for v in [1, 2, 10, 1000] {
            for c in [0, 1, 7] {
                for g in [0, 1, 48, 2000] {
                    for u in [0, g / 2, g] {
                        assert!(hot_score(&inputs(v, c, -50, g, u)) >= 0);
                    }
                }
            }
        }
    }

    #[test]
    fn zero_views_clamps_to_zero() {
        assert_eq!(hot_score(&inputs(0, 0, 0, 5, 5)), 0);
    }

    #[test]
    fn nan_maps_to_zero() {
        // A negative base raised to 1.5 is NaN.
        let i = inputs(10, 0, 0, -10, 0);
        assert!(raw_score(&i).is_nan());
        assert_eq!(hot_score(&i), 0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let i = inputs(321, 4, 3, 72, 10);
        assert_eq!(hot_score(&i), hot_score(&i));
    }

    #[test]
    fn older_items_score_lower() {
        let fresh = hot_score(&inputs(500, 3, 3, 2, 2));
        let stale = hot_score(&inputs(500, 3, 3, 200, 200));
        assert!(fresh > stale);
    }

    #[test]
    fn ages_are_whole_hours() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let updated = created + Duration::minutes(150);
        let now = created + Duration::minutes(24 * 60 + 59);
        let i = HotInputs::from_timestamps(10, 1, 1, created, updated, now);
        assert_eq!(i.age_hours, 24);
        assert_eq!(i.updated_hours, 22);
    }

    #[test]
    fn pre_epoch_update_falls_back_to_creation() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        let now = created + Duration::hours(5);
        let i = HotInputs::from_timestamps(10, 1, 1, created, updated, now);
        assert_eq!(i.updated_hours, 5);
    }
}
