//! Engagement scoring derived from comment and tag activity.

use time::OffsetDateTime;

/// A post is considered popular once discussion passes this many comments.
pub const POPULARITY_THRESHOLD: usize = 2;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Comments-per-day plus half a point per tag, rounded to two decimals.
/// Posts younger than a full day use their fractional age; an age of zero
/// (or a clock running backwards) counts as one day so the score stays
/// finite and non-negative.
pub fn score(
    comment_count: usize,
    tag_count: usize,
    created_at: OffsetDateTime,
    now: OffsetDateTime,
) -> f64 {
    let mut age_days = (now - created_at).as_seconds_f64() / SECONDS_PER_DAY;
    if age_days <= 0.0 {
        age_days = 1.0;
    }

    let comments_per_day = comment_count as f64 / age_days;
    let tag_weight = tag_count as f64 * 0.5;

    ((comments_per_day + tag_weight) * 100.0).round() / 100.0
}

pub fn is_popular(comment_count: usize) -> bool {
    comment_count > POPULARITY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn one_day_old_post_scores_comments_directly() {
        let now = OffsetDateTime::now_utc();
        let created = now - Duration::days(1);
        assert_eq!(score(4, 0, created, now), 4.0);
    }

    #[test]
    fn tags_add_half_point_each() {
        let now = OffsetDateTime::now_utc();
        let created = now - Duration::days(1);
        assert_eq!(score(0, 3, created, now), 1.5);
    }

    #[test]
    fn fractional_age_amplifies_recent_discussion() {
        let now = OffsetDateTime::now_utc();
        let created = now - Duration::hours(12);
        // 2 comments over half a day is 4 comments per day.
        assert_eq!(score(2, 0, created, now), 4.0);
    }

    #[test]
    fn zero_age_counts_as_one_day() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(score(5, 0, now, now), 5.0);
    }

    #[test]
    fn future_created_at_does_not_go_negative() {
        let now = OffsetDateTime::now_utc();
        let created = now + Duration::hours(6);
        assert_eq!(score(3, 1, created, now), 3.5);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let now = OffsetDateTime::now_utc();
        let created = now - Duration::days(3);
        // 1 comment over 3 days is 0.333..., rounded to 0.33.
        assert_eq!(score(1, 0, created, now), 0.33);
    }

    #[test]
    fn popularity_requires_strictly_more_than_threshold() {
        assert!(!is_popular(2));
        assert!(is_popular(3));
    }
}
