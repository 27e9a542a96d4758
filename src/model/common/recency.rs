use chrono::{DateTime, Duration, Utc};

/// Length of the window in which a question counts as freshly published.
pub fn recency_window() -> Duration {
    Duration::days(1)
}

/// Was something published at `pub_date` within the day leading up to `now`?
///
/// The window is open at its start: something published exactly one day
/// before `now` has just dropped out of it. Anything in the future is not recent.
pub fn was_published_recently(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - recency_window() < pub_date && pub_date <= now
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_question_is_not_recent() {
        let now = Utc::now();
        let pub_date = now - Duration::days(1) - Duration::seconds(1);
        assert!(!was_published_recently(pub_date, now));
    }

    #[test]
    fn future_question_is_not_recent() {
        let now = Utc::now();
        let pub_date = now + Duration::days(30);
        assert!(!was_published_recently(pub_date, now));
    }

    #[test]
    fn recent_question_is_recent() {
        let now = Utc::now();
        let pub_date = now - Duration::hours(23) - Duration::minutes(59) - Duration::seconds(59);
        assert!(was_published_recently(pub_date, now));
    }

    #[test]
    fn window_edges() {
        let now = Utc::now();
        assert!(was_published_recently(now, now));
        assert!(!was_published_recently(now - recency_window(), now));
        assert!(was_published_recently(now - recency_window() + Duration::milliseconds(1), now));
        assert!(!was_published_recently(now + Duration::seconds(1), now));
    }
}
