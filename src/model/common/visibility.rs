use std::cmp::Reverse;

use chrono::{DateTime, Utc};

/// How many questions the index lists at most.
pub const LATEST_QUESTIONS_LIMIT: usize = 5;

/// Something with a publication date and a stable identifier to break ties on.
pub trait Publication {
    fn pub_date(&self) -> DateTime<Utc>;

    fn tiebreak(&self) -> u32;

    /// Has this been published as of `now`? Future-dated items are hidden.
    fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date() <= now
    }
}

/// Select the items published as of `now`, newest first, keeping at most `limit`.
///
/// Items sharing a publication date are ordered by descending tiebreak,
/// so the result does not depend on the input order.
pub fn latest_visible<T, I>(items: I, now: DateTime<Utc>, limit: usize) -> Vec<T>
where
    T: Publication,
    I: IntoIterator<Item = T>,
{
    let mut visible: Vec<T> = items
        .into_iter()
        .filter(|item| item.is_published(now))
        .collect();
    visible.sort_by_key(|item| Reverse((item.pub_date(), item.tiebreak())));
    visible.truncate(limit);
    visible
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Dated(u32, DateTime<Utc>);

    impl Publication for Dated {
        fn pub_date(&self) -> DateTime<Utc> {
            self.1
        }

        fn tiebreak(&self) -> u32 {
            self.0
        }
    }

    fn days(now: DateTime<Utc>, offset: i64) -> DateTime<Utc> {
        now + Duration::days(offset)
    }

    #[test]
    fn nothing_to_show() {
        let shown = latest_visible(Vec::<Dated>::new(), Utc::now(), LATEST_QUESTIONS_LIMIT);
        assert!(shown.is_empty());
    }

    #[test]
    fn past_question_is_shown() {
        let now = Utc::now();
        let past = Dated(1, days(now, -2));
        assert_eq!(latest_visible([past], now, LATEST_QUESTIONS_LIMIT), vec![past]);
    }

    #[test]
    fn future_question_is_hidden() {
        let now = Utc::now();
        let future = Dated(1, days(now, 2));
        assert!(latest_visible([future], now, LATEST_QUESTIONS_LIMIT).is_empty());
    }

    #[test]
    fn question_published_right_now_is_shown() {
        let now = Utc::now();
        let current = Dated(1, now);
        assert_eq!(latest_visible([current], now, LATEST_QUESTIONS_LIMIT), vec![current]);
    }

    #[test]
    fn newest_first_without_future() {
        let now = Utc::now();
        let old = Dated(1, days(now, -30));
        let future = Dated(2, days(now, 30));
        let recent = Dated(3, days(now, -3));
        assert_eq!(
            latest_visible([old, future, recent], now, LATEST_QUESTIONS_LIMIT),
            vec![recent, old]
        );
    }

    #[test]
    fn capped_at_limit() {
        let now = Utc::now();
        let all: Vec<_> = (1..=8).map(|i| Dated(i, days(now, -i64::from(i)))).collect();
        let shown = latest_visible(all.clone(), now, LATEST_QUESTIONS_LIMIT);
        assert_eq!(shown, all[..LATEST_QUESTIONS_LIMIT].to_vec());
    }

    #[test]
    fn ties_broken_by_identifier() {
        let now = Utc::now();
        let when = days(now, -1);
        let first = Dated(4, when);
        let second = Dated(9, when);
        assert_eq!(
            latest_visible([first, second], now, LATEST_QUESTIONS_LIMIT),
            vec![second, first]
        );
    }

    #[test]
    fn never_future_always_sorted() {
        let now = Utc::now();
        let offsets = [-40, 3, -1, 0, 12, -7, -7, -365, 1, -2, -20];
        let items = offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| Dated(i as u32, days(now, *offset)));
        let shown = latest_visible(items, now, LATEST_QUESTIONS_LIMIT);

        assert!(shown.len() <= LATEST_QUESTIONS_LIMIT);
        assert!(shown.iter().all(|item| item.pub_date() <= now));
        assert!(shown
            .windows(2)
            .all(|pair| pair[0].pub_date() >= pair[1].pub_date()));
    }
}
