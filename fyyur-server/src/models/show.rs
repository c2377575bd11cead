use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// A show joined with the artist on the bill, as embedded in a venue page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShowWithArtist {
    pub show_id: i64,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show joined with the venue hosting it, as embedded in an artist page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShowWithVenue {
    pub show_id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

impl Scheduled for ShowWithArtist {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for ShowWithVenue {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// Splits shows into (past, upcoming) relative to `now`.
///
/// A show starting at exactly `now` belongs to neither bucket.
pub fn partition_by_time<T: Scheduled>(shows: Vec<T>, now: DateTime<Utc>) -> (Vec<T>, Vec<T>) {
    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for show in shows {
        if show.start_time() < now {
            past.push(show);
        } else if show.start_time() > now {
            upcoming.push(show);
        }
    }
    (past, upcoming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    struct Slot(DateTime<Utc>);

    impl Scheduled for Slot {
        fn start_time(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn earlier_shows_are_past_and_later_shows_are_upcoming() {
        let now = Utc::now();
        let shows = vec![
            Slot(now - Duration::hours(2)),
            Slot(now + Duration::hours(3)),
            Slot(now - Duration::days(1)),
        ];

        let (past, upcoming) = partition_by_time(shows, now);
        assert_eq!(past.len(), 2);
        assert_eq!(upcoming.len(), 1);
    }

    #[test]
    fn show_starting_exactly_now_is_in_neither_bucket() {
        let now = Utc::now();
        let (past, upcoming) = partition_by_time(vec![Slot(now)], now);
        assert!(past.is_empty());
        assert!(upcoming.is_empty());
    }

    #[test]
    fn no_shows_yields_empty_buckets() {
        let (past, upcoming) = partition_by_time(Vec::<Slot>::new(), Utc::now());
        assert!(past.is_empty());
        assert!(upcoming.is_empty());
    }
}
