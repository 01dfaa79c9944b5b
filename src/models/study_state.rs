//! Per-card spaced repetition state.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mutable scheduling state attached to every card.
///
/// Timestamps are epoch seconds. A `previous_review_at` of `0.0` marks a card
/// that has never been reviewed; a fresh card is due immediately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyState {
    #[serde(default = "default_easiness_factor")]
    pub easiness_factor: f64,
    #[serde(default)]
    pub repetition: u32,
    #[serde(default)]
    pub interval: u32,
    #[serde(default)]
    pub previous_review_at: f64,
    #[serde(default)]
    pub next_review_at: f64,
}

fn default_easiness_factor() -> f64 {
    2.5
}

impl Default for StudyState {
    fn default() -> Self {
        Self {
            easiness_factor: default_easiness_factor(),
            repetition: 0,
            interval: 0,
            previous_review_at: 0.0,
            next_review_at: 0.0,
        }
    }
}

impl StudyState {
    /// Whether the card is due for review at `now` (epoch seconds).
    pub fn is_due(&self, now: f64) -> bool {
        self.next_review_at <= now
    }

    pub fn never_reviewed(&self) -> bool {
        self.previous_review_at == 0.0
    }

    /// The next due date as a calendar timestamp, for display and sorting.
    pub fn next_review_date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.next_review_at as i64, 0)
    }
}
