//! SM-2 (SuperMemo 2) spaced repetition scheduler.
//!
//! The scheduler computes review intervals from a 0-5 recall grade:
//! - Grades 0-2 reset the repetition ladder (the interval restarts at 1 day
//!   on the next success); the easiness factor is left untouched.
//! - Grades 3-5 grow the interval progressively (1 day, 6 days, then an
//!   easiness-factor multiple) and adjust the easiness factor, which never
//!   drops below its configured floor.
//! - Grade 3 ("correct with serious difficulty") schedules the card for
//!   immediate re-review regardless of the computed interval.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StudyState;

/// Lowest easiness factor the algorithm allows.
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid grade {0}: expected a quality value in 0..=5")]
pub struct InvalidGrade(pub u8);

/// Quality of a recall on the 0-5 SM-2 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grade {
    /// Complete blackout.
    Blackout = 0,
    /// Incorrect response; the correct one remembered.
    Incorrect = 1,
    /// Incorrect response; the correct one seemed easy to recall.
    IncorrectEasy = 2,
    /// Correct response recalled with serious difficulty.
    Difficult = 3,
    /// Correct response after a hesitation.
    Hesitant = 4,
    /// Perfect response.
    Perfect = 5,
}

impl Grade {
    pub fn from_quality(quality: u8) -> Result<Self, InvalidGrade> {
        match quality {
            0 => Ok(Self::Blackout),
            1 => Ok(Self::Incorrect),
            2 => Ok(Self::IncorrectEasy),
            3 => Ok(Self::Difficult),
            4 => Ok(Self::Hesitant),
            5 => Ok(Self::Perfect),
            other => Err(InvalidGrade(other)),
        }
    }

    pub fn quality(self) -> u8 {
        self as u8
    }

    /// Grades of 3 and above count as a successful recall.
    pub fn is_pass(self) -> bool {
        self.quality() >= 3
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Blackout => "complete blackout",
            Self::Incorrect => "incorrect response; the correct one remembered",
            Self::IncorrectEasy => "incorrect response; the correct one seemed easy to recall",
            Self::Difficult => "correct response recalled with serious difficulty",
            Self::Hesitant => "correct response after a hesitation",
            Self::Perfect => "perfect response",
        };
        f.write_str(text)
    }
}

/// SM-2 grading engine. The easiness-factor floor is explicit configuration
/// rather than a process-wide constant.
#[derive(Clone, Copy, Debug)]
pub struct Scheduler {
    pub min_easiness_factor: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            min_easiness_factor: MIN_EASINESS_FACTOR,
        }
    }
}

impl Scheduler {
    /// Grades a recall and returns the next study state.
    ///
    /// `now` is epoch seconds, passed in rather than read implicitly so the
    /// function stays pure. A quality value outside 0-5 is rejected before
    /// any computation.
    pub fn grade(
        &self,
        study: &StudyState,
        quality: u8,
        now: f64,
    ) -> Result<StudyState, InvalidGrade> {
        let grade = Grade::from_quality(quality)?;
        Ok(self.apply(study, grade, now))
    }

    /// Same as [`Self::grade`] for an already-validated [`Grade`].
    pub fn apply(&self, study: &StudyState, grade: Grade, now: f64) -> StudyState {
        let mut next = study.clone();

        if grade.is_pass() {
            let q = f64::from(5 - grade.quality());
            let new_ef = next.easiness_factor + (0.1 - q * (0.08 + q * 0.02));
            next.easiness_factor = new_ef.max(self.min_easiness_factor);
            next.repetition += 1;
            next.interval = match next.repetition {
                1 => 1,
                2 => 6,
                n => (f64::from(n - 1) * next.easiness_factor).ceil() as u32,
            };
        } else {
            // Failed recall: restart the repetition ladder, EF untouched.
            next.repetition = 0;
            next.interval = 0;
        }

        // Barely passed: review again right away, whatever the formula said.
        if grade == Grade::Difficult {
            next.interval = 0;
        }

        next.previous_review_at = study.next_review_at;
        next.next_review_at = now + f64::from(next.interval) * SECONDS_PER_DAY;
        next
    }
}
