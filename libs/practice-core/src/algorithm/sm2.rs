//! SM-2 spaced repetition algorithm.
//!
//! SuperMemo 2 with the answer collapsed into two quality buckets:
//! 4 for a correct answer and 1 for an incorrect one.

use super::SpacedRepetitionAlgorithm;
use crate::types::{PairKey, ReviewItem};
use chrono::{DateTime, Days, NaiveDate, Utc};

/// Quality values below this count as a failed recall.
const PASSING_QUALITY: u8 = 3;

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub correct_quality: u8,
    pub incorrect_quality: u8,
    /// Upper bound on `interval_days`.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            correct_quality: 4,
            incorrect_quality: 1,
            maximum_interval: 36_500,
        }
    }
}

impl Sm2 {
    /// Map a binary answer onto the SM-2 quality scale.
    pub fn quality(&self, is_correct: bool) -> u8 {
        if is_correct {
            self.correct_quality
        } else {
            self.incorrect_quality
        }
    }

    /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at `minimum_ease`.
    pub fn next_ease(&self, ease_factor: f64, quality: u8) -> f64 {
        let miss = 5.0 - f64::from(quality);
        let new_ease = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
        if new_ease < self.minimum_ease {
            self.minimum_ease
        } else {
            new_ease
        }
    }

    /// Returns `(repetitions, interval_days)` for the next review.
    ///
    /// The growth step multiplies the previous interval by the freshly
    /// computed ease factor.
    fn next_interval(&self, item: &ReviewItem, quality: u8, new_ease: f64) -> (u32, u32) {
        if quality < PASSING_QUALITY {
            return (0, 1);
        }
        let repetitions = item.repetitions + 1;
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            _ => {
                let grown = (f64::from(item.interval_days) * new_ease).round();
                if grown >= f64::from(self.maximum_interval) {
                    self.maximum_interval
                } else {
                    grown as u32
                }
            }
        };
        (repetitions, interval.clamp(1, self.maximum_interval.max(1)))
    }
}

/// `today + days`, saturating at the last representable date.
fn due_after(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_item(
        &self,
        key: PairKey,
        is_correct: bool,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ReviewItem {
        let first = u32::from(is_correct);
        ReviewItem {
            learner_id: key.learner_id,
            question_id: key.question_id,
            ease_factor: self.initial_ease,
            interval_days: 1,
            repetitions: first,
            next_review_date: due_after(today, 1),
            last_reviewed: Some(now),
            consecutive_correct: first,
            total_attempts: 1,
        }
    }

    fn schedule(
        &self,
        item: &ReviewItem,
        is_correct: bool,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ReviewItem {
        let quality = self.quality(is_correct);
        let ease_factor = self.next_ease(item.ease_factor, quality);
        let (repetitions, interval_days) = self.next_interval(item, quality, ease_factor);

        ReviewItem {
            learner_id: item.learner_id,
            question_id: item.question_id,
            ease_factor,
            interval_days,
            repetitions,
            next_review_date: due_after(today, interval_days),
            last_reviewed: Some(now),
            consecutive_correct: if is_correct {
                item.consecutive_correct + 1
            } else {
                0
            },
            total_attempts: item.total_attempts + 1,
        }
    }
}
