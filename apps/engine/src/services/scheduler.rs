//! Review scheduling service.

use chrono::{DateTime, NaiveDate, Utc};
use practice_core::algorithm::{sm2::Sm2, SpacedRepetitionAlgorithm};
use practice_core::types::{PairKey, ReviewItem};

use crate::db::ReviewItemRepository;
use crate::error::Result;

/// Applies the spaced repetition algorithm to stored review items.
pub struct ReviewScheduler {
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
}

impl Default for ReviewScheduler {
    fn default() -> Self {
        Self::new(Box::new(Sm2::default()))
    }
}

impl ReviewScheduler {
    pub fn new(algorithm: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        Self { algorithm }
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Create or advance the review item for `key` and persist it.
    ///
    /// Callers must hold the pair's lock; this is one read and one write.
    pub fn record_answer<R>(
        &self,
        repo: &R,
        key: PairKey,
        is_correct: bool,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem>
    where
        R: ReviewItemRepository + ?Sized,
    {
        let existing = repo.get_review_item(key)?;
        let item = self
            .algorithm
            .record(key, existing.as_ref(), is_correct, today, now);

        tracing::debug!(
            pair = %key,
            is_correct,
            created = existing.is_none(),
            ease_factor = item.ease_factor,
            interval_days = item.interval_days,
            repetitions = item.repetitions,
            "scheduled review"
        );

        repo.save_review_item(&item)?;
        Ok(item)
    }
}
