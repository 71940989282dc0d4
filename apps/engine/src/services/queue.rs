//! Review queue building service.

use chrono::NaiveDate;
use practice_core::queue::merge_queue;
use practice_core::types::ReviewQueueEntry;

use crate::db::{ErrorPatternRepository, ReviewItemRepository};
use crate::error::Result;

/// Read-only projection of due reviews and flagged mistakes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReviewQueueBuilder;

impl ReviewQueueBuilder {
    /// Build the ordered, de-duplicated review worklist for a learner.
    pub fn build_queue<R>(
        &self,
        repo: &R,
        learner_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<ReviewQueueEntry>>
    where
        R: ReviewItemRepository + ErrorPatternRepository + ?Sized,
    {
        let due = repo.get_due_review_items(learner_id, today)?;
        let flagged = repo.get_flagged_error_patterns(learner_id)?;
        let (due_count, flagged_count) = (due.len(), flagged.len());

        let queue = merge_queue(due, flagged, today);

        tracing::info!(
            learner_id,
            due = due_count,
            flagged = flagged_count,
            queued = queue.len(),
            "built review queue"
        );
        Ok(queue)
    }
}
