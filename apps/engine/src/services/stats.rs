//! Learner summary statistics.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{ErrorPatternRepository, ReviewItemRepository};
use crate::error::Result;

/// Read-only summary of a learner's practice state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnerStats {
    pub tracked_items: usize,
    pub due_today: usize,
    pub flagged_for_review: usize,
    pub total_incorrect: u64,
    pub average_ease: f64,
    pub average_interval: f64,
}

pub fn learner_stats<R>(repo: &R, learner_id: i64, today: NaiveDate) -> Result<LearnerStats>
where
    R: ReviewItemRepository + ErrorPatternRepository + ?Sized,
{
    let items = repo.get_review_items(learner_id)?;
    let patterns = repo.get_error_patterns(learner_id)?;

    let tracked_items = items.len();
    let (average_ease, average_interval) = if tracked_items == 0 {
        (0.0, 0.0)
    } else {
        let n = tracked_items as f64;
        (
            items.iter().map(|i| i.ease_factor).sum::<f64>() / n,
            items.iter().map(|i| f64::from(i.interval_days)).sum::<f64>() / n,
        )
    };

    Ok(LearnerStats {
        tracked_items,
        due_today: items.iter().filter(|i| i.is_due(today)).count(),
        flagged_for_review: patterns.iter().filter(|p| p.needs_review).count(),
        total_incorrect: patterns.iter().map(|p| u64::from(p.incorrect_count)).sum(),
        average_ease,
        average_interval,
    })
}
