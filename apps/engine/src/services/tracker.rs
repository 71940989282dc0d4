//! Error pattern tracking service.

use chrono::{DateTime, Utc};
use practice_core::error_pattern::{apply_answer, ErrorPatternTransition};
use practice_core::types::{ErrorPattern, PairKey};

use crate::db::ErrorPatternRepository;
use crate::error::Result;

/// Maintains the "needs extra practice" flag per pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorPatternTracker;

impl ErrorPatternTracker {
    /// Apply one answer to the pair's error pattern.
    ///
    /// Returns the stored pattern, or `None` when a correct answer arrives
    /// for a pair with no recorded mistakes (nothing is written then).
    pub fn record_answer<R>(
        &self,
        repo: &R,
        key: PairKey,
        category: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<ErrorPattern>>
    where
        R: ErrorPatternRepository + ?Sized,
    {
        let existing = repo.get_error_pattern(key)?;

        match apply_answer(existing, key, category, is_correct, now) {
            ErrorPatternTransition::Flagged(pattern) => {
                tracing::debug!(pair = %key, incorrect_count = pattern.incorrect_count, "flagged for review");
                repo.save_error_pattern(&pattern)?;
                Ok(Some(pattern))
            }
            ErrorPatternTransition::Cleared(pattern) => {
                tracing::debug!(pair = %key, incorrect_count = pattern.incorrect_count, "review flag cleared");
                repo.save_error_pattern(&pattern)?;
                Ok(Some(pattern))
            }
            ErrorPatternTransition::Untracked => Ok(None),
        }
    }
}
