//! Error pattern tracking.
//!
//! A per-pair "needs extra practice" flag driven by raw correct/incorrect
//! answers, independent of the SM-2 interval math. The two branches are
//! deliberately asymmetric: a mistake increments the counter and raises
//! the flag, a correct answer lowers the flag but keeps the counter.

use chrono::{DateTime, Utc};

use crate::types::{ErrorPattern, PairKey};

/// Outcome of applying one answer to a pair's error pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPatternTransition {
    /// Incorrect answer: pattern created or incremented, flag raised.
    Flagged(ErrorPattern),
    /// Correct answer on an existing pattern: flag cleared, count kept.
    Cleared(ErrorPattern),
    /// Correct answer with no prior mistakes. Nothing is stored.
    Untracked,
}

impl ErrorPatternTransition {
    /// The pattern to persist, if any.
    pub fn pattern(&self) -> Option<&ErrorPattern> {
        match self {
            Self::Flagged(p) | Self::Cleared(p) => Some(p),
            Self::Untracked => None,
        }
    }

    pub fn into_pattern(self) -> Option<ErrorPattern> {
        match self {
            Self::Flagged(p) | Self::Cleared(p) => Some(p),
            Self::Untracked => None,
        }
    }
}

/// Apply one answer to the existing pattern for `key` (if any).
pub fn apply_answer(
    existing: Option<ErrorPattern>,
    key: PairKey,
    category: &str,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ErrorPatternTransition {
    if is_correct {
        on_correct(existing)
    } else {
        on_incorrect(existing, key, category, now)
    }
}

fn on_incorrect(
    existing: Option<ErrorPattern>,
    key: PairKey,
    category: &str,
    now: DateTime<Utc>,
) -> ErrorPatternTransition {
    let pattern = match existing {
        Some(mut pattern) => {
            pattern.incorrect_count += 1;
            pattern.last_incorrect = Some(now);
            pattern.needs_review = true;
            pattern
        }
        None => ErrorPattern {
            learner_id: key.learner_id,
            question_id: key.question_id,
            category: category.to_string(),
            incorrect_count: 1,
            last_incorrect: Some(now),
            needs_review: true,
        },
    };
    ErrorPatternTransition::Flagged(pattern)
}

fn on_correct(existing: Option<ErrorPattern>) -> ErrorPatternTransition {
    match existing {
        // incorrect_count is history; only the flag responds to a correct answer
        Some(mut pattern) => {
            pattern.needs_review = false;
            ErrorPatternTransition::Cleared(pattern)
        }
        None => ErrorPatternTransition::Untracked,
    }
}
