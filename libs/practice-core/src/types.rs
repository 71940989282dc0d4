//! Core types for practice scheduling.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Composite identity of one (learner, question) pair.
///
/// All per-pair state (review scheduling, error patterns) is keyed by this
/// value, and it is the unit of read-modify-write atomicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub learner_id: i64,
    pub question_id: i64,
}

impl PairKey {
    /// Build a key, rejecting non-positive ids.
    pub fn new(learner_id: i64, question_id: i64) -> Result<Self> {
        if learner_id <= 0 {
            return Err(InputError::NonPositiveLearnerId(learner_id));
        }
        if question_id <= 0 {
            return Err(InputError::NonPositiveQuestionId(question_id));
        }
        Ok(Self {
            learner_id,
            question_id,
        })
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.learner_id, self.question_id)
    }
}

/// Spaced repetition state for one (learner, question) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub learner_id: i64,
    pub question_id: i64,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    pub consecutive_correct: u32,
    pub total_attempts: u32,
}

impl ReviewItem {
    pub fn key(&self) -> PairKey {
        PairKey {
            learner_id: self.learner_id,
            question_id: self.question_id,
        }
    }

    /// Whether the item should be reviewed on `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }
}

/// Mistake counter for one (learner, question) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub learner_id: i64,
    pub question_id: i64,
    pub category: String,
    pub incorrect_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_incorrect: Option<DateTime<Utc>>,
    pub needs_review: bool,
}

impl ErrorPattern {
    pub fn key(&self) -> PairKey {
        PairKey {
            learner_id: self.learner_id,
            question_id: self.question_id,
        }
    }
}

/// Externally assessed skill level for a learner in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for SkillLevel {
    fn default() -> Self {
        Self::Beginner
    }
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(InputError::UnknownSkillLevel(s.to_string())),
        }
    }
}

/// Question difficulty tier. Ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(InputError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// One submitted answer, as recorded by the quiz layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub learner_id: i64,
    pub question_id: i64,
    pub category: String,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
}

/// Candidate question for a practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub prompt: String,
}

/// Entry in a review session worklist, tagged by where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ReviewQueueEntry {
    DueReview(ReviewItem),
    ErrorPattern(ErrorPattern),
}

impl ReviewQueueEntry {
    pub fn question_id(&self) -> i64 {
        match self {
            Self::DueReview(item) => item.question_id,
            Self::ErrorPattern(pattern) => pattern.question_id,
        }
    }

    pub fn is_due_review(&self) -> bool {
        matches!(self, Self::DueReview(_))
    }
}
