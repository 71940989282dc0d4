//! Core practice scheduling library.
//!
//! Provides:
//! - SM-2 review scheduling for one (learner, question) pair
//! - Error pattern tracking ("needs extra practice" flag)
//! - Review queue merging (due reviews + flagged mistakes)
//! - Adaptive difficulty selection and band filtering
//! - Shared types (ReviewItem, ErrorPattern, SkillLevel, etc.)

pub mod algorithm;
pub mod difficulty;
pub mod error;
pub mod error_pattern;
pub mod queue;
pub mod types;

pub use algorithm::{sm2::Sm2, SpacedRepetitionAlgorithm};
pub use difficulty::{accuracy, adaptive_difficulty, filter_questions, included_bands, Tiered};
pub use error::{validate_category, validate_learner_id, InputError, Result};
pub use error_pattern::{apply_answer, ErrorPatternTransition};
pub use queue::merge_queue;
pub use types::{
    AttemptRecord, Difficulty, ErrorPattern, PairKey, Question, ReviewItem, ReviewQueueEntry,
    SkillLevel,
};
