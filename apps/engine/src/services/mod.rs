//! Practice services and the engine facade.

pub mod difficulty;
pub mod engine;
pub mod locks;
pub mod queue;
pub mod scheduler;
pub mod stats;
pub mod tracker;

pub use difficulty::{AdaptiveDifficultySelector, AttemptWindow, DifficultyDecision, GlobalRecentWindow};
pub use engine::{AnswerOutcome, PracticeEngine};
pub use locks::KeyLocks;
pub use queue::ReviewQueueBuilder;
pub use scheduler::ReviewScheduler;
pub use stats::LearnerStats;
pub use tracker::ErrorPatternTracker;
