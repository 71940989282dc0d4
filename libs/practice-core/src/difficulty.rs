//! Adaptive difficulty selection.
//!
//! Accuracy over a window of recent attempts, combined with the learner's
//! assessed skill level, picks a target tier. Candidate questions are then
//! filtered to that tier plus its neighbours so the learner still sees a
//! gradient instead of a single flat band.

use crate::types::{AttemptRecord, Difficulty, Question, SkillLevel};

/// Anything that carries a difficulty tier.
pub trait Tiered {
    fn difficulty(&self) -> Difficulty;
}

impl Tiered for Question {
    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl Tiered for Difficulty {
    fn difficulty(&self) -> Difficulty {
        *self
    }
}

/// Percentage (0-100) of correct attempts in `category`.
///
/// Attempts from other categories are ignored. Returns 0 when no attempt
/// matches.
pub fn accuracy(attempts: &[AttemptRecord], category: &str) -> f64 {
    let (total, correct) = attempts
        .iter()
        .filter(|a| a.category == category)
        .fold((0u32, 0u32), |(total, correct), a| {
            (total + 1, correct + u32::from(a.is_correct))
        });

    if total == 0 {
        return 0.0;
    }
    100.0 * f64::from(correct) / f64::from(total)
}

/// Pick the difficulty tier to serve next.
pub fn adaptive_difficulty(skill_level: SkillLevel, accuracy: f64) -> Difficulty {
    match skill_level {
        SkillLevel::Beginner => {
            if accuracy >= 80.0 {
                Difficulty::Medium
            } else {
                Difficulty::Easy
            }
        }
        SkillLevel::Intermediate => {
            if accuracy >= 85.0 {
                Difficulty::Hard
            } else if accuracy < 60.0 {
                Difficulty::Easy
            } else {
                Difficulty::Medium
            }
        }
        SkillLevel::Advanced => {
            if accuracy < 70.0 {
                Difficulty::Medium
            } else {
                Difficulty::Hard
            }
        }
    }
}

/// Tiers served for a target difficulty.
pub fn included_bands(target: Difficulty) -> &'static [Difficulty] {
    match target {
        Difficulty::Easy => &[Difficulty::Easy, Difficulty::Medium],
        Difficulty::Medium => &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
        Difficulty::Hard => &[Difficulty::Medium, Difficulty::Hard],
    }
}

/// Keep the questions whose tier falls inside the widened band of `target`.
pub fn filter_questions<Q: Tiered>(questions: Vec<Q>, target: Difficulty) -> Vec<Q> {
    let bands = included_bands(target);
    questions
        .into_iter()
        .filter(|q| bands.contains(&q.difficulty()))
        .collect()
}
