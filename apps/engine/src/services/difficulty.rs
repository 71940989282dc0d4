//! Adaptive difficulty selection service.

use practice_core::difficulty::{accuracy, adaptive_difficulty};
use practice_core::types::{AttemptRecord, Difficulty, SkillLevel};
use serde::Serialize;

use crate::config::DEFAULT_RECENT_WINDOW;
use crate::db::LearnerRepository;
use crate::error::Result;

/// Strategy for choosing which attempts feed the accuracy estimate.
pub trait AttemptWindow: Send + Sync {
    fn attempts(
        &self,
        repo: &dyn LearnerRepository,
        learner_id: i64,
        category: &str,
    ) -> Result<Vec<AttemptRecord>>;
}

/// The learner's last `size` attempts across every category.
///
/// Category filtering happens afterwards, so a category that has seen
/// little recent traffic may contribute few or no attempts.
#[derive(Debug, Clone, Copy)]
pub struct GlobalRecentWindow {
    pub size: usize,
}

impl Default for GlobalRecentWindow {
    fn default() -> Self {
        Self {
            size: DEFAULT_RECENT_WINDOW,
        }
    }
}

impl AttemptWindow for GlobalRecentWindow {
    fn attempts(
        &self,
        repo: &dyn LearnerRepository,
        learner_id: i64,
        _category: &str,
    ) -> Result<Vec<AttemptRecord>> {
        Ok(repo.get_recent_attempts(learner_id, self.size)?)
    }
}

/// Inputs and outcome of one difficulty decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyDecision {
    pub skill_level: SkillLevel,
    pub assessed: bool,
    pub accuracy: f64,
    pub attempts_considered: usize,
    pub difficulty: Difficulty,
}

/// Picks the difficulty tier to serve a learner next.
pub struct AdaptiveDifficultySelector {
    window: Box<dyn AttemptWindow>,
}

impl Default for AdaptiveDifficultySelector {
    fn default() -> Self {
        Self::new(Box::new(GlobalRecentWindow::default()))
    }
}

impl AdaptiveDifficultySelector {
    pub fn new(window: Box<dyn AttemptWindow>) -> Self {
        Self { window }
    }

    /// Skill level and recent attempts are read independently; no snapshot
    /// is taken across the two reads.
    pub fn decide(
        &self,
        repo: &dyn LearnerRepository,
        learner_id: i64,
        category: &str,
    ) -> Result<DifficultyDecision> {
        let stored = repo.get_skill_level(learner_id, category)?;
        if stored.is_none() {
            tracing::warn!(learner_id, category, "no assessed skill level, using beginner");
        }
        let skill_level = stored.unwrap_or_default();

        let attempts = self.window.attempts(repo, learner_id, category)?;
        let attempts_considered = attempts.iter().filter(|a| a.category == category).count();
        let accuracy = accuracy(&attempts, category);
        let difficulty = adaptive_difficulty(skill_level, accuracy);

        tracing::debug!(
            learner_id,
            category,
            skill_level = skill_level.as_str(),
            accuracy,
            attempts_considered,
            difficulty = difficulty.as_str(),
            "selected difficulty"
        );

        Ok(DifficultyDecision {
            skill_level,
            assessed: stored.is_some(),
            accuracy,
            attempts_considered,
            difficulty,
        })
    }
}
