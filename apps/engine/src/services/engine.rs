//! Engine facade exposing the practice operations.

use std::sync::Arc;

use practice_core::algorithm::SpacedRepetitionAlgorithm;
use practice_core::difficulty::{filter_questions, Tiered};
use practice_core::error::{validate_category, validate_learner_id};
use practice_core::types::{
    AttemptRecord, Difficulty, ErrorPattern, PairKey, ReviewItem, ReviewQueueEntry, SkillLevel,
};
use serde::Serialize;

use super::difficulty::{AdaptiveDifficultySelector, AttemptWindow, DifficultyDecision, GlobalRecentWindow};
use super::locks::KeyLocks;
use super::queue::ReviewQueueBuilder;
use super::scheduler::ReviewScheduler;
use super::stats::{learner_stats, LearnerStats};
use super::tracker::ErrorPatternTracker;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::db::PracticeRepository;
use crate::error::Result;

/// State written by one recorded answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub review_item: ReviewItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_pattern: Option<ErrorPattern>,
}

/// Practice engine over a repository.
///
/// Every operation is synchronous. Writes for the same (learner, question)
/// pair are serialized through [`KeyLocks`]; everything else runs
/// concurrently.
pub struct PracticeEngine<R: PracticeRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
    scheduler: ReviewScheduler,
    tracker: ErrorPatternTracker,
    queue_builder: ReviewQueueBuilder,
    selector: AdaptiveDifficultySelector,
    locks: KeyLocks,
}

impl<R: PracticeRepository> PracticeEngine<R> {
    /// Engine with SM-2, the global recent-attempt window and the wall clock.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            clock: Arc::new(SystemClock::default()),
            scheduler: ReviewScheduler::default(),
            tracker: ErrorPatternTracker,
            queue_builder: ReviewQueueBuilder,
            selector: AdaptiveDifficultySelector::default(),
            locks: KeyLocks::new(),
        }
    }

    pub fn from_config(repo: R, config: &EngineConfig) -> Self {
        Self::new(repo)
            .with_clock(Arc::new(SystemClock::new(config.daily_reset_hour)))
            .with_window(Box::new(GlobalRecentWindow {
                size: config.recent_window,
            }))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_window(mut self, window: Box<dyn AttemptWindow>) -> Self {
        self.selector = AdaptiveDifficultySelector::new(window);
        self
    }

    /// Replace the scheduling algorithm (SM-2 by default).
    pub fn with_algorithm(mut self, algorithm: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        self.scheduler = ReviewScheduler::new(algorithm);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Record one submitted answer.
    ///
    /// Updates the pair's review schedule and its error pattern under the
    /// pair's lock. Input is validated before anything is read or written.
    pub fn record_answer(
        &self,
        learner_id: i64,
        question_id: i64,
        category: &str,
        is_correct: bool,
    ) -> Result<AnswerOutcome> {
        let key = PairKey::new(learner_id, question_id)?;
        let category = validate_category(category)?;
        self.record_validated(key, category, is_correct, false)
    }

    /// Record one answer and append it to the attempt history.
    ///
    /// The history row is written last, under the pair's lock, and only
    /// after the review item and error pattern writes succeeded. A failed
    /// schedule update therefore leaves no attempt behind.
    pub fn submit_attempt(
        &self,
        learner_id: i64,
        question_id: i64,
        category: &str,
        is_correct: bool,
    ) -> Result<AnswerOutcome> {
        let key = PairKey::new(learner_id, question_id)?;
        let category = validate_category(category)?;
        self.record_validated(key, category, is_correct, true)
    }

    fn record_validated(
        &self,
        key: PairKey,
        category: &str,
        is_correct: bool,
        append_history: bool,
    ) -> Result<AnswerOutcome> {
        self.locks.with_lock(key, || -> Result<AnswerOutcome> {
            let now = self.clock.now();
            let today = self.clock.today();

            let review_item = self
                .scheduler
                .record_answer(&self.repo, key, is_correct, today, now)?;
            let error_pattern = self
                .tracker
                .record_answer(&self.repo, key, category, is_correct, now)?;

            if append_history {
                self.repo.insert_attempt(&AttemptRecord {
                    learner_id: key.learner_id,
                    question_id: key.question_id,
                    category: category.to_string(),
                    is_correct,
                    created_at: now,
                })?;
            }

            tracing::info!(
                pair = %key,
                is_correct,
                algorithm = self.scheduler.algorithm_name(),
                next_review_date = %review_item.next_review_date,
                needs_review = error_pattern.as_ref().map(|p| p.needs_review),
                "recorded answer"
            );

            Ok(AnswerOutcome {
                review_item,
                error_pattern,
            })
        })
    }

    /// Ordered review worklist for today: due items, then flagged mistakes.
    pub fn build_queue(&self, learner_id: i64) -> Result<Vec<ReviewQueueEntry>> {
        let learner_id = validate_learner_id(learner_id)?;
        self.queue_builder
            .build_queue(&self.repo, learner_id, self.clock.today())
    }

    /// Difficulty tier to serve next in `category`.
    pub fn get_adaptive_difficulty(&self, learner_id: i64, category: &str) -> Result<Difficulty> {
        Ok(self.difficulty_decision(learner_id, category)?.difficulty)
    }

    /// Same as [`Self::get_adaptive_difficulty`], with the inputs that led there.
    pub fn difficulty_decision(&self, learner_id: i64, category: &str) -> Result<DifficultyDecision> {
        let learner_id = validate_learner_id(learner_id)?;
        let category = validate_category(category)?;
        self.selector.decide(&self.repo, learner_id, category)
    }

    /// Keep the candidates inside the widened band for `difficulty`.
    pub fn filter_questions<Q: Tiered>(&self, questions: Vec<Q>, difficulty: Difficulty) -> Vec<Q> {
        filter_questions(questions, difficulty)
    }

    /// Pick the tier for the learner, then filter candidates to it.
    pub fn select_questions<Q: Tiered>(
        &self,
        learner_id: i64,
        category: &str,
        questions: Vec<Q>,
    ) -> Result<Vec<Q>> {
        let difficulty = self.get_adaptive_difficulty(learner_id, category)?;
        Ok(filter_questions(questions, difficulty))
    }

    pub fn set_skill_level(&self, learner_id: i64, category: &str, level: SkillLevel) -> Result<()> {
        let learner_id = validate_learner_id(learner_id)?;
        let category = validate_category(category)?;
        self.repo.save_skill_level(learner_id, category, level)?;
        tracing::info!(learner_id, category, level = level.as_str(), "stored skill level");
        Ok(())
    }

    pub fn get_review_item(&self, learner_id: i64, question_id: i64) -> Result<Option<ReviewItem>> {
        let key = PairKey::new(learner_id, question_id)?;
        Ok(self.repo.get_review_item(key)?)
    }

    pub fn get_error_pattern(&self, learner_id: i64, question_id: i64) -> Result<Option<ErrorPattern>> {
        let key = PairKey::new(learner_id, question_id)?;
        Ok(self.repo.get_error_pattern(key)?)
    }

    pub fn learner_stats(&self, learner_id: i64) -> Result<LearnerStats> {
        let learner_id = validate_learner_id(learner_id)?;
        learner_stats(&self.repo, learner_id, self.clock.today())
    }
}
