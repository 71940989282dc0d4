//! Shared setup for engine integration tests.
//!
//! Every context runs against a fresh in-memory SQLite database and a
//! settable clock, so tests can move between study days explicitly.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use practice_engine::db::{LearnerRepository, ReviewItemRepository};
use practice_engine::{Clock, FixedClock, PracticeEngine, SqliteRepository};
use practice_core::types::{AttemptRecord, ReviewItem, SkillLevel};

/// Engine plus a handle on the clock it reads.
pub struct TestContext {
    pub engine: PracticeEngine<SqliteRepository>,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    /// Fresh database, clock pinned to 2024-03-04 09:00 UTC.
    pub fn new() -> Self {
        Self::with_engine(|engine| engine)
    }

    /// Same as [`TestContext::new`] with a hook for swapping engine parts.
    pub fn with_engine<F>(configure: F) -> Self
    where
        F: FnOnce(PracticeEngine<SqliteRepository>) -> PracticeEngine<SqliteRepository>,
    {
        let clock = Arc::new(FixedClock::at(start_time()));
        let repo = SqliteRepository::open_in_memory().expect("in-memory database");
        let engine = configure(PracticeEngine::new(repo).with_clock(clock.clone()));
        Self { engine, clock }
    }

    pub fn repo(&self) -> &SqliteRepository {
        self.engine.repository()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }

    pub fn seed_review_item(&self, item: &ReviewItem) {
        self.repo().save_review_item(item).expect("seed review item");
    }

    pub fn seed_skill_level(&self, learner_id: i64, category: &str, level: SkillLevel) {
        self.repo()
            .save_skill_level(learner_id, category, level)
            .expect("seed skill level");
    }

    /// Insert attempts one second apart, oldest first.
    pub fn seed_attempts(&self, attempts: &[(i64, &str, bool)], learner_id: i64) {
        let base = self.now() - Duration::seconds(attempts.len() as i64 + 1);
        for (i, (question_id, category, is_correct)) in attempts.iter().enumerate() {
            self.repo()
                .insert_attempt(&AttemptRecord {
                    learner_id,
                    question_id: *question_id,
                    category: category.to_string(),
                    is_correct: *is_correct,
                    created_at: base + Duration::seconds(i as i64),
                })
                .expect("seed attempt");
        }
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
}
