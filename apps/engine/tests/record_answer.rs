//! Answer recording: review schedule and error pattern updates.

mod common;

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;

use common::fixtures;
use common::{start_time, TestContext};
use practice_core::algorithm::sm2::Sm2;
use practice_core::types::{AttemptRecord, ErrorPattern, PairKey, ReviewItem, SkillLevel};
use practice_engine::db::{
    DbError, ErrorPatternRepository, LearnerRepository, MemoryRepository, ReviewItemRepository,
};
use practice_engine::{EngineError, FixedClock, PracticeEngine};

#[test]
fn first_incorrect_answer_creates_item_without_update_formula() {
    let ctx = TestContext::new();

    let outcome = ctx.engine.record_answer(1, 100, "algebra", false).unwrap();

    let item = outcome.review_item;
    assert_eq!(item.ease_factor, 2.5);
    assert_eq!(item.interval_days, 1);
    assert_eq!(item.repetitions, 0);
    assert_eq!(item.total_attempts, 1);
    assert_eq!(item.consecutive_correct, 0);
    assert_eq!(item.next_review_date, ctx.today() + Duration::days(1));
    assert_eq!(item.last_reviewed, Some(ctx.now()));

    let pattern = outcome.error_pattern.expect("mistake is tracked");
    assert_eq!(pattern.incorrect_count, 1);
    assert!(pattern.needs_review);
    assert_eq!(pattern.category, "algebra");
}

#[test]
fn first_correct_answer_starts_at_one_repetition() {
    let ctx = TestContext::new();

    let outcome = ctx.engine.record_answer(1, 100, "algebra", true).unwrap();

    assert_eq!(outcome.review_item.repetitions, 1);
    assert_eq!(outcome.review_item.ease_factor, 2.5);
    assert_eq!(outcome.review_item.interval_days, 1);
    assert_eq!(outcome.error_pattern, None);
    assert_eq!(ctx.repo().get_error_pattern(outcome.review_item.key()).unwrap(), None);
}

#[test]
fn correct_answer_on_mature_item_multiplies_interval() {
    let ctx = TestContext::new();
    ctx.seed_review_item(&fixtures::review_item(1, 7, 2.5, 6, 2, ctx.today()));

    let item = ctx.engine.record_answer(1, 7, "algebra", true).unwrap().review_item;

    assert_eq!(item.ease_factor, 2.5);
    assert_eq!(item.repetitions, 3);
    assert_eq!(item.interval_days, 15);
    assert_eq!(item.next_review_date, ctx.today() + Duration::days(15));
    assert_eq!(item.total_attempts, 3);
}

#[test]
fn incorrect_answer_resets_progress_and_lowers_ease() {
    let ctx = TestContext::new();
    ctx.seed_review_item(&fixtures::review_item(1, 7, 2.5, 15, 3, ctx.today()));

    let item = ctx.engine.record_answer(1, 7, "algebra", false).unwrap().review_item;

    assert!((item.ease_factor - 1.96).abs() < 1e-9);
    assert_eq!(item.repetitions, 0);
    assert_eq!(item.interval_days, 1);
    assert_eq!(item.consecutive_correct, 0);
}

#[test]
fn ease_never_drops_below_floor() {
    let ctx = TestContext::new();
    for _ in 0..10 {
        ctx.engine.record_answer(2, 9, "history", false).unwrap();
        ctx.advance_days(1);
    }

    let item = ctx.engine.get_review_item(2, 9).unwrap().unwrap();
    assert!(item.ease_factor >= 1.3);
    assert!((item.ease_factor - 1.3).abs() < 1e-9);
    assert_eq!(item.total_attempts, 10);
}

#[test]
fn correct_answer_clears_flag_but_keeps_count() {
    let ctx = TestContext::new();
    ctx.engine.record_answer(1, 5, "algebra", false).unwrap();
    ctx.engine.record_answer(1, 5, "algebra", false).unwrap();

    let cleared = ctx
        .engine
        .record_answer(1, 5, "algebra", true)
        .unwrap()
        .error_pattern
        .expect("existing pattern is kept");
    assert_eq!(cleared.incorrect_count, 2);
    assert!(!cleared.needs_review);

    let again = ctx
        .engine
        .record_answer(1, 5, "algebra", false)
        .unwrap()
        .error_pattern
        .unwrap();
    assert_eq!(again.incorrect_count, 3);
    assert!(again.needs_review);
}

#[test]
fn category_is_trimmed_before_storage() {
    let ctx = TestContext::new();

    let pattern = ctx
        .engine
        .record_answer(1, 5, "  algebra ", false)
        .unwrap()
        .error_pattern
        .unwrap();

    assert_eq!(pattern.category, "algebra");
}

#[test]
fn invalid_input_is_rejected_before_any_write() {
    let ctx = TestContext::new();

    for (learner, question, category) in [(0, 1, "algebra"), (1, -4, "algebra"), (1, 1, "   ")] {
        let err = ctx
            .engine
            .record_answer(learner, question, category, false)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)), "got {err:?}");
    }

    assert!(ctx.repo().get_review_items(1).unwrap().is_empty());
    assert!(ctx.repo().get_error_patterns(1).unwrap().is_empty());
}

#[test]
fn submit_attempt_appends_history() {
    let ctx = TestContext::new();

    ctx.engine.submit_attempt(3, 11, "geometry", true).unwrap();
    ctx.engine.submit_attempt(3, 12, "geometry", false).unwrap();

    let attempts = ctx.repo().get_recent_attempts(3, 10).unwrap();
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().all(|a| a.category == "geometry"));
    assert_eq!(ctx.engine.get_review_item(3, 11).unwrap().unwrap().repetitions, 1);
    assert!(ctx.engine.get_error_pattern(3, 12).unwrap().unwrap().needs_review);
}

#[test]
fn submit_attempt_with_invalid_input_records_nothing() {
    let ctx = TestContext::new();

    assert!(ctx.engine.submit_attempt(3, 11, "", true).is_err());
    assert!(ctx.repo().get_recent_attempts(3, 10).unwrap().is_empty());
}

#[test]
fn outcome_serializes_without_missing_pattern() {
    let ctx = TestContext::new();

    let outcome = ctx.engine.record_answer(1, 1, "algebra", true).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["review_item"]["question_id"], 1);
    assert!(json.get("error_pattern").is_none());
}

#[test]
fn long_correct_streak_keeps_a_valid_schedule() {
    let ctx = TestContext::new();
    let limit = Sm2::default().maximum_interval;

    for _ in 0..35 {
        let item = ctx.engine.record_answer(1, 1, "algebra", true).unwrap().review_item;
        assert!(item.interval_days >= 1 && item.interval_days <= limit);
        assert!(item.next_review_date > ctx.today());
    }

    let item = ctx.engine.get_review_item(1, 1).unwrap().unwrap();
    assert_eq!(item.repetitions, 35);
    assert_eq!(item.interval_days, limit);
    assert!(ctx.engine.build_queue(1).unwrap().is_empty());
    assert!(ctx.repo().get_due_review_items(1, ctx.today()).unwrap().is_empty());
}

#[test]
fn replacement_algorithm_is_used_for_updates() {
    let ctx = TestContext::with_engine(|engine| {
        engine.with_algorithm(Box::new(Sm2 {
            maximum_interval: 10,
            ..Sm2::default()
        }))
    });

    for _ in 0..4 {
        ctx.engine.record_answer(1, 2, "algebra", true).unwrap();
    }

    let item = ctx.engine.get_review_item(1, 2).unwrap().unwrap();
    assert_eq!(item.interval_days, 10);
    assert_eq!(item.next_review_date, ctx.today() + Duration::days(10));
}

#[test]
fn submitted_attempt_shares_the_answer_timestamp() {
    let ctx = TestContext::new();

    let outcome = ctx.engine.submit_attempt(3, 11, "geometry", false).unwrap();

    let attempts = ctx.repo().get_recent_attempts(3, 10).unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(Some(attempts[0].created_at), outcome.review_item.last_reviewed);
}

/// Repository whose review-item writes always fail.
#[derive(Default)]
struct BrokenScheduleStore {
    inner: MemoryRepository,
}

impl ReviewItemRepository for BrokenScheduleStore {
    fn get_review_item(&self, key: PairKey) -> Result<Option<ReviewItem>, DbError> {
        self.inner.get_review_item(key)
    }

    fn save_review_item(&self, _item: &ReviewItem) -> Result<(), DbError> {
        Err(DbError::InvalidData("disk full".to_string()))
    }

    fn get_due_review_items(&self, learner_id: i64, today: NaiveDate) -> Result<Vec<ReviewItem>, DbError> {
        self.inner.get_due_review_items(learner_id, today)
    }

    fn get_review_items(&self, learner_id: i64) -> Result<Vec<ReviewItem>, DbError> {
        self.inner.get_review_items(learner_id)
    }
}

impl ErrorPatternRepository for BrokenScheduleStore {
    fn get_error_pattern(&self, key: PairKey) -> Result<Option<ErrorPattern>, DbError> {
        self.inner.get_error_pattern(key)
    }

    fn save_error_pattern(&self, pattern: &ErrorPattern) -> Result<(), DbError> {
        self.inner.save_error_pattern(pattern)
    }

    fn get_flagged_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>, DbError> {
        self.inner.get_flagged_error_patterns(learner_id)
    }

    fn get_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>, DbError> {
        self.inner.get_error_patterns(learner_id)
    }
}

impl LearnerRepository for BrokenScheduleStore {
    fn get_skill_level(&self, learner_id: i64, category: &str) -> Result<Option<SkillLevel>, DbError> {
        self.inner.get_skill_level(learner_id, category)
    }

    fn save_skill_level(&self, learner_id: i64, category: &str, level: SkillLevel) -> Result<(), DbError> {
        self.inner.save_skill_level(learner_id, category, level)
    }

    fn get_recent_attempts(&self, learner_id: i64, limit: usize) -> Result<Vec<AttemptRecord>, DbError> {
        self.inner.get_recent_attempts(learner_id, limit)
    }

    fn insert_attempt(&self, attempt: &AttemptRecord) -> Result<i64, DbError> {
        self.inner.insert_attempt(attempt)
    }
}

#[test]
fn failed_schedule_write_leaves_no_history() {
    let engine = PracticeEngine::new(BrokenScheduleStore::default())
        .with_clock(Arc::new(FixedClock::at(start_time())));

    let err = engine.submit_attempt(5, 6, "algebra", true).unwrap_err();

    assert!(matches!(err, EngineError::StorageUnavailable(_)), "got {err:?}");
    assert!(engine.repository().get_recent_attempts(5, 10).unwrap().is_empty());
    assert_eq!(engine.get_error_pattern(5, 6).unwrap(), None);
}
