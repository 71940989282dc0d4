//! Factory functions for test data.

use chrono::NaiveDate;

use practice_core::types::{Difficulty, Question, ReviewItem};

/// Review item for learner/question with the given SM-2 state.
pub fn review_item(
    learner_id: i64,
    question_id: i64,
    ease_factor: f64,
    interval_days: u32,
    repetitions: u32,
    next_review_date: NaiveDate,
) -> ReviewItem {
    ReviewItem {
        learner_id,
        question_id,
        ease_factor,
        interval_days,
        repetitions,
        next_review_date,
        last_reviewed: None,
        consecutive_correct: repetitions,
        total_attempts: repetitions,
    }
}

pub fn question(id: i64, difficulty: Difficulty) -> Question {
    Question {
        id,
        category: "algebra".to_string(),
        difficulty,
        prompt: format!("Question {id}?"),
    }
}

/// One question of each tier, ids 1 (easy), 2 (medium) and 3 (hard).
pub fn tiered_pool() -> Vec<Question> {
    vec![
        question(1, Difficulty::Easy),
        question(2, Difficulty::Medium),
        question(3, Difficulty::Hard),
    ]
}

/// `correct` right answers followed by `total - correct` wrong ones.
pub fn answers(category: &str, total: usize, correct: usize) -> Vec<(i64, &str, bool)> {
    (0..total)
        .map(|i| (i as i64 + 1, category, i < correct))
        .collect()
}

pub fn ids(questions: &[Question]) -> Vec<i64> {
    questions.iter().map(|q| q.id).collect()
}
