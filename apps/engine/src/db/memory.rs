//! In-memory repository keyed by `PairKey`.
//!
//! Useful for embedding the engine without a database file and for tests.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use practice_core::types::{AttemptRecord, ErrorPattern, PairKey, ReviewItem, SkillLevel};

use super::error::DbError;
use super::repository::{ErrorPatternRepository, LearnerRepository, Result, ReviewItemRepository};

#[derive(Debug, Default)]
struct Tables {
    review_items: HashMap<PairKey, ReviewItem>,
    error_patterns: HashMap<PairKey, ErrorPattern>,
    skill_levels: HashMap<(i64, String), SkillLevel>,
    attempts: Vec<AttemptRecord>,
}

/// Repository that keeps every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| DbError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| DbError::LockPoisoned)
    }
}

impl ReviewItemRepository for MemoryRepository {
    fn get_review_item(&self, key: PairKey) -> Result<Option<ReviewItem>> {
        Ok(self.read()?.review_items.get(&key).cloned())
    }

    fn save_review_item(&self, item: &ReviewItem) -> Result<()> {
        self.write()?.review_items.insert(item.key(), item.clone());
        Ok(())
    }

    fn get_due_review_items(&self, learner_id: i64, today: NaiveDate) -> Result<Vec<ReviewItem>> {
        let mut due: Vec<ReviewItem> = self
            .read()?
            .review_items
            .values()
            .filter(|i| i.learner_id == learner_id && i.is_due(today))
            .cloned()
            .collect();
        due.sort_by_key(|i| (i.next_review_date, i.question_id));
        Ok(due)
    }

    fn get_review_items(&self, learner_id: i64) -> Result<Vec<ReviewItem>> {
        let mut items: Vec<ReviewItem> = self
            .read()?
            .review_items
            .values()
            .filter(|i| i.learner_id == learner_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.question_id);
        Ok(items)
    }
}

impl ErrorPatternRepository for MemoryRepository {
    fn get_error_pattern(&self, key: PairKey) -> Result<Option<ErrorPattern>> {
        Ok(self.read()?.error_patterns.get(&key).cloned())
    }

    fn save_error_pattern(&self, pattern: &ErrorPattern) -> Result<()> {
        self.write()?
            .error_patterns
            .insert(pattern.key(), pattern.clone());
        Ok(())
    }

    fn get_flagged_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>> {
        let mut flagged: Vec<ErrorPattern> = self
            .read()?
            .error_patterns
            .values()
            .filter(|p| p.learner_id == learner_id && p.needs_review)
            .cloned()
            .collect();
        flagged.sort_by(|a, b| {
            b.incorrect_count
                .cmp(&a.incorrect_count)
                .then(a.question_id.cmp(&b.question_id))
        });
        Ok(flagged)
    }

    fn get_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>> {
        let mut patterns: Vec<ErrorPattern> = self
            .read()?
            .error_patterns
            .values()
            .filter(|p| p.learner_id == learner_id)
            .cloned()
            .collect();
        patterns.sort_by_key(|p| p.question_id);
        Ok(patterns)
    }
}

impl LearnerRepository for MemoryRepository {
    fn get_skill_level(&self, learner_id: i64, category: &str) -> Result<Option<SkillLevel>> {
        Ok(self
            .read()?
            .skill_levels
            .get(&(learner_id, category.to_string()))
            .copied())
    }

    fn save_skill_level(&self, learner_id: i64, category: &str, level: SkillLevel) -> Result<()> {
        self.write()?
            .skill_levels
            .insert((learner_id, category.to_string()), level);
        Ok(())
    }

    fn get_recent_attempts(&self, learner_id: i64, limit: usize) -> Result<Vec<AttemptRecord>> {
        let tables = self.read()?;
        // attempts are appended in arrival order; newest wins ties on created_at
        let mut recent: Vec<(usize, &AttemptRecord)> = tables
            .attempts
            .iter()
            .enumerate()
            .filter(|(_, a)| a.learner_id == learner_id)
            .collect();
        recent.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(recent
            .into_iter()
            .take(limit)
            .map(|(_, a)| a.clone())
            .collect())
    }

    fn insert_attempt(&self, attempt: &AttemptRecord) -> Result<i64> {
        let mut tables = self.write()?;
        tables.attempts.push(attempt.clone());
        Ok(tables.attempts.len() as i64)
    }
}
