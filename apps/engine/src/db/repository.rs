//! Repository pattern for database access.

use crate::db::date_utils::{date_to_day, day_to_date, format_timestamp, parse_timestamp};
use crate::db::error::DbError;
use chrono::NaiveDate;
use practice_core::types::{AttemptRecord, ErrorPattern, PairKey, ReviewItem, SkillLevel};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub type Result<T> = std::result::Result<T, DbError>;

/// Repository for spaced repetition state.
pub trait ReviewItemRepository: Send + Sync {
    fn get_review_item(&self, key: PairKey) -> Result<Option<ReviewItem>>;
    fn save_review_item(&self, item: &ReviewItem) -> Result<()>;
    /// Items with `next_review_date <= today`, oldest first.
    fn get_due_review_items(&self, learner_id: i64, today: NaiveDate) -> Result<Vec<ReviewItem>>;
    fn get_review_items(&self, learner_id: i64) -> Result<Vec<ReviewItem>>;
}

/// Repository for error pattern state.
pub trait ErrorPatternRepository: Send + Sync {
    fn get_error_pattern(&self, key: PairKey) -> Result<Option<ErrorPattern>>;
    fn save_error_pattern(&self, pattern: &ErrorPattern) -> Result<()>;
    /// Patterns with `needs_review` set, most-missed first.
    fn get_flagged_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>>;
    fn get_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>>;
}

/// Repository for learner-level inputs: skill levels and attempt history.
pub trait LearnerRepository: Send + Sync {
    fn get_skill_level(&self, learner_id: i64, category: &str) -> Result<Option<SkillLevel>>;
    fn save_skill_level(&self, learner_id: i64, category: &str, level: SkillLevel) -> Result<()>;
    /// Most recent attempts across all categories, newest first.
    fn get_recent_attempts(&self, learner_id: i64, limit: usize) -> Result<Vec<AttemptRecord>>;
    fn insert_attempt(&self, attempt: &AttemptRecord) -> Result<i64>;
}

/// Everything the practice engine needs from storage.
pub trait PracticeRepository: ReviewItemRepository + ErrorPatternRepository + LearnerRepository {}

impl<T> PracticeRepository for T where T: ReviewItemRepository + ErrorPatternRepository + LearnerRepository {}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        Self::apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create missing tables and record the schema version. Idempotent.
    fn apply_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(super::schema::SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    const REVIEW_ITEM_COLUMNS: &'static str = "learner_id, question_id, ease_factor, interval_days, repetitions,
        next_review_date, last_reviewed, consecutive_correct, total_attempts";

    const ERROR_PATTERN_COLUMNS: &'static str =
        "learner_id, question_id, category, incorrect_count, last_incorrect, needs_review";

    fn query_review_items(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<ReviewItem>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_review_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawReviewItem::into_item).collect()
    }

    fn query_error_patterns(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<ErrorPattern>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_error_pattern)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawErrorPattern::into_pattern).collect()
    }

    fn row_to_review_item(row: &rusqlite::Row) -> rusqlite::Result<RawReviewItem> {
        Ok(RawReviewItem {
            learner_id: row.get(0)?,
            question_id: row.get(1)?,
            ease_factor: row.get(2)?,
            interval_days: row.get(3)?,
            repetitions: row.get(4)?,
            next_review_date: row.get(5)?,
            last_reviewed: row.get(6)?,
            consecutive_correct: row.get(7)?,
            total_attempts: row.get(8)?,
        })
    }

    fn row_to_error_pattern(row: &rusqlite::Row) -> rusqlite::Result<RawErrorPattern> {
        Ok(RawErrorPattern {
            learner_id: row.get(0)?,
            question_id: row.get(1)?,
            category: row.get(2)?,
            incorrect_count: row.get(3)?,
            last_incorrect: row.get(4)?,
            needs_review: row.get(5)?,
        })
    }
}

/// Row as stored; dates are still day numbers and text.
struct RawReviewItem {
    learner_id: i64,
    question_id: i64,
    ease_factor: f64,
    interval_days: u32,
    repetitions: u32,
    next_review_date: i32,
    last_reviewed: Option<String>,
    consecutive_correct: u32,
    total_attempts: u32,
}

impl RawReviewItem {
    fn into_item(self) -> Result<ReviewItem> {
        Ok(ReviewItem {
            learner_id: self.learner_id,
            question_id: self.question_id,
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetitions: self.repetitions,
            next_review_date: day_to_date(self.next_review_date)?,
            last_reviewed: self.last_reviewed.as_deref().map(parse_timestamp).transpose()?,
            consecutive_correct: self.consecutive_correct,
            total_attempts: self.total_attempts,
        })
    }
}

struct RawErrorPattern {
    learner_id: i64,
    question_id: i64,
    category: String,
    incorrect_count: u32,
    last_incorrect: Option<String>,
    needs_review: bool,
}

impl RawErrorPattern {
    fn into_pattern(self) -> Result<ErrorPattern> {
        Ok(ErrorPattern {
            learner_id: self.learner_id,
            question_id: self.question_id,
            category: self.category,
            incorrect_count: self.incorrect_count,
            last_incorrect: self.last_incorrect.as_deref().map(parse_timestamp).transpose()?,
            needs_review: self.needs_review,
        })
    }
}

impl ReviewItemRepository for SqliteRepository {
    fn get_review_item(&self, key: PairKey) -> Result<Option<ReviewItem>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM review_items WHERE learner_id = ?1 AND question_id = ?2",
            Self::REVIEW_ITEM_COLUMNS
        );
        conn.query_row(
            &sql,
            params![key.learner_id, key.question_id],
            Self::row_to_review_item,
        )
        .optional()?
        .map(RawReviewItem::into_item)
        .transpose()
    }

    fn save_review_item(&self, item: &ReviewItem) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO review_items (learner_id, question_id, ease_factor, interval_days, repetitions,
                next_review_date, last_reviewed, consecutive_correct, total_attempts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (learner_id, question_id) DO UPDATE SET
                ease_factor = excluded.ease_factor,
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                next_review_date = excluded.next_review_date,
                last_reviewed = excluded.last_reviewed,
                consecutive_correct = excluded.consecutive_correct,
                total_attempts = excluded.total_attempts",
            params![
                item.learner_id,
                item.question_id,
                item.ease_factor,
                item.interval_days,
                item.repetitions,
                date_to_day(item.next_review_date),
                item.last_reviewed.map(format_timestamp),
                item.consecutive_correct,
                item.total_attempts,
            ],
        )?;
        Ok(())
    }

    fn get_due_review_items(&self, learner_id: i64, today: NaiveDate) -> Result<Vec<ReviewItem>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM review_items
             WHERE learner_id = ?1 AND next_review_date <= ?2
             ORDER BY next_review_date, question_id",
            Self::REVIEW_ITEM_COLUMNS
        );
        let today = date_to_day(today);
        Self::query_review_items(&conn, &sql, params![learner_id, today])
    }

    fn get_review_items(&self, learner_id: i64) -> Result<Vec<ReviewItem>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM review_items WHERE learner_id = ?1 ORDER BY question_id",
            Self::REVIEW_ITEM_COLUMNS
        );
        Self::query_review_items(&conn, &sql, params![learner_id])
    }
}

impl ErrorPatternRepository for SqliteRepository {
    fn get_error_pattern(&self, key: PairKey) -> Result<Option<ErrorPattern>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM error_patterns WHERE learner_id = ?1 AND question_id = ?2",
            Self::ERROR_PATTERN_COLUMNS
        );
        conn.query_row(
            &sql,
            params![key.learner_id, key.question_id],
            Self::row_to_error_pattern,
        )
        .optional()?
        .map(RawErrorPattern::into_pattern)
        .transpose()
    }

    fn save_error_pattern(&self, pattern: &ErrorPattern) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO error_patterns (learner_id, question_id, category, incorrect_count,
                last_incorrect, needs_review)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (learner_id, question_id) DO UPDATE SET
                category = excluded.category,
                incorrect_count = excluded.incorrect_count,
                last_incorrect = excluded.last_incorrect,
                needs_review = excluded.needs_review",
            params![
                pattern.learner_id,
                pattern.question_id,
                pattern.category,
                pattern.incorrect_count,
                pattern.last_incorrect.map(format_timestamp),
                pattern.needs_review,
            ],
        )?;
        Ok(())
    }

    fn get_flagged_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM error_patterns
             WHERE learner_id = ?1 AND needs_review = 1
             ORDER BY incorrect_count DESC, question_id",
            Self::ERROR_PATTERN_COLUMNS
        );
        Self::query_error_patterns(&conn, &sql, params![learner_id])
    }

    fn get_error_patterns(&self, learner_id: i64) -> Result<Vec<ErrorPattern>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM error_patterns WHERE learner_id = ?1 ORDER BY question_id",
            Self::ERROR_PATTERN_COLUMNS
        );
        Self::query_error_patterns(&conn, &sql, params![learner_id])
    }
}

impl LearnerRepository for SqliteRepository {
    fn get_skill_level(&self, learner_id: i64, category: &str) -> Result<Option<SkillLevel>> {
        let conn = self.conn()?;
        let level: Option<String> = conn
            .query_row(
                "SELECT level FROM skill_levels WHERE learner_id = ?1 AND category = ?2",
                params![learner_id, category],
                |row| row.get(0),
            )
            .optional()?;

        level
            .map(|s| {
                s.parse::<SkillLevel>()
                    .map_err(|e| DbError::InvalidData(e.to_string()))
            })
            .transpose()
    }

    fn save_skill_level(&self, learner_id: i64, category: &str, level: SkillLevel) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO skill_levels (learner_id, category, level) VALUES (?1, ?2, ?3)",
            params![learner_id, category, level.as_str()],
        )?;
        Ok(())
    }

    fn get_recent_attempts(&self, learner_id: i64, limit: usize) -> Result<Vec<AttemptRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT learner_id, question_id, category, is_correct, created_at
             FROM attempts
             WHERE learner_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![learner_id, limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(learner_id, question_id, category, is_correct, created_at)| {
                Ok(AttemptRecord {
                    learner_id,
                    question_id,
                    category,
                    is_correct,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    fn insert_attempt(&self, attempt: &AttemptRecord) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO attempts (learner_id, question_id, category, is_correct, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                attempt.learner_id,
                attempt.question_id,
                attempt.category,
                attempt.is_correct,
                format_timestamp(attempt.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
