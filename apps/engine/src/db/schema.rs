//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the practice database.
pub const SCHEMA: &str = r#"
-- Spaced repetition state, one row per learner x question
CREATE TABLE IF NOT EXISTS review_items (
    learner_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    ease_factor REAL NOT NULL DEFAULT 2.5 CHECK (ease_factor >= 1.3),
    interval_days INTEGER NOT NULL DEFAULT 1 CHECK (interval_days >= 1),
    repetitions INTEGER NOT NULL DEFAULT 0 CHECK (repetitions >= 0),
    -- day number, see date_utils::date_to_day
    next_review_date INTEGER NOT NULL,
    last_reviewed TEXT,
    consecutive_correct INTEGER NOT NULL DEFAULT 0,
    total_attempts INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (learner_id, question_id)
);

-- Mistake counters, one row per learner x question
CREATE TABLE IF NOT EXISTS error_patterns (
    learner_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    incorrect_count INTEGER NOT NULL DEFAULT 0,
    last_incorrect TEXT,
    needs_review INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (learner_id, question_id)
);

-- Externally assessed skill levels
CREATE TABLE IF NOT EXISTS skill_levels (
    learner_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    level TEXT NOT NULL,
    PRIMARY KEY (learner_id, category)
);

-- Attempt history
CREATE TABLE IF NOT EXISTS attempts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    learner_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    is_correct INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_review_items_due ON review_items(learner_id, next_review_date);
CREATE INDEX IF NOT EXISTS idx_error_patterns_flagged ON error_patterns(learner_id, needs_review);
CREATE INDEX IF NOT EXISTS idx_attempts_recent ON attempts(learner_id, created_at);
"#;
