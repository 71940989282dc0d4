//! Error types for practice-core.

use thiserror::Error;

/// Result type alias using InputError.
pub type Result<T> = std::result::Result<T, InputError>;

/// Errors raised while validating caller-supplied input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("learner id must be positive, got {0}")]
    NonPositiveLearnerId(i64),

    #[error("question id must be positive, got {0}")]
    NonPositiveQuestionId(i64),

    #[error("category must not be empty")]
    EmptyCategory,

    #[error("unknown skill level: {0}")]
    UnknownSkillLevel(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

/// Validate a learner id on its own (queue and difficulty reads).
pub fn validate_learner_id(learner_id: i64) -> Result<i64> {
    if learner_id <= 0 {
        return Err(InputError::NonPositiveLearnerId(learner_id));
    }
    Ok(learner_id)
}

/// Validate and normalize a category name.
pub fn validate_category(category: &str) -> Result<&str> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyCategory);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_learner() {
        assert_eq!(validate_learner_id(0), Err(InputError::NonPositiveLearnerId(0)));
        assert_eq!(validate_learner_id(-4), Err(InputError::NonPositiveLearnerId(-4)));
        assert_eq!(validate_learner_id(9), Ok(9));
    }

    #[test]
    fn category_is_trimmed() {
        assert_eq!(validate_category("  algebra "), Ok("algebra"));
        assert_eq!(validate_category("   "), Err(InputError::EmptyCategory));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            InputError::NonPositiveQuestionId(-1).to_string(),
            "question id must be positive, got -1"
        );
        assert_eq!(
            InputError::UnknownSkillLevel("expert".to_string()).to_string(),
            "unknown skill level: expert"
        );
    }
}
