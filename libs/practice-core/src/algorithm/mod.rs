//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{PairKey, ReviewItem};
use chrono::{DateTime, NaiveDate, Utc};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// State for a pair's first recorded answer.
    fn initial_item(
        &self,
        key: PairKey,
        is_correct: bool,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ReviewItem;

    /// Calculate the next state after answering an existing item.
    fn schedule(
        &self,
        item: &ReviewItem,
        is_correct: bool,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ReviewItem;

    /// Create or advance the state for `key` depending on whether one exists.
    fn record(
        &self,
        key: PairKey,
        existing: Option<&ReviewItem>,
        is_correct: bool,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ReviewItem {
        match existing {
            Some(item) => self.schedule(item, is_correct, today, now),
            None => self.initial_item(key, is_correct, today, now),
        }
    }
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
