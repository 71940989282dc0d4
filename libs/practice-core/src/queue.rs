//! Review queue composition.

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::NaiveDate;

use crate::types::{ErrorPattern, ReviewItem, ReviewQueueEntry};

/// Merge due review items and flagged error patterns into one worklist.
///
/// Due items come first, oldest `next_review_date` first. Flagged patterns
/// follow, most-missed first, skipping any question already present as a
/// due item. Sorting is stable, so ties keep the order they arrived in.
pub fn merge_queue(
    due: Vec<ReviewItem>,
    flagged: Vec<ErrorPattern>,
    today: NaiveDate,
) -> Vec<ReviewQueueEntry> {
    let mut due: Vec<ReviewItem> = due.into_iter().filter(|i| i.is_due(today)).collect();
    due.sort_by_key(|i| i.next_review_date);

    let mut flagged: Vec<ErrorPattern> = flagged.into_iter().filter(|p| p.needs_review).collect();
    flagged.sort_by_key(|p| Reverse(p.incorrect_count));

    let mut seen: HashSet<i64> = HashSet::with_capacity(due.len() + flagged.len());
    let mut queue = Vec::with_capacity(due.len() + flagged.len());

    for item in due {
        if seen.insert(item.question_id) {
            queue.push(ReviewQueueEntry::DueReview(item));
        }
    }
    for pattern in flagged {
        if seen.insert(pattern.question_id) {
            queue.push(ReviewQueueEntry::ErrorPattern(pattern));
        }
    }

    queue
}
