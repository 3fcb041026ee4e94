use crate::domain::PromoItem;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Selects the items to display: drops expired candidates, orders the rest
/// by display priority descending with most-recently-added winning ties,
/// and caps the result at `max_count`.
///
/// Pure: no clock reads, no I/O. `now` is supplied by the caller so every
/// surface evaluates the same instant.
pub fn select(candidates: &[PromoItem], max_count: usize, now: DateTime<Utc>) -> Vec<PromoItem> {
    if max_count == 0 {
        return Vec::new();
    }

    let today = now.date_naive();

    let mut active: Vec<PromoItem> = candidates
        .iter()
        .filter(|item| item.is_active(today))
        .cloned()
        .collect();

    // Total order: priority desc, then creation date desc, then id desc.
    // The id tail makes the ordering deterministic even for items created
    // in the same instant.
    active.sort_by(|a, b| compare(a, b));
    active.truncate(max_count);
    active
}

fn compare(a: &PromoItem, b: &PromoItem) -> Ordering {
    b.display_priority
        .cmp(&a.display_priority)
        .then_with(|| b.date.cmp(&a.date))
        .then_with(|| b.id.cmp(&a.id))
}
