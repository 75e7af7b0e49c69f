//! Event filter predicate.
//!
//! Every active filter dimension must hold for an event to be kept. An empty
//! (or whitespace-only) search string and unset dimensions match everything.

use crate::model::{EventRecord, Filters};

#[must_use]
pub fn matches(event: &EventRecord, filters: &Filters) -> bool {
    matches_search(event, &filters.search)
        && filters
            .category
            .as_deref()
            .map_or(true, |category| has_category(event, category))
        && filters
            .window
            .map_or(true, |window| window.contains(event.timestamp))
}

fn matches_search(event: &EventRecord, search: &str) -> bool {
    let needle = search.trim();
    if needle.is_empty() {
        return true;
    }

    let needle = needle.to_lowercase();
    event.title.to_lowercase().contains(&needle)
        || event
            .categories
            .iter()
            .any(|category| category.to_lowercase().contains(&needle))
}

fn has_category(event: &EventRecord, category: &str) -> bool {
    let wanted = category.trim().to_lowercase();
    wanted.is_empty()
        || event
            .categories
            .iter()
            .any(|c| c.trim().to_lowercase() == wanted)
}
