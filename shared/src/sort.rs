//! Ordering of events by the active sort key.
//!
//! The comparator is a total preorder so it can drive a stable sort: ties
//! (including every pair when ranking is impossible) keep input order.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::geo::{distance_between, Coordinate};
use crate::model::{EventRecord, Filters, Location, SortDirection, SortKey};

/// Comparator bound to one filter set and one location snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SortComparator<'a> {
    filters: &'a Filters,
    reference: Option<Coordinate>,
}

impl<'a> SortComparator<'a> {
    #[must_use]
    pub fn new(filters: &'a Filters, location: &Location) -> Self {
        Self {
            filters,
            reference: location.reference_point(),
        }
    }

    /// Whether the active key can actually rank events right now.
    #[must_use]
    pub const fn can_rank(&self) -> bool {
        !matches!(self.filters.sort_key, SortKey::Distance) || self.reference.is_some()
    }

    #[must_use]
    pub fn compare(&self, a: &EventRecord, b: &EventRecord) -> Ordering {
        match self.filters.sort_key {
            SortKey::Time => self.directed(a.timestamp.cmp(&b.timestamp)),
            SortKey::Alphabetical => self.directed(compare_titles(&a.title, &b.title)),
            SortKey::Distance => match self.reference {
                Some(origin) => self.compare_distance(origin, a, b),
                None => Ordering::Equal,
            },
        }
    }

    /// Unlocated events sink below every located one in both directions.
    fn compare_distance(&self, origin: Coordinate, a: &EventRecord, b: &EventRecord) -> Ordering {
        let distance = |event: &EventRecord| {
            event
                .coordinate()
                .map(|point| distance_between(origin, point))
        };

        match (distance(a), distance(b)) {
            (Some(da), Some(db)) => self.directed(da.total_cmp(&db)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.filters.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Orders titles by their base letters first, ignoring case and accents,
/// then by accented form, then by the raw titles so the order stays total.
fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(title: &str) -> impl Iterator<Item = char> + '_ {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn folded(title: &str) -> impl Iterator<Item = char> + '_ {
    title.nfd().flat_map(char::to_lowercase)
}

#[must_use]
pub fn compare(a: &EventRecord, b: &EventRecord, filters: &Filters, location: &Location) -> Ordering {
    SortComparator::new(filters, location).compare(a, b)
}
