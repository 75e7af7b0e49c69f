//! Selection of the events to render.
//!
//! `select` is a pure function of its inputs: it never touches the caller's
//! collection and always returns the same sequence for the same arguments, so
//! the shell can diff successive results.

use tracing::{debug, instrument};

use crate::filter;
use crate::model::{EventRecord, Filters, Location};
use crate::sort::SortComparator;

#[instrument(
    level = "debug",
    skip_all,
    fields(total = events.len(), sort_key = filters.sort_key.as_str())
)]
#[must_use]
pub fn select<'a>(
    events: &'a [EventRecord],
    filters: &Filters,
    location: &Location,
) -> Vec<&'a EventRecord> {
    let mut selected: Vec<&EventRecord> = events
        .iter()
        .filter(|event| filter::matches(event, filters))
        .collect();

    let comparator = SortComparator::new(filters, location);
    if comparator.can_rank() {
        // `sort_by` is stable, so equal keys keep their input order.
        selected.sort_by(|a, b| comparator.compare(a, b));
    } else {
        debug!("no reference point for distance sort; keeping input order");
    }

    debug!(selected = selected.len(), "selection computed");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::model::{SortDirection, SortKey};
    use proptest::prelude::*;

    fn scenario_events() -> Vec<EventRecord> {
        vec![
            EventRecord::new("1", "Jazz Night", 100).at(40.0, -73.0),
            EventRecord::new("2", "Rock Show", 50).at(40.01, -73.01),
        ]
    }

    fn ids(selected: &[&EventRecord]) -> Vec<String> {
        selected.iter().map(|e| e.id.0.clone()).collect()
    }

    #[test]
    fn newest_first_by_time() {
        let events = scenario_events();
        let filters = Filters::sorted_by(SortKey::Time, SortDirection::Descending);

        let selected = select(&events, &filters, &Location::default());
        assert_eq!(ids(&selected), vec!["1", "2"]);
    }

    #[test]
    fn search_narrows_case_insensitively() {
        let events = scenario_events();
        let filters =
            Filters::sorted_by(SortKey::Time, SortDirection::Descending).with_search("jazz");

        let selected = select(&events, &filters, &Location::default());
        assert_eq!(ids(&selected), vec!["1"]);
    }

    #[test]
    fn nearest_first_by_distance() {
        let events = scenario_events();
        let filters = Filters::sorted_by(SortKey::Distance, SortDirection::Ascending);
        let location = Location::acquired(Coordinate::new(40.0, -73.0).unwrap());

        let selected = select(&events, &filters, &location);
        assert_eq!(ids(&selected), vec!["1", "2"]);

        let origin = location.reference_point().unwrap();
        assert_eq!(origin.distance_to(selected[0].coordinate().unwrap()), 0.0);
        assert!(origin.distance_to(selected[1].coordinate().unwrap()) > 0.0);
    }

    #[test]
    fn distance_sort_before_acquisition_keeps_input_order() {
        let mut events = scenario_events();
        events.reverse();
        let filters = Filters::sorted_by(SortKey::Distance, SortDirection::Ascending);

        let mut pending = Location::default();
        pending.begin_acquisition();

        let selected = select(&events, &filters, &pending);
        assert_eq!(ids(&selected), vec!["2", "1"]);
    }

    #[test]
    fn events_without_coordinates_trail_distance_ranking() {
        let events = vec![
            EventRecord::new("nowhere-1", "Mystery", 0),
            EventRecord::new("far", "Far", 0).at(41.0, -74.0),
            EventRecord::new("nowhere-2", "Secret", 0),
            EventRecord::new("near", "Near", 0).at(40.0, -73.0),
        ];
        let filters = Filters::sorted_by(SortKey::Distance, SortDirection::Ascending);
        let location = Location::acquired(Coordinate::new(40.0, -73.0).unwrap());

        let selected = select(&events, &filters, &location);
        assert_eq!(ids(&selected), vec!["near", "far", "nowhere-1", "nowhere-2"]);
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        let events = vec![
            EventRecord::new("z", "Zebra Parade", 0),
            EventRecord::new("e", "Éclair Tasting", 0),
        ];
        let filters = Filters::sorted_by(SortKey::Alphabetical, SortDirection::Ascending);

        let selected = select(&events, &filters, &Location::default());
        assert_eq!(ids(&selected), vec!["e", "z"]);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let events = scenario_events();
        let filters = Filters::default().with_search("opera");
        assert!(select(&events, &filters, &Location::default()).is_empty());
        assert!(select(&[], &Filters::default(), &Location::default()).is_empty());
    }

    #[test]
    fn input_is_left_untouched() {
        let events = scenario_events();
        let before = events.clone();
        let filters = Filters::sorted_by(SortKey::Time, SortDirection::Ascending);

        let _ = select(&events, &filters, &Location::default());
        assert_eq!(events, before);
    }

    fn arb_event() -> impl Strategy<Value = EventRecord> {
        (
            0u32..50,
            prop::sample::select(vec!["Jazz Night", "Rock Show", "jazz brunch", "Opera", "Art Walk"]),
            0u64..5,
            prop::option::of((39.0f64..41.0, -74.0f64..-72.0)),
        )
            .prop_map(|(id, title, ts, point)| {
                let event = EventRecord::new(id.to_string(), title, ts);
                match point {
                    Some((lat, lng)) => event.at(lat, lng),
                    None => event,
                }
            })
    }

    fn arb_filters() -> impl Strategy<Value = Filters> {
        (
            prop::sample::select(vec!["", "jazz", "SHOW", "o", "zzz"]),
            prop::sample::select(vec![SortKey::Distance, SortKey::Time, SortKey::Alphabetical]),
            prop::sample::select(vec![SortDirection::Ascending, SortDirection::Descending]),
        )
            .prop_map(|(search, key, direction)| {
                Filters::sorted_by(key, direction).with_search(search)
            })
    }

    fn arb_location() -> impl Strategy<Value = Location> {
        prop::option::of((39.0f64..41.0, -74.0f64..-72.0)).prop_map(|point| match point {
            Some((lat, lng)) => Location::acquired(Coordinate::new(lat, lng).unwrap()),
            None => Location::default(),
        })
    }

    proptest! {
        #[test]
        fn output_is_a_filtered_subset(
            events in prop::collection::vec(arb_event(), 0..20),
            filters in arb_filters(),
            location in arb_location(),
        ) {
            let selected = select(&events, &filters, &location);
            prop_assert!(selected.len() <= events.len());
            for event in &selected {
                prop_assert!(filter::matches(event, &filters));
                prop_assert!(events.iter().any(|e| std::ptr::eq(e, *event)));
            }
            let expected = events.iter().filter(|e| filter::matches(e, &filters)).count();
            prop_assert_eq!(selected.len(), expected);
        }

        #[test]
        fn selection_is_idempotent(
            events in prop::collection::vec(arb_event(), 0..20),
            filters in arb_filters(),
            location in arb_location(),
        ) {
            let first = select(&events, &filters, &location);
            let second = select(&events, &filters, &location);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn equal_keys_keep_input_order(
            events in prop::collection::vec(arb_event(), 0..20),
            direction in prop::sample::select(vec![SortDirection::Ascending, SortDirection::Descending]),
        ) {
            let filters = Filters::sorted_by(SortKey::Time, direction);
            let selected = select(&events, &filters, &Location::default());

            let index_of = |event: &EventRecord| events.iter().position(|e| std::ptr::eq(e, event));
            for pair in selected.windows(2) {
                if pair[0].timestamp == pair[1].timestamp {
                    prop_assert!(index_of(pair[0]) < index_of(pair[1]));
                }
            }
        }

        #[test]
        fn output_is_ordered_by_the_comparator(
            events in prop::collection::vec(arb_event(), 0..20),
            filters in arb_filters(),
            location in arb_location(),
        ) {
            let comparator = SortComparator::new(&filters, &location);
            let selected = select(&events, &filters, &location);
            for pair in selected.windows(2) {
                prop_assert_ne!(comparator.compare(pair[0], pair[1]), std::cmp::Ordering::Greater);
            }
        }
    }
}
