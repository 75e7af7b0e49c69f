use serde::{Deserialize, Serialize};

use crate::capabilities::GeolocationResult;
use crate::config::ScreenConfig;
use crate::geo::Coordinate;
use crate::model::{AcquisitionId, EventRecord, Filters, SortKey, TimeWindow};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub enum Event {
    #[default]
    Noop,

    // Screen lifecycle
    Configure(Box<ScreenConfig>),
    ScreenOpened,
    ScreenClosed,

    // Event collection
    RefreshRequested,
    EventsReplaced(Vec<EventRecord>),

    // Filter UI
    SearchChanged { text: String },
    CategorySelected { category: Option<String> },
    TimeWindowChanged { window: Option<TimeWindow> },
    SortKeySelected { key: SortKey },
    SortDirectionToggled,
    FiltersReplaced(Box<Filters>),

    // Location
    LocationRequested,
    PositionUpdated { coordinate: Coordinate },

    // View mode
    ShowMap,
    ShowList,
    ToggleView,

    DismissError,

    // Capability responses
    #[serde(skip)]
    EventsFetched(Box<crux_http::Result<crux_http::Response<Vec<EventRecord>>>>),
    #[serde(skip)]
    LocationResolved {
        request: AcquisitionId,
        result: Box<GeolocationResult>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Configure(_) => "configure",
            Self::ScreenOpened => "screen_opened",
            Self::ScreenClosed => "screen_closed",
            Self::RefreshRequested => "refresh_requested",
            Self::EventsReplaced(_) => "events_replaced",
            Self::SearchChanged { .. } => "search_changed",
            Self::CategorySelected { .. } => "category_selected",
            Self::TimeWindowChanged { .. } => "time_window_changed",
            Self::SortKeySelected { .. } => "sort_key_selected",
            Self::SortDirectionToggled => "sort_direction_toggled",
            Self::FiltersReplaced(_) => "filters_replaced",
            Self::LocationRequested => "location_requested",
            Self::PositionUpdated { .. } => "position_updated",
            Self::ShowMap => "show_map",
            Self::ShowList => "show_list",
            Self::ToggleView => "toggle_view",
            Self::DismissError => "dismiss_error",
            Self::EventsFetched(_) => "events_fetched",
            Self::LocationResolved { .. } => "location_resolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 64,
            "Event enum is {} bytes, box more variants",
            size
        );
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(Event::ToggleView.name(), "toggle_view");
        assert_eq!(Event::SortDirectionToggled.name(), "sort_direction_toggled");
    }

    #[test]
    fn shell_events_round_trip_through_json() {
        let event = Event::SortKeySelected {
            key: SortKey::Distance,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            Event::SortKeySelected {
                key: SortKey::Distance
            }
        ));
    }
}
