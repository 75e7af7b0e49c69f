use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};

use crate::geo::{format_distance, Coordinate};
use crate::model::{
    EventRecord, Filters, LocationStatus, Model, SortDirection, SortKey, TimeWindow,
};
use crate::selection::select;
use crate::view_mode::ViewMode;
use crate::{AppError, ErrorSeverity, TITLE_PREVIEW_LENGTH};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub title_preview: String,
    pub timestamp_ms: u64,
    pub categories: Vec<String>,
    pub distance_miles: Option<f64>,
    pub distance_text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lng: f64,
    pub markers: FeatureCollection,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterBar {
    pub search: String,
    pub category: Option<String>,
    pub window: Option<TimeWindow>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl From<&Filters> for FilterBar {
    fn from(filters: &Filters) -> Self {
        Self {
            search: filters.search.clone(),
            category: filters.category.clone(),
            window: filters.window,
            sort_key: filters.sort_key,
            direction: filters.direction,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub mode: ViewMode,
    pub location_status: LocationStatus,
    pub filters: FilterBar,
    /// Ordered, filtered events. Populated in every mode so the shell can
    /// keep list state across toggles.
    pub events: Vec<EventCard>,
    pub total_count: usize,
    pub is_empty: bool,
    pub is_fetching: bool,
    /// Present only in map mode, which implies an acquired location.
    pub map: Option<MapView>,
    pub error: Option<UserFacingError>,
}

#[must_use]
pub fn build_view_model(model: &Model) -> ViewModel {
    let selected = select(&model.events, &model.filters, &model.location);

    let origin = if model.view_mode.shows_distance_labels() {
        model.location.reference_point()
    } else {
        None
    };

    let events: Vec<EventCard> = selected.iter().map(|event| build_card(event, origin)).collect();

    let map = match (model.view_mode.mode(), model.location.reference_point()) {
        (ViewMode::Map, Some(center)) => Some(build_map(center, &selected)),
        _ => None,
    };

    ViewModel {
        mode: model.view_mode.mode(),
        location_status: model.location.status(),
        filters: FilterBar::from(&model.filters),
        is_empty: events.is_empty(),
        events,
        total_count: model.events.len(),
        is_fetching: model.is_fetching,
        map,
        error: model.active_error.as_ref().map(UserFacingError::from),
    }
}

fn build_card(event: &EventRecord, origin: Option<Coordinate>) -> EventCard {
    let distance_miles = origin
        .zip(event.coordinate())
        .map(|(from, to)| from.distance_to(to));

    EventCard {
        id: event.id.0.clone(),
        title: event.title.clone(),
        title_preview: title_preview(&event.title, TITLE_PREVIEW_LENGTH),
        timestamp_ms: event.timestamp.0,
        categories: event.categories.clone(),
        distance_miles,
        distance_text: distance_miles.map(format_distance),
    }
}

fn title_preview(title: &str, max_len: usize) -> String {
    let trimmed = title.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }
    let mut preview: String = trimmed.chars().take(max_len.saturating_sub(1)).collect();
    preview.push('…');
    preview
}

fn build_map(center: Coordinate, selected: &[&EventRecord]) -> MapView {
    let features = selected
        .iter()
        .filter_map(|event| {
            let point = event.coordinate()?;

            let mut properties = JsonObject::new();
            properties.insert("id".into(), event.id.0.clone().into());
            properties.insert("title".into(), event.title.clone().into());
            properties.insert("timestamp_ms".into(), event.timestamp.0.into());
            properties.insert(
                "distance_miles".into(),
                center.distance_to(point).into(),
            );

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![point.lng(), point.lat()]))),
                id: Some(geojson::feature::Id::String(event.id.0.clone())),
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    MapView {
        center_lat: center.lat(),
        center_lng: center.lng(),
        markers: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}
