use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScreenConfig;
use crate::geo::Coordinate;
use crate::view_mode::ViewModeController;
use crate::AppError;

// --- Typed IDs ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "RawEventId")]
pub struct EventId(pub String);

/// Event sources hand out either numeric or string ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEventId {
    Number(u64),
    Text(String),
}

impl From<RawEventId> for EventId {
    fn from(raw: RawEventId) -> Self {
        match raw {
            RawEventId::Number(n) => Self(n.to_string()),
            RawEventId::Text(s) => Self(s),
        }
    }
}

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit timestamp unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct UnixTimeMs(pub u64);

// --- Event records ---

/// One listed event as delivered by the event source. Never mutated by the core.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(alias = "ts", alias = "time")]
    pub timestamp: UnixTimeMs,
    #[serde(default, alias = "tags")]
    pub categories: Vec<String>,
}

impl EventRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, timestamp: u64) -> Self {
        Self {
            id: EventId::new(id),
            title: title.into(),
            latitude: None,
            longitude: None,
            timestamp: UnixTimeMs(timestamp),
            categories: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    #[must_use]
    pub fn tagged(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// `None` when either coordinate is missing or out of range.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.latitude?, self.longitude?).ok()
    }
}

// --- Filters ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Distance,
    #[default]
    Time,
    Alphabetical,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Time => "time",
            Self::Alphabetical => "alphabetical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Inclusive time range; an absent bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TimeWindow {
    pub from: Option<UnixTimeMs>,
    pub to: Option<UnixTimeMs>,
}

impl TimeWindow {
    #[must_use]
    pub fn contains(&self, ts: UnixTimeMs) -> bool {
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts <= to)
    }
}

/// Active filter and sort criteria. Replaced wholesale on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Filters {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub window: Option<TimeWindow>,
    #[serde(default)]
    pub sort_key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Filters {
    #[must_use]
    pub fn sorted_by(sort_key: SortKey, direction: SortDirection) -> Self {
        Self {
            sort_key,
            direction,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }
}

// --- Location ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    #[default]
    Unrequested,
    Pending,
    Acquired,
    Failed,
}

/// The session's single device location.
///
/// Moves unrequested -> pending -> acquired | failed. A failed location may be
/// re-requested; an acquired one stays acquired and only has its coordinate
/// refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    status: LocationStatus,
    coordinate: Option<Coordinate>,
    accuracy_m: Option<f64>,
}

impl Location {
    #[must_use]
    pub fn acquired(coordinate: Coordinate) -> Self {
        Self {
            status: LocationStatus::Acquired,
            coordinate: Some(coordinate),
            accuracy_m: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> LocationStatus {
        self.status
    }

    #[must_use]
    pub const fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    #[must_use]
    pub const fn accuracy_m(&self) -> Option<f64> {
        self.accuracy_m
    }

    #[must_use]
    pub const fn is_acquired(&self) -> bool {
        matches!(self.status, LocationStatus::Acquired)
    }

    /// The point distances are measured from; only present once acquired.
    #[must_use]
    pub fn reference_point(&self) -> Option<Coordinate> {
        if self.is_acquired() {
            self.coordinate
        } else {
            None
        }
    }

    pub fn begin_acquisition(&mut self) {
        if matches!(self.status, LocationStatus::Unrequested | LocationStatus::Failed) {
            self.status = LocationStatus::Pending;
        }
    }

    pub fn acquire(&mut self, coordinate: Coordinate, accuracy_m: Option<f64>) {
        self.status = LocationStatus::Acquired;
        self.coordinate = Some(coordinate);
        self.accuracy_m = accuracy_m;
    }

    /// A failed refresh keeps the last acquired coordinate.
    pub fn fail(&mut self) {
        if !self.is_acquired() {
            self.status = LocationStatus::Failed;
        }
    }
}

// --- Acquisition tracking ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AcquisitionId(pub u64);

impl fmt::Display for AcquisitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acq-{}", self.0)
    }
}

/// The one location request whose result the model still accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAcquisition {
    pub id: AcquisitionId,
    pub high_accuracy: bool,
}

// --- Model ---

#[derive(Debug, Default)]
pub struct Model {
    pub config: ScreenConfig,
    pub screen_active: bool,

    pub events: Vec<EventRecord>,
    pub is_fetching: bool,

    pub filters: Filters,

    pub location: Location,
    pub acquisition: Option<PendingAcquisition>,
    pub next_acquisition: u64,

    pub view_mode: ViewModeController,

    pub active_error: Option<AppError>,
}

impl Model {
    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    /// Allocates the id for a new acquisition and makes it the live one.
    pub fn start_acquisition(&mut self, high_accuracy: bool) -> AcquisitionId {
        self.next_acquisition += 1;
        let id = AcquisitionId(self.next_acquisition);
        self.acquisition = Some(PendingAcquisition { id, high_accuracy });
        self.location.begin_acquisition();
        id
    }

    /// Takes the live acquisition if `id` matches it; stale ids yield `None`.
    pub fn settle_acquisition(&mut self, id: AcquisitionId) -> Option<PendingAcquisition> {
        match self.acquisition {
            Some(pending) if pending.id == id => self.acquisition.take(),
            _ => None,
        }
    }

    pub fn cancel_acquisition(&mut self) -> Option<PendingAcquisition> {
        self.acquisition.take()
    }
}
