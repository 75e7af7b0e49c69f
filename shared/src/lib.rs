#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod filter;
pub mod geo;
pub mod model;
pub mod selection;
pub mod sort;
pub mod view;
pub mod view_mode;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{ConfigError, LocationOptions, ScreenConfig};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use geo::{distance_between, Coordinate, CoordinateError};
pub use model::{
    EventId, EventRecord, Filters, Location, LocationStatus, Model, SortDirection, SortKey,
    TimeWindow, UnixTimeMs,
};
pub use selection::select;
pub use view::ViewModel;
pub use view_mode::{FeedView, ViewMode, ViewModeController};

pub const DEFAULT_EVENTS_URL: &str = "https://api.eventfinder.app/api/events";
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_MAX_CACHED_AGE_MS: u64 = 60_000;
pub const TITLE_PREVIEW_LENGTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Deserialization,
    Location,
    LocationPermissionDenied,
    Validation,
    Configuration,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Location => "LOCATION_ERROR",
            Self::LocationPermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::Validation => "VALIDATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::Location => ErrorSeverity::Transient,
            Self::Deserialization
            | Self::LocationPermissionDenied
            | Self::Validation
            | Self::Configuration
            | Self::Unknown => ErrorSeverity::Permanent,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Location)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: BTreeMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to load events. Please check your internet connection and try again."
                    .into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Deserialization => {
                "Received events we could not read. Please try again later.".into()
            }
            ErrorKind::Location => {
                "We couldn't find your location. Events are shown unsorted by distance.".into()
            }
            ErrorKind::LocationPermissionDenied => {
                "Location access is off. Enable it to see events near you.".into()
            }
            ErrorKind::Validation | ErrorKind::Configuration => self.message.clone(),
            ErrorKind::Unknown => "Something went wrong. Please try again.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " ({internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<CoordinateError> for AppError {
    fn from(e: CoordinateError) -> Self {
        Self::new(ErrorKind::Validation, e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::new(ErrorKind::Configuration, e.to_string())
    }
}

impl From<capabilities::GeolocationError> for AppError {
    fn from(e: capabilities::GeolocationError) -> Self {
        use capabilities::GeolocationError;

        let kind = match e {
            GeolocationError::PermissionDenied => ErrorKind::LocationPermissionDenied,
            GeolocationError::Timeout => ErrorKind::Timeout,
            GeolocationError::PositionUnavailable { .. } => ErrorKind::Location,
        };
        Self::new(kind, e.to_string())
    }
}
