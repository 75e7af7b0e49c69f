//! One-shot device position requests.
//!
//! The shell runs the platform position API with the given options and answers
//! exactly once per request, either with a position or with an error. The shell
//! enforces `timeout_ms` and reports `GeolocationError::Timeout` when it expires.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LocationOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRequest {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl PositionRequest {
    #[must_use]
    pub const fn from_options(options: &LocationOptions, high_accuracy: bool) -> Self {
        Self {
            high_accuracy,
            timeout_ms: options.timeout_ms,
            maximum_age_ms: options.maximum_age_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeolocationOperation {
    CurrentPosition(PositionRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeolocationPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: Option<f64>,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {reason}")]
    PositionUnavailable { reason: String },

    #[error("position request timed out")]
    Timeout,
}

impl GeolocationError {
    /// Whether asking again at lower accuracy can plausibly succeed.
    #[must_use]
    pub const fn allows_low_accuracy_retry(&self) -> bool {
        matches!(self, Self::Timeout | Self::PositionUnavailable { .. })
    }
}

pub type GeolocationResult = Result<GeolocationPosition, GeolocationError>;

impl Operation for GeolocationOperation {
    type Output = GeolocationResult;
}

pub struct Geolocation<Ev> {
    context: CapabilityContext<GeolocationOperation, Ev>,
}

impl<Ev> Capability<Ev> for Geolocation<Ev> {
    type Operation = GeolocationOperation;
    type MappedSelf<MappedEv> = Geolocation<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Geolocation::new(self.context.map_event(f))
    }
}

impl<Ev> Geolocation<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<GeolocationOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn current_position<F>(&self, request: PositionRequest, make_event: F)
    where
        F: FnOnce(GeolocationResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(GeolocationOperation::CurrentPosition(request))
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_configured_options() {
        let options = LocationOptions::default();
        let request = PositionRequest::from_options(&options, false);
        assert!(!request.high_accuracy);
        assert_eq!(request.timeout_ms, options.timeout_ms);
        assert_eq!(request.maximum_age_ms, options.maximum_age_ms);
    }

    #[test]
    fn only_transient_failures_allow_fallback() {
        assert!(GeolocationError::Timeout.allows_low_accuracy_retry());
        assert!(GeolocationError::PositionUnavailable {
            reason: "no fix".into()
        }
        .allows_low_accuracy_retry());
        assert!(!GeolocationError::PermissionDenied.allows_low_accuracy_retry());
    }
}
