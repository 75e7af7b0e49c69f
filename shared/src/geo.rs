use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Statute miles per nautical mile, applied to the arc length in minutes.
pub const MILES_PER_NAUTICAL_MILE: f64 = 1.1515;
pub const MINUTES_PER_DEGREE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("coordinate is not a finite number")]
    NonFinite,
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Validated lat/lng pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        distance_between(self, other)
    }
}

/// Great-circle distance in miles, rounded to one decimal place.
///
/// Spherical law of cosines on the longitude difference. The cosine term is
/// clamped so rounding noise can never push `acos` out of its domain, which
/// also makes the distance from a point to itself exactly zero.
#[must_use]
pub fn distance_between(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let delta_lng = (a.lng - b.lng).to_radians();

    let cosine = lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * delta_lng.cos();
    let angle_degrees = cosine.clamp(-1.0, 1.0).acos().to_degrees();

    let miles = angle_degrees * MINUTES_PER_DEGREE * MILES_PER_NAUTICAL_MILE;
    (miles * 10.0).round() / 10.0
}

/// Fails closed: no distance unless both points are known.
#[must_use]
pub fn distance_between_opt(a: Option<Coordinate>, b: Option<Coordinate>) -> Option<f64> {
    Some(distance_between(a?, b?))
}

#[must_use]
pub fn format_distance(miles: f64) -> String {
    if !miles.is_finite() || miles < 0.0 {
        return "Unknown".to_string();
    }

    if miles < 10.0 {
        format!("{miles:.1} mi")
    } else {
        format!("{:.0} mi", miles.round())
    }
}
