mod location;

pub use self::location::{
    Geolocation, GeolocationError, GeolocationOperation, GeolocationPosition, GeolocationResult,
    PositionRequest,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub geolocation: Geolocation<Event>,
}
