use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, GeolocationResult, PositionRequest};
use crate::event::Event;
use crate::geo::Coordinate;
use crate::model::{EventRecord, Filters, Model, PendingAcquisition};
use crate::view::{build_view_model, ViewModel};
use crate::view_mode::FeedView;
use crate::{AppError, ErrorKind};

#[derive(Default)]
pub struct App;

impl App {
    fn fetch_events(model: &mut Model, caps: &Capabilities) {
        if model.is_fetching {
            debug!("fetch already in flight");
            return;
        }
        model.is_fetching = true;

        caps.http
            .get(&model.config.events_url)
            .expect_json::<Vec<EventRecord>>()
            .send(|result| Event::EventsFetched(Box::new(result)));
    }

    fn request_location(model: &mut Model, caps: &Capabilities, high_accuracy: bool) {
        let options = model.config.location;
        let high_accuracy = high_accuracy && options.high_accuracy;
        let id = model.start_acquisition(high_accuracy);
        let request = PositionRequest::from_options(&options, high_accuracy);

        info!(acquisition = %id, high_accuracy = request.high_accuracy, "requesting position");
        model.view_mode.location_changed(model.location.status());

        caps.geolocation.current_position(request, move |result| Event::LocationResolved {
            request: id,
            result: Box::new(result),
        });
    }

    fn accept_position(model: &mut Model, coordinate: Coordinate, accuracy_m: Option<f64>) {
        model.location.acquire(coordinate, accuracy_m);
        model.view_mode.location_changed(model.location.status());
    }

    fn handle_location(
        pending: PendingAcquisition,
        result: GeolocationResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let id = pending.id;

        match result {
            Ok(position) => match Coordinate::new(position.latitude, position.longitude) {
                Ok(coordinate) => {
                    info!(acquisition = %id, "position acquired");
                    Self::accept_position(model, coordinate, position.accuracy_m);
                }
                Err(e) => {
                    warn!(acquisition = %id, error = %e, "provider returned an invalid position");
                    model.location.fail();
                    model.view_mode.location_changed(model.location.status());
                    model.set_error(
                        AppError::from(e)
                            .with_context("lat", position.latitude.to_string())
                            .with_context("lng", position.longitude.to_string()),
                    );
                }
            },
            Err(e)
                if pending.high_accuracy
                    && model.config.location.fallback_to_low_accuracy
                    && e.allows_low_accuracy_retry() =>
            {
                warn!(acquisition = %id, error = %e, "high accuracy fix failed; falling back");
                Self::request_location(model, caps, false);
            }
            Err(e) if model.location.is_acquired() => {
                info!(acquisition = %id, error = %e, "refresh failed; keeping previous fix");
            }
            Err(e) => {
                warn!(acquisition = %id, error = %e, "position acquisition failed");
                model.location.fail();
                model.view_mode.location_changed(model.location.status());
                model.set_error(AppError::from(e));
            }
        }
    }

    fn handle_fetched(
        result: crux_http::Result<crux_http::Response<Vec<EventRecord>>>,
        model: &mut Model,
    ) {
        model.is_fetching = false;

        match result {
            Ok(mut response) => match response.take_body() {
                Some(events) => {
                    info!(count = events.len(), "events fetched");
                    model.events = events;
                }
                None => {
                    warn!("events response had no body");
                    model.set_error(AppError::new(
                        ErrorKind::Deserialization,
                        "Events response had no body",
                    ));
                }
            },
            Err(e @ crux_http::Error::Json(_)) => {
                warn!(error = %e, "events response was malformed");
                model.set_error(
                    AppError::new(ErrorKind::Deserialization, "Events response was malformed")
                        .with_internal(e.to_string()),
                );
            }
            Err(e) => {
                warn!(error = %e, "events fetch failed");
                model.set_error(
                    AppError::new(ErrorKind::Network, "Failed to fetch events")
                        .with_internal(e.to_string()),
                );
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), "update");

        match event {
            Event::Noop => return,

            Event::Configure(config) => match config.validate() {
                Ok(()) => model.config = *config,
                Err(e) => {
                    warn!(error = %e, "rejecting configuration");
                    model.set_error(e.into());
                }
            },

            Event::ScreenOpened => {
                model.screen_active = true;
                Self::fetch_events(model, caps);
                if model.acquisition.is_none() {
                    Self::request_location(model, caps, true);
                }
            }

            Event::ScreenClosed => {
                model.screen_active = false;
                if let Some(pending) = model.cancel_acquisition() {
                    info!(acquisition = %pending.id, "cancelled pending position request");
                }
                return;
            }

            Event::RefreshRequested => Self::fetch_events(model, caps),

            Event::EventsReplaced(events) => {
                model.events = events;
            }

            Event::EventsFetched(result) => Self::handle_fetched(*result, model),

            Event::SearchChanged { text } => {
                model.filters = model.filters.clone().with_search(text);
            }

            Event::CategorySelected { category } => {
                model.filters = Filters {
                    category,
                    ..model.filters.clone()
                };
            }

            Event::TimeWindowChanged { window } => {
                model.filters = Filters {
                    window,
                    ..model.filters.clone()
                };
            }

            Event::SortKeySelected { key } => {
                model.filters = Filters {
                    sort_key: key,
                    ..model.filters.clone()
                };
            }

            Event::SortDirectionToggled => {
                model.filters = Filters {
                    direction: model.filters.direction.toggle(),
                    ..model.filters.clone()
                };
            }

            Event::FiltersReplaced(filters) => model.filters = *filters,

            Event::LocationRequested => {
                if model.screen_active {
                    Self::request_location(model, caps, true);
                } else {
                    debug!("ignoring location request while the screen is closed");
                    return;
                }
            }

            Event::PositionUpdated { coordinate } => {
                if !model.screen_active {
                    debug!("ignoring position update while the screen is closed");
                    return;
                }
                if !model.location.is_acquired() {
                    debug!("ignoring position update before first acquisition");
                    return;
                }
                Self::accept_position(model, coordinate, None);
            }

            Event::LocationResolved { request, result } => {
                let Some(pending) = model.settle_acquisition(request) else {
                    debug!(acquisition = %request, "dropping result of a cancelled or superseded request");
                    return;
                };
                Self::handle_location(pending, *result, model, caps);
            }

            Event::ShowMap => {
                model.view_mode.choose(FeedView::Map);
            }

            Event::ShowList => {
                model.view_mode.choose(FeedView::List);
            }

            Event::ToggleView => {
                model.view_mode.toggle();
            }

            Event::DismissError => model.clear_error(),
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        build_view_model(model)
    }
}
