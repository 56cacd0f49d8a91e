//! Navitia coverage API client module.
//!
//! Handles HTTP requests to the SNCF coverage of the Navitia API
//! and retrieves boards, journeys, and stations.

mod api;
mod client;
mod error;
mod params;
mod types;
mod util;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalNavitiaApi, NavitiaApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_TIMEOUT, NavitiaClient, NavitiaClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::NavitiaError;
pub use params::{
    BoardParams, DataFreshness, DatetimeRepresents, JourneyParams, PlacesParams,
    STOP_AREA_PREFIX, validate_station_id_format,
};
pub use types::{
    Coord, DisplayInformations, Journey, Passage, Place, Section, SectionEndpoint, StationSummary,
    StopArea, StopDateTime,
};
pub use util::{lookup_station, search_stations};
