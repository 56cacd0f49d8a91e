//! `NavitiaApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::params::{BoardParams, JourneyParams, PlacesParams};
use super::types::{Journey, Passage, Place, StopArea};

/// Navitia coverage API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(NavitiaApi: Send)]
pub trait LocalNavitiaApi {
    /// Fetches the departures board of a station.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn departures(&self, station_id: &str, params: &BoardParams) -> Result<Vec<Passage>>;

    /// Fetches the arrivals board of a station.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn arrivals(&self, station_id: &str, params: &BoardParams) -> Result<Vec<Passage>>;

    /// Plans journeys between two locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn journeys(&self, params: &JourneyParams) -> Result<Vec<Journey>>;

    /// Searches stations by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn places(&self, params: &PlacesParams) -> Result<Vec<Place>>;

    /// Fetches a single station, `None` when the API returns no match.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn stop_area(&self, station_id: &str) -> Result<Option<StopArea>>;
}
