//! Navitia API utility functions.

use anyhow::{Context, Result};
use tracing::instrument;

use super::api::LocalNavitiaApi;
use super::error::NavitiaError;
use super::params::{PlacesParams, validate_station_id_format};
use super::types::{StationSummary, StopArea};

/// Searches stations by name and flattens each hit into a summary.
///
/// # Errors
///
/// Returns an error if the underlying API request fails.
#[instrument(skip_all, fields(query = %params.query))]
pub async fn search_stations(
    api: &(impl LocalNavitiaApi + Sync),
    params: &PlacesParams,
) -> Result<Vec<StationSummary>> {
    let places = api
        .places(params)
        .await
        .with_context(|| format!("station search failed for '{}'", params.query))?;

    tracing::debug!(hits = places.len(), "station search completed");

    Ok(places.iter().map(StationSummary::from_place).collect())
}

/// Checks a station id's format, then asks the API whether it exists.
///
/// An HTTP 404 and an empty `stop_areas` list both resolve to `Ok(None)`.
///
/// # Errors
///
/// Returns an error if the id does not start with `stop_area:` or the
/// request fails for any reason other than "not found".
#[instrument(skip_all)]
pub async fn lookup_station(
    api: &(impl LocalNavitiaApi + Sync),
    raw_id: &str,
) -> Result<Option<StopArea>> {
    let station_id = validate_station_id_format(raw_id)?;

    match api.stop_area(&station_id).await {
        Ok(area) => Ok(area),
        Err(err) if matches!(err.downcast_ref(), Some(NavitiaError::NotFound)) => {
            tracing::debug!(%station_id, "station not found");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::{Result, bail};

    use super::*;
    use crate::navitia::params::{BoardParams, JourneyParams};
    use crate::navitia::types::{Coord, Journey, Passage, Place};

    /// How the mock answers `stop_area`.
    enum StopAreaReply {
        Found,
        Empty,
        NotFound,
        Unauthorized,
    }

    /// Mock API answering `places` and `stop_area` from fixed data.
    struct MockNavitiaApi {
        places: Vec<Place>,
        stop_area_reply: StopAreaReply,
        call_count: AtomicU32,
    }

    impl MockNavitiaApi {
        fn new(places: Vec<Place>, stop_area_reply: StopAreaReply) -> Self {
            Self {
                places,
                stop_area_reply,
                call_count: AtomicU32::new(0),
            }
        }
    }

    impl LocalNavitiaApi for MockNavitiaApi {
        async fn departures(&self, _: &str, _: &BoardParams) -> Result<Vec<Passage>> {
            bail!("unexpected departures call")
        }

        async fn arrivals(&self, _: &str, _: &BoardParams) -> Result<Vec<Passage>> {
            bail!("unexpected arrivals call")
        }

        async fn journeys(&self, _: &JourneyParams) -> Result<Vec<Journey>> {
            bail!("unexpected journeys call")
        }

        async fn places(&self, _: &PlacesParams) -> Result<Vec<Place>> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(self.places.clone())
        }

        async fn stop_area(&self, station_id: &str) -> Result<Option<StopArea>> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.stop_area_reply {
                StopAreaReply::Found => Ok(Some(StopArea {
                    id: Some(String::from(station_id)),
                    name: Some(String::from("Lyon Part Dieu")),
                    coord: Some(Coord {
                        lon: Some(serde_json::json!("4.859659")),
                        lat: Some(serde_json::json!("45.760585")),
                    }),
                })),
                StopAreaReply::Empty => Ok(None),
                StopAreaReply::NotFound => Err(NavitiaError::NotFound.into()),
                StopAreaReply::Unauthorized => Err(NavitiaError::Unauthorized.into()),
            }
        }
    }

    fn place(id: &str, name: &str, quality: Option<i64>) -> Place {
        Place {
            id: Some(String::from(id)),
            name: Some(String::from(name)),
            quality,
            stop_area: None,
        }
    }

    #[tokio::test]
    async fn test_search_stations_maps_every_place() {
        // Arrange
        let api = MockNavitiaApi::new(
            vec![
                place("stop_area:SNCF:87723197", "Lyon Part Dieu (Lyon)", Some(80)),
                place("stop_area:SNCF:87722025", "Lyon Perrache (Lyon)", None),
            ],
            StopAreaReply::Empty,
        );

        // Act
        let stations = search_stations(&api, &PlacesParams::new("Lyon"))
            .await
            .unwrap();

        // Assert
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].quality, 80);
        assert_eq!(stations[1].quality, 0);
        assert_eq!(api.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_stations_empty() {
        // Arrange
        let api = MockNavitiaApi::new(Vec::new(), StopAreaReply::Empty);

        // Act
        let stations = search_stations(&api, &PlacesParams::new("Atlantis"))
            .await
            .unwrap();

        // Assert
        assert!(stations.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_station_found() {
        // Arrange
        let api = MockNavitiaApi::new(Vec::new(), StopAreaReply::Found);

        // Act
        let area = lookup_station(&api, " \"stop_area:SNCF:87723197\" ")
            .await
            .unwrap()
            .unwrap();

        // Assert
        assert_eq!(area.id.as_deref(), Some("stop_area:SNCF:87723197"));
        assert_eq!(area.coord.unwrap().to_lon_lat(), "4.859659;45.760585");
    }

    #[tokio::test]
    async fn test_lookup_station_not_found_is_none() {
        // Arrange
        let api = MockNavitiaApi::new(Vec::new(), StopAreaReply::NotFound);

        // Act
        let area = lookup_station(&api, "stop_area:SNCF:00000000").await.unwrap();

        // Assert
        assert!(area.is_none());
    }

    #[tokio::test]
    async fn test_lookup_station_empty_list_is_none() {
        // Arrange
        let api = MockNavitiaApi::new(Vec::new(), StopAreaReply::Empty);

        // Act
        let area = lookup_station(&api, "stop_area:SNCF:00000000").await.unwrap();

        // Assert
        assert!(area.is_none());
    }

    #[tokio::test]
    async fn test_lookup_station_propagates_other_errors() {
        // Arrange
        let api = MockNavitiaApi::new(Vec::new(), StopAreaReply::Unauthorized);

        // Act
        let err = lookup_station(&api, "stop_area:SNCF:1").await.unwrap_err();

        // Assert
        assert!(matches!(
            err.downcast_ref::<NavitiaError>(),
            Some(NavitiaError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_lookup_station_rejects_bad_prefix_without_request() {
        // Arrange
        let api = MockNavitiaApi::new(Vec::new(), StopAreaReply::Found);

        // Act
        let result = lookup_station(&api, "87723197").await;

        // Assert
        assert!(result.is_err());
        assert_eq!(api.call_count.load(Ordering::SeqCst), 0);
    }
}
