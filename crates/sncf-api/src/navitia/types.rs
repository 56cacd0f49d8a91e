//! Navitia API response types.
//!
//! Every field is optional: the remote schema varies between coverage
//! regions and data freshness modes. Items that are printed back as JSON
//! (`Passage`, `Journey` and their children) keep unknown keys in `extra`
//! so re-serialization does not drop data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::disruption::{Axis, StopEvent, format_journey_status};

/// Line information shown to passengers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayInformations {
    /// Line code (e.g. `"TER"`, `"C"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Destination shown on the train.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Commercial mode (e.g. `"TGV INOUI"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial_mode: Option<String>,
    /// Train number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scheduled and realtime times of one passage at a stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopDateTime {
    /// Realtime departure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date_time: Option<String>,
    /// Scheduled departure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_departure_date_time: Option<String>,
    /// Realtime arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date_time: Option<String>,
    /// Scheduled arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_arrival_date_time: Option<String>,
    /// Status flags (`no_departing`, `no_arriving`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_informations: Option<Vec<String>>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StopEvent for StopDateTime {
    fn scheduled(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::Departure => self.base_departure_date_time.as_deref(),
            Axis::Arrival => self.base_arrival_date_time.as_deref(),
        }
    }

    fn actual(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::Departure => self.departure_date_time.as_deref(),
            Axis::Arrival => self.arrival_date_time.as_deref(),
        }
    }

    fn flags(&self) -> &[String] {
        self.additional_informations.as_deref().unwrap_or_default()
    }
}

/// One row of a departures or arrivals board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Line information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_informations: Option<DisplayInformations>,
    /// Times at the queried stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_date_time: Option<StopDateTime>,
    /// Remaining fields (`stop_point`, `route`, `links`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET stop_areas/{id}/departures` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeparturesResponse {
    /// Departures, earliest first.
    #[serde(default)]
    pub departures: Vec<Passage>,
}

/// `GET stop_areas/{id}/arrivals` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArrivalsResponse {
    /// Arrivals, earliest first.
    #[serde(default)]
    pub arrivals: Vec<Passage>,
}

/// Endpoint of a journey section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionEndpoint {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One leg of a journey (train, transfer, waiting, walk).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// `public_transport`, `transfer`, `waiting`, `crow_fly`, `street_network`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub section_type: Option<String>,
    /// Line information (public transport only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_informations: Option<DisplayInformations>,
    /// Origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<SectionEndpoint>,
    /// Destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<SectionEndpoint>,
    /// Realtime departure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date_time: Option<String>,
    /// Realtime arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date_time: Option<String>,
    /// Scheduled departure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_departure_date_time: Option<String>,
    /// Scheduled arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_arrival_date_time: Option<String>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Transfer kind (`walking`, `stay_in`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_type: Option<String>,
    /// Status flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_informations: Option<Vec<String>>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StopEvent for Section {
    fn scheduled(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::Departure => self.base_departure_date_time.as_deref(),
            Axis::Arrival => self.base_arrival_date_time.as_deref(),
        }
    }

    fn actual(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::Departure => self.departure_date_time.as_deref(),
            Axis::Arrival => self.arrival_date_time.as_deref(),
        }
    }

    fn flags(&self) -> &[String] {
        self.additional_informations.as_deref().unwrap_or_default()
    }
}

/// One itinerary proposed by the journey planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    /// Departure time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date_time: Option<String>,
    /// Arrival time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date_time: Option<String>,
    /// Total duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Number of changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_transfers: Option<u32>,
    /// Worst disruption effect on the journey (`SIGNIFICANT_DELAYS`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Legs in travel order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Journey {
    /// Journey-level disruption label.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        format_journey_status(self.status.as_deref())
    }
}

/// `GET journeys` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneysResponse {
    /// Proposed journeys.
    #[serde(default)]
    pub journeys: Vec<Journey>,
}

/// WGS84 coordinates. Navitia encodes them as strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Coord {
    /// Longitude.
    #[serde(default)]
    pub lon: Option<Value>,
    /// Latitude.
    #[serde(default)]
    pub lat: Option<Value>,
}

impl Coord {
    /// `"lon;lat"`, the form Navitia accepts as a journey endpoint.
    #[must_use]
    pub fn to_lon_lat(&self) -> String {
        format!(
            "{};{}",
            coord_component(self.lon.as_ref()),
            coord_component(self.lat.as_ref())
        )
    }
}

/// Renders one coordinate without JSON quoting.
fn coord_component(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::from("?"),
    }
}

/// A station (Navitia stop area).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StopArea {
    /// Identifier (`stop_area:SNCF:87686006`).
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Position.
    #[serde(default)]
    pub coord: Option<Coord>,
}

/// `GET stop_areas/{id}` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopAreasResponse {
    /// Matching stop areas (at most one for an id lookup).
    #[serde(default)]
    pub stop_areas: Vec<StopArea>,
}

/// A place returned by the autocomplete endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Place {
    /// Identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Match quality (0-100).
    #[serde(default)]
    pub quality: Option<i64>,
    /// Embedded stop area when the place is a station.
    #[serde(default)]
    pub stop_area: Option<StopArea>,
}

/// `GET places` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesResponse {
    /// Places ordered by relevance.
    #[serde(default)]
    pub places: Vec<Place>,
}

/// Flattened station search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StationSummary {
    /// Station identifier.
    pub id: Option<String>,
    /// Station name.
    pub name: Option<String>,
    /// Match quality, `0` when unknown.
    pub quality: i64,
    /// `"lon;lat"` when the stop area carries coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
}

impl StationSummary {
    /// Builds a summary from an autocomplete place.
    #[must_use]
    pub fn from_place(place: &Place) -> Self {
        Self {
            id: place.id.clone(),
            name: place.name.clone(),
            quality: place.quality.unwrap_or(0),
            coordinates: place
                .stop_area
                .as_ref()
                .and_then(|area| area.coord.as_ref())
                .map(Coord::to_lon_lat),
        }
    }
}

/// Navitia error envelope (`{"error": {"id": ..., "message": ...}}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    /// Error details.
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// Error details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable identifier (`bad_filter`, `no_solution`, ...).
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::disruption::format_disruption;

    #[test]
    fn test_parse_departures_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/navitia/departures.json");

        // Act
        let response: DeparturesResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.departures.len(), 3);
        let first = &response.departures[0];
        let info = first.display_informations.as_ref().unwrap();
        assert_eq!(info.code.as_deref(), Some("C"));
        assert_eq!(info.direction.as_deref(), Some("Versailles Château Rive Gauche"));
    }

    #[test]
    fn test_fixture_disruption_labels() {
        // Arrange
        let json = include_str!("../../../../fixtures/navitia/departures.json");
        let response: DeparturesResponse = serde_json::from_str(json).unwrap();

        // Act
        let labels: Vec<String> = response
            .departures
            .iter()
            .map(|d| format_disruption(d.stop_date_time.as_ref().unwrap(), Axis::Departure))
            .collect();

        // Assert
        assert_eq!(labels, ["", "+7min", "❌ SUPPRIMÉ"]);
    }

    #[test]
    fn test_passage_keeps_unknown_fields() {
        // Arrange
        let json = r#"{
            "stop_point": {"id": "stop_point:SNCF:1"},
            "stop_date_time": {"departure_date_time": "20260210T140000", "data_freshness": "realtime"}
        }"#;

        // Act
        let passage: Passage = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&passage).unwrap();

        // Assert
        assert_eq!(back["stop_point"]["id"], "stop_point:SNCF:1");
        assert_eq!(back["stop_date_time"]["data_freshness"], "realtime");
        assert!(back.get("display_informations").is_none());
        assert!(back["stop_date_time"].get("additional_informations").is_none());
    }

    #[test]
    fn test_missing_keys_are_tolerated() {
        // Arrange & Act
        let passage: Passage = serde_json::from_str("{}").unwrap();
        let sdt: StopDateTime = serde_json::from_str("{}").unwrap();

        // Assert
        assert!(passage.stop_date_time.is_none());
        assert!(sdt.flags().is_empty());
        assert_eq!(sdt.scheduled(Axis::Arrival), None);
    }

    #[test]
    fn test_parse_journeys_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/navitia/journeys.json");

        // Act
        let response: JourneysResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.journeys.len(), 2);
        let first = &response.journeys[0];
        assert_eq!(first.duration, Some(7_380));
        assert_eq!(first.nb_transfers, Some(1));
        assert_eq!(first.status_label(), "⚠️");
        let sections = first.sections.as_ref().unwrap();
        assert_eq!(sections[0].section_type.as_deref(), Some("public_transport"));
        assert_eq!(format_disruption(&sections[0], Axis::Arrival), "+12min");
        assert_eq!(response.journeys[1].status_label(), "");
    }

    #[test]
    fn test_station_summary_from_place() {
        // Arrange
        let json = include_str!("../../../../fixtures/navitia/places.json");
        let response: PlacesResponse = serde_json::from_str(json).unwrap();

        // Act
        let summaries: Vec<StationSummary> =
            response.places.iter().map(StationSummary::from_place).collect();

        // Assert
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id.as_deref(), Some("stop_area:SNCF:87686006"));
        assert_eq!(summaries[0].name.as_deref(), Some("Paris Gare de Lyon (Paris)"));
        assert_eq!(summaries[0].quality, 90);
        assert_eq!(summaries[0].coordinates.as_deref(), Some("2.373481;48.844945"));
        assert_eq!(summaries[1].quality, 0);
        assert_eq!(summaries[1].coordinates, None);
    }

    #[test]
    fn test_station_summary_json_omits_missing_coordinates() {
        // Arrange
        let summary = StationSummary {
            id: Some(String::from("stop_area:SNCF:1")),
            name: Some(String::from("Nowhere")),
            quality: 10,
            coordinates: None,
        };

        // Act
        let value = serde_json::to_value(&summary).unwrap();

        // Assert
        assert_eq!(
            value,
            serde_json::json!({"id": "stop_area:SNCF:1", "name": "Nowhere", "quality": 10})
        );
    }

    #[test]
    fn test_coord_accepts_numbers_and_strings() {
        // Arrange
        let as_strings: Coord = serde_json::from_str(r#"{"lon": "4.8", "lat": "45.7"}"#).unwrap();
        let as_numbers: Coord = serde_json::from_str(r#"{"lon": 4.8, "lat": 45.7}"#).unwrap();

        // Act & Assert
        assert_eq!(as_strings.to_lon_lat(), "4.8;45.7");
        assert_eq!(as_numbers.to_lon_lat(), "4.8;45.7");
    }
}
