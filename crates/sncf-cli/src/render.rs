//! Human-readable and JSON renderers for command results.
//!
//! Every function returns the text without a trailing newline; the caller
//! writes it to stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use sncf_api::disruption::{Axis, Disruption, classify};
use sncf_api::navitia::{Journey, Passage, Section, StationSummary, StopArea};
use sncf_api::timestamp::{Normalized, format_clock};

/// Width of the rule printed above each journey.
const JOURNEY_RULE_WIDTH: usize = 60;

/// Seconds per hour.
const SECS_PER_HOUR: i64 = 3_600;

/// Seconds per minute.
const SECS_PER_MINUTE: i64 = 60;

/// Pretty-prints any serializable value, keeping non-ASCII text as-is.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize JSON output")
}

/// Formats a duration in seconds as `{h}h {m}min` or `{m}min`.
///
/// Negative durations render as `0min`.
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds.div_euclid(SECS_PER_HOUR);
    let minutes = seconds.rem_euclid(SECS_PER_HOUR).div_euclid(SECS_PER_MINUTE);
    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{minutes}min")
    }
}

/// Renders a departures or arrivals board.
#[must_use]
pub fn render_board(passages: &[Passage], axis: Axis) -> String {
    let heading = match axis {
        Axis::Departure => "Departure",
        Axis::Arrival => "Arrival",
    };

    let mut lines: Vec<String> = Vec::new();
    for (index, passage) in (1_usize..).zip(passages) {
        let info = passage.display_informations.as_ref();
        let code = info.and_then(|i| i.code.as_deref()).unwrap_or("?");
        let direction = info
            .and_then(|i| i.direction.as_deref())
            .unwrap_or("Unknown");
        lines.push(format!("{index}. [{code}] → {direction}"));

        let disruption = passage
            .stop_date_time
            .as_ref()
            .map_or(Disruption::OnTime, |sdt| classify(sdt, axis));
        let actual = passage.stop_date_time.as_ref().and_then(|sdt| match axis {
            Axis::Departure => sdt.departure_date_time.as_deref(),
            Axis::Arrival => sdt.arrival_date_time.as_deref(),
        });
        let clock = format_clock(actual.unwrap_or_default());

        match disruption {
            Disruption::Cancelled => lines.push(format!("   {disruption}")),
            Disruption::OnTime => lines.push(format!("   {heading}: {clock}")),
            Disruption::Delayed(_) | Disruption::Early(_) => {
                lines.push(format!("   {heading}: {clock} ({disruption})"));
            }
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Appends a disruption label to a clock time when there is one.
fn clock_with_label(time: Option<&str>, disruption: Disruption) -> String {
    let clock = format_clock(time.unwrap_or_default());
    match disruption {
        Disruption::OnTime => clock,
        other => format!("{clock} {other}"),
    }
}

/// Renders one journey section, or `None` for section kinds not shown.
fn render_section(index: usize, section: &Section) -> Option<Vec<String>> {
    let kind = section.section_type.as_deref().unwrap_or("unknown");
    let duration = format_duration(section.duration.unwrap_or(0));

    match kind {
        "public_transport" => {
            let info = section.display_informations.as_ref();
            let code = info.and_then(|i| i.code.as_deref()).unwrap_or("?");
            let direction = info
                .and_then(|i| i.direction.as_deref())
                .unwrap_or("Unknown");
            let from = section
                .from
                .as_ref()
                .and_then(|f| f.name.as_deref())
                .unwrap_or("?");
            let to = section
                .to
                .as_ref()
                .and_then(|t| t.name.as_deref())
                .unwrap_or("?");
            let departure = clock_with_label(
                section.departure_date_time.as_deref(),
                classify(section, Axis::Departure),
            );
            let arrival = clock_with_label(
                section.arrival_date_time.as_deref(),
                classify(section, Axis::Arrival),
            );
            Some(vec![
                format!("  {index}. [{code}] → {direction}"),
                format!("     {from} ({departure}) → {to} ({arrival})"),
            ])
        }
        "transfer" => {
            let transfer_type = section.transfer_type.as_deref().unwrap_or("walking");
            Some(vec![format!(
                "  {index}. Transfer ({transfer_type}, {duration})"
            )])
        }
        "waiting" => Some(vec![format!("  {index}. Waiting ({duration})")]),
        "crow_fly" => Some(vec![format!("  {index}. Crow Fly ({duration})")]),
        _ => None,
    }
}

/// Renders planned journeys with their sections.
#[must_use]
pub fn render_journeys(journeys: &[Journey]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (index, journey) in (1_usize..).zip(journeys) {
        let departure = format_clock(journey.departure_date_time.as_deref().unwrap_or_default());
        let arrival = format_clock(journey.arrival_date_time.as_deref().unwrap_or_default());
        let duration = format_duration(journey.duration.unwrap_or(0));

        lines.push("=".repeat(JOURNEY_RULE_WIDTH));
        let header = format!("Journey {index}: {departure} → {arrival} ({duration})");
        match journey.status_label() {
            "" => lines.push(header),
            status => lines.push(format!("{header} {status}")),
        }
        lines.push(format!(
            "Transfers: {}",
            journey.nb_transfers.unwrap_or(0)
        ));
        lines.push(String::new());

        let sections = journey.sections.as_deref().unwrap_or_default();
        for (section_index, section) in (1_usize..).zip(sections) {
            if let Some(section_lines) = render_section(section_index, section) {
                lines.extend(section_lines);
            }
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Renders station search results.
#[must_use]
pub fn render_stations(stations: &[StationSummary]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (index, station) in (1_usize..).zip(stations) {
        lines.push(format!(
            "{index}. {}",
            station.name.as_deref().unwrap_or("?")
        ));
        lines.push(format!("   ID: {}", station.id.as_deref().unwrap_or("?")));
        if let Some(ref coordinates) = station.coordinates {
            lines.push(format!("   Coordinates: {coordinates}"));
        }
        lines.push(format!("   Quality: {}", station.quality));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Renders a successful station validation.
#[must_use]
pub fn render_station(station_id: &str, area: &StopArea) -> String {
    let mut lines = vec![
        format!(
            "✅ Valid station: {}",
            area.name.as_deref().unwrap_or("Unknown")
        ),
        format!("   ID: {station_id}"),
    ];
    if let Some(ref coord) = area.coord {
        lines.push(format!("   Coordinates: {}", coord.to_lon_lat()));
    }
    lines.join("\n")
}

/// Renders a successful datetime validation.
#[must_use]
pub fn render_datetime(normalized: &Normalized) -> String {
    let mut lines = vec![format!("✅ Valid datetime: {}", normalized.timestamp)];
    if let Some(format) = normalized.converted_from {
        lines.push(format!("   Converted from {format}"));
    }
    lines.push(format!("   {}", normalized.timestamp.readable()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde::Deserialize;
    use sncf_api::navitia::{Coord, Place};
    use sncf_api::timestamp::normalize;

    use super::*;

    #[derive(Deserialize)]
    struct Departures {
        departures: Vec<Passage>,
    }

    #[derive(Deserialize)]
    struct Arrivals {
        arrivals: Vec<Passage>,
    }

    #[derive(Deserialize)]
    struct Journeys {
        journeys: Vec<Journey>,
    }

    #[derive(Deserialize)]
    struct Places {
        places: Vec<Place>,
    }

    #[test]
    fn test_format_duration() {
        // Arrange & Act & Assert
        assert_eq!(format_duration(7_380), "2h 3min");
        assert_eq!(format_duration(3_600), "1h 0min");
        assert_eq!(format_duration(300), "5min");
        assert_eq!(format_duration(59), "0min");
        assert_eq!(format_duration(-120), "0min");
    }

    #[test]
    fn test_render_departures_board() {
        // Arrange
        let json = include_str!("../../../fixtures/navitia/departures.json");
        let board: Departures = serde_json::from_str(json).unwrap();

        // Act
        let text = render_board(&board.departures, Axis::Departure);

        // Assert
        let expected = "\
1. [C] → Versailles Château Rive Gauche
   Departure: 14:00

2. [TER] → Dijon Ville (Dijon)
   Departure: 14:12 (+7min)

3. [TGV INOUI] → Marseille Saint-Charles (Marseille)
   ❌ SUPPRIMÉ
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_arrivals_board() {
        // Arrange
        let json = include_str!("../../../fixtures/navitia/arrivals.json");
        let board: Arrivals = serde_json::from_str(json).unwrap();

        // Act
        let text = render_board(&board.arrivals, Axis::Arrival);

        // Assert
        assert!(text.contains("   Arrival: 13:55 (-5min)"));
        assert!(text.contains("2. [TGV INOUI] → Paris Gare de Lyon (Paris)\n   ❌ SUPPRIMÉ"));
    }

    #[test]
    fn test_render_board_tolerates_bare_rows() {
        // Arrange
        let passages = vec![Passage::default()];

        // Act
        let text = render_board(&passages, Axis::Departure);

        // Assert
        assert_eq!(text, "1. [?] → Unknown\n   Departure: \n");
    }

    #[test]
    fn test_render_empty_board() {
        // Arrange & Act & Assert
        assert_eq!(render_board(&[], Axis::Departure), "");
    }

    #[test]
    fn test_render_journeys() {
        // Arrange
        let json = include_str!("../../../fixtures/navitia/journeys.json");
        let response: Journeys = serde_json::from_str(json).unwrap();

        // Act
        let text = render_journeys(&response.journeys);

        // Assert
        let rule = "=".repeat(60);
        let expected = format!(
            "\
{rule}
Journey 1: 14:00 → 16:03 (2h 3min) ⚠️
Transfers: 1

  1. [TGV INOUI] → Lyon Part Dieu (Lyon)
     Paris Gare de Lyon (Paris) (14:00) → Lyon Part Dieu (Lyon) (16:03 +12min)
  2. Transfer (walking, 5min)
  3. Waiting (10min)

{rule}
Journey 2: 15:00 → 16:56 (1h 56min)
Transfers: 0

  1. Crow Fly (0min)
  2. [TGV INOUI] → Lyon Perrache (Lyon)
     Paris Gare de Lyon (Paris) (15:00) → Lyon Part Dieu (Lyon) (16:56)
"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_section_skips_street_network() {
        // Arrange
        let section = Section {
            section_type: Some(String::from("street_network")),
            duration: Some(120),
            ..Section::default()
        };

        // Act & Assert
        assert!(render_section(1, &section).is_none());
    }

    #[test]
    fn test_render_stations() {
        // Arrange
        let json = include_str!("../../../fixtures/navitia/places.json");
        let response: Places = serde_json::from_str(json).unwrap();
        let stations: Vec<StationSummary> = response
            .places
            .iter()
            .map(StationSummary::from_place)
            .collect();

        // Act
        let text = render_stations(&stations);

        // Assert
        assert!(text.starts_with(
            "1. Paris Gare de Lyon (Paris)\n   ID: stop_area:SNCF:87686006\n   Coordinates: 2.373481;48.844945\n   Quality: 90\n"
        ));
        assert!(!text.contains("2. ?"));
        assert_eq!(text.matches("Coordinates:").count(), 1);
    }

    #[test]
    fn test_render_station() {
        // Arrange
        let area = StopArea {
            id: Some(String::from("stop_area:SNCF:87686006")),
            name: Some(String::from("Paris Gare de Lyon")),
            coord: Some(Coord {
                lon: Some(serde_json::json!("2.373481")),
                lat: Some(serde_json::json!("48.844945")),
            }),
        };

        // Act
        let text = render_station("stop_area:SNCF:87686006", &area);

        // Assert
        assert_eq!(
            text,
            "✅ Valid station: Paris Gare de Lyon\n   ID: stop_area:SNCF:87686006\n   Coordinates: 2.373481;48.844945"
        );
    }

    #[test]
    fn test_render_datetime_plain() {
        // Arrange
        let normalized = normalize("20260210T140000", false).unwrap();

        // Act
        let text = render_datetime(&normalized);

        // Assert
        assert_eq!(
            text,
            "✅ Valid datetime: 20260210T140000\n   Tuesday, February 10, 2026 at 14:00:00"
        );
    }

    #[test]
    fn test_render_datetime_converted() {
        // Arrange
        let normalized = normalize("2026-02-10 14:00", true).unwrap();

        // Act
        let text = render_datetime(&normalized);

        // Assert
        assert!(text.starts_with("✅ Valid datetime: 20260210T140000\n   Converted from %Y-%m-%d %H:%M\n"));
    }

    #[test]
    fn test_to_json_keeps_unicode() {
        // Arrange
        let json = include_str!("../../../fixtures/navitia/departures.json");
        let board: Departures = serde_json::from_str(json).unwrap();

        // Act
        let text = to_json(&board.departures).unwrap();

        // Assert
        assert!(text.contains("Versailles Château Rive Gauche"));
        assert!(text.contains("\"stop_point\""));
        assert!(text.contains("\"no_departing\""));
    }
}
