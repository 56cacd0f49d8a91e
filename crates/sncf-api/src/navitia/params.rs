//! Navitia request parameter types.

use anyhow::{Result, bail};

/// Prefix every station identifier must carry.
pub const STOP_AREA_PREFIX: &str = "stop_area:";

/// Which timetable the API should answer from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFreshness {
    /// Theoretical schedule with realtime disruptions applied.
    #[default]
    Realtime,
    /// Theoretical schedule only.
    BaseSchedule,
}

impl DataFreshness {
    /// Query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::BaseSchedule => "base_schedule",
        }
    }
}

/// Meaning of the `datetime` sent to the journey planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatetimeRepresents {
    /// Leave at or after the datetime.
    #[default]
    Departure,
    /// Arrive at or before the datetime.
    Arrival,
}

impl DatetimeRepresents {
    /// Query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Departure => "departure",
            Self::Arrival => "arrival",
        }
    }
}

/// Parameters for a departures or arrivals board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardParams {
    /// Number of rows.
    pub count: u32,
    /// First datetime of the board (`YYYYMMDDTHHMMSS`), `None` for now.
    pub from_datetime: Option<String>,
    /// Timetable to use.
    pub data_freshness: DataFreshness,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            count: 10,
            from_datetime: None,
            data_freshness: DataFreshness::Realtime,
        }
    }
}

impl BoardParams {
    /// Builds the query string pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("count", self.count.to_string()),
            ("data_freshness", String::from(self.data_freshness.as_str())),
        ];
        if let Some(ref from) = self.from_datetime {
            query.push(("from_datetime", from.clone()));
        }
        query
    }
}

/// Parameters for the journey planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyParams {
    /// Origin: station id or `lon;lat`.
    pub from: String,
    /// Destination: station id or `lon;lat`.
    pub to: String,
    /// Reference datetime (`YYYYMMDDTHHMMSS`), `None` for now.
    pub datetime: Option<String>,
    /// How `datetime` is interpreted.
    pub datetime_represents: DatetimeRepresents,
    /// Number of journeys.
    pub count: u32,
    /// Timetable to use.
    pub data_freshness: DataFreshness,
}

impl JourneyParams {
    /// Creates parameters with default count (5) and realtime data.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            datetime: None,
            datetime_represents: DatetimeRepresents::Departure,
            count: 5,
            data_freshness: DataFreshness::Realtime,
        }
    }

    /// Sets the reference datetime and what it represents.
    #[must_use]
    pub fn datetime(mut self, datetime: impl Into<String>, represents: DatetimeRepresents) -> Self {
        self.datetime = Some(datetime.into());
        self.datetime_represents = represents;
        self
    }

    /// Sets the number of journeys.
    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the timetable.
    #[must_use]
    pub const fn data_freshness(mut self, freshness: DataFreshness) -> Self {
        self.data_freshness = freshness;
        self
    }

    /// Builds the query string pairs.
    ///
    /// `datetime_represents` is only sent together with `datetime`.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("from", self.from.clone()),
            ("to", self.to.clone()),
            ("count", self.count.to_string()),
            ("data_freshness", String::from(self.data_freshness.as_str())),
        ];
        if let Some(ref datetime) = self.datetime {
            query.push(("datetime", datetime.clone()));
            query.push((
                "datetime_represents",
                String::from(self.datetime_represents.as_str()),
            ));
        }
        query
    }
}

/// Parameters for the station autocomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesParams {
    /// Free-text query.
    pub query: String,
    /// Maximum number of results.
    pub count: u32,
}

impl PlacesParams {
    /// Creates parameters with the default count (10).
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: 10,
        }
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Builds the query string pairs. Results are restricted to stations.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("type[]", String::from("stop_area")),
            ("count", self.count.to_string()),
        ]
    }
}

/// Cleans a user-supplied station id and checks its prefix.
///
/// Surrounding whitespace and quotes are removed.
///
/// # Errors
///
/// Returns an error if the cleaned id does not start with `stop_area:`.
pub fn validate_station_id_format(input: &str) -> Result<String> {
    let cleaned = input.trim().trim_matches(|c| c == '\'' || c == '"');
    if !cleaned.starts_with(STOP_AREA_PREFIX) {
        bail!(
            "Invalid format: '{cleaned}'. Station IDs should start with '{STOP_AREA_PREFIX}' \
             (example: stop_area:SNCF:87686006)"
        );
    }
    Ok(String::from(cleaned))
}
