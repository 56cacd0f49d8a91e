//! Navitia timestamp layout (`YYYYMMDDTHHMMSS`).
//!
//! Navitia reports every date-time as a fixed-width local string such as
//! `20260210T140000`. This module parses that layout strictly and converts
//! a handful of common human formats into it.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

/// `chrono` format string of the API layout.
pub const API_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Formats accepted by [`normalize`] in conversion mode, tried in order.
const CONVERTIBLE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y%m%d %H%M%S",
    "%d/%m/%Y %H:%M",
];

/// Length of `YYYYMMDDTHHMMSS`.
const API_LAYOUT_LEN: usize = 15;

/// Offset of the literal `T` separator.
const SEPARATOR_OFFSET: usize = 8;

/// Errors produced while parsing a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The input does not follow the expected layout.
    Layout(String),
    /// The layout is right but the date or time does not exist.
    OutOfRange(String),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(input) => write!(f, "Invalid format: '{input}'"),
            Self::OutOfRange(input) => write!(f, "Invalid date or time: '{input}'"),
        }
    }
}

impl std::error::Error for TimestampError {}

/// A date-time in the network's local time, at one-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parses the exact `YYYYMMDDTHHMMSS` layout.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Layout`] when the string is not 15 bytes of
    /// digits with a `T` at offset 8, and [`TimestampError::OutOfRange`] when
    /// it names an impossible calendar date or time (including leap seconds).
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        if !has_api_layout(input) {
            return Err(TimestampError::Layout(String::from(input)));
        }
        let parsed = NaiveDateTime::parse_from_str(input, API_FORMAT)
            .map_err(|_| TimestampError::OutOfRange(String::from(input)))?;
        if parsed.nanosecond() >= 1_000_000_000 {
            return Err(TimestampError::OutOfRange(String::from(input)));
        }
        Ok(Self(parsed))
    }

    /// Wraps an existing `NaiveDateTime`, dropping sub-second precision.
    #[must_use]
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    /// Whole minutes from `self` to `later`, rounded toward negative infinity.
    ///
    /// A difference of -1 second yields -1, not 0.
    #[must_use]
    pub fn minutes_until(self, later: Self) -> i64 {
        later
            .0
            .signed_duration_since(self.0)
            .num_seconds()
            .div_euclid(60)
    }

    /// `HH:MM` clock rendering.
    #[must_use]
    pub fn clock(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// Long English rendering, e.g. `Tuesday, February 10, 2026 at 14:00:00`.
    #[must_use]
    pub fn readable(&self) -> String {
        self.0.format("%A, %B %d, %Y at %H:%M:%S").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(API_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Checks the byte shape of `YYYYMMDDTHHMMSS` without interpreting values.
fn has_api_layout(input: &str) -> bool {
    input.len() == API_LAYOUT_LEN
        && input.bytes().enumerate().all(|(i, b)| {
            if i == SEPARATOR_OFFSET {
                b == b'T'
            } else {
                b.is_ascii_digit()
            }
        })
}

/// Renders an API timestamp as `HH:MM`, or returns the input unchanged when
/// it cannot be parsed.
#[must_use]
pub fn format_clock(input: &str) -> String {
    Timestamp::parse(input).map_or_else(|_| String::from(input), |ts| ts.clock())
}

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Parsed timestamp.
    pub timestamp: Timestamp,
    /// Source format when the input had to be converted.
    pub converted_from: Option<&'static str>,
}

/// Validates a datetime for the API, optionally converting common formats.
///
/// The API layout is always tried first. With `convert` set, the formats in
/// `CONVERTIBLE_FORMATS` are tried in order and the first match wins.
///
/// # Errors
///
/// Returns the strict parse error when `convert` is off, or
/// [`TimestampError::Layout`] when no accepted format matches.
pub fn normalize(input: &str, convert: bool) -> Result<Normalized, TimestampError> {
    match Timestamp::parse(input) {
        Ok(timestamp) => {
            return Ok(Normalized {
                timestamp,
                converted_from: None,
            });
        }
        Err(err) if !convert => return Err(err),
        Err(_) => {}
    }

    CONVERTIBLE_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDateTime::parse_from_str(input, format)
                .ok()
                .map(|value| Normalized {
                    timestamp: Timestamp::from_naive(value),
                    converted_from: Some(*format),
                })
        })
        .ok_or_else(|| TimestampError::Layout(String::from(input)))
}
