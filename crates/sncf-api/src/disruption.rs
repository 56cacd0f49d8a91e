//! Disruption evaluation for stop events and journeys.
//!
//! Every formatter goes through this module to turn a scheduled/actual
//! timestamp pair and its status flags into a delay and a short label.
//! Malformed or missing data never fails: it resolves to "no delay".

use std::fmt;

use crate::timestamp::Timestamp;

/// Label shown for a cancelled stop or journey.
pub const CANCELLED_LABEL: &str = "❌ SUPPRIMÉ";

/// Label shown for a journey running with delays or a modified service.
pub const WARNING_LABEL: &str = "⚠️";

/// Which timestamp pair of a stop event is examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `base_departure_date_time` / `departure_date_time`.
    Departure,
    /// `base_arrival_date_time` / `arrival_date_time`.
    Arrival,
}

impl Axis {
    /// Status flag marking the stop as cancelled on this axis.
    #[must_use]
    pub const fn cancellation_flag(self) -> &'static str {
        match self {
            Self::Departure => "no_departing",
            Self::Arrival => "no_arriving",
        }
    }
}

/// A stop occurrence carrying scheduled and actual timestamps plus flags.
///
/// Implementors expose raw API strings; absent keys map to `None`.
pub trait StopEvent {
    /// Scheduled (base) timestamp on `axis`.
    fn scheduled(&self, axis: Axis) -> Option<&str>;

    /// Actual (realtime) timestamp on `axis`.
    fn actual(&self, axis: Axis) -> Option<&str>;

    /// Free-form status flags.
    fn flags(&self) -> &[String];
}

/// Timing classification of one stop event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disruption {
    /// On time, or not enough data to tell.
    OnTime,
    /// Late by the given positive number of minutes.
    Delayed(i64),
    /// Early by the given negative number of minutes.
    Early(i64),
    /// The stop will not be served on this axis.
    Cancelled,
}

impl fmt::Display for Disruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTime => Ok(()),
            Self::Delayed(minutes) => write!(f, "+{minutes}min"),
            Self::Early(minutes) => write!(f, "{minutes}min"),
            Self::Cancelled => f.write_str(CANCELLED_LABEL),
        }
    }
}

/// Signed delay in minutes between two API timestamps.
///
/// Positive means `actual` is later than `scheduled`. Returns `0` when either
/// side is absent or unparseable.
#[must_use]
pub fn compute_delay_minutes(scheduled: Option<&str>, actual: Option<&str>) -> i64 {
    let (Some(scheduled), Some(actual)) = (scheduled, actual) else {
        return 0;
    };
    match (Timestamp::parse(scheduled), Timestamp::parse(actual)) {
        (Ok(scheduled), Ok(actual)) => scheduled.minutes_until(actual),
        _ => 0,
    }
}

/// Classifies a stop event on `axis`.
///
/// Cancellation wins over everything. Missing or textually identical
/// timestamps short-circuit to [`Disruption::OnTime`] before any parsing.
#[must_use]
pub fn classify(event: &impl StopEvent, axis: Axis) -> Disruption {
    let cancellation = axis.cancellation_flag();
    if event.flags().iter().any(|flag| flag == cancellation) {
        return Disruption::Cancelled;
    }

    let scheduled = event.scheduled(axis).filter(|s| !s.is_empty());
    let actual = event.actual(axis).filter(|s| !s.is_empty());
    let (Some(scheduled), Some(actual)) = (scheduled, actual) else {
        return Disruption::OnTime;
    };
    if scheduled == actual {
        return Disruption::OnTime;
    }

    match compute_delay_minutes(Some(scheduled), Some(actual)) {
        0 => Disruption::OnTime,
        minutes if minutes > 0 => Disruption::Delayed(minutes),
        minutes => Disruption::Early(minutes),
    }
}

/// Disruption label for a stop event: `"+7min"`, `"-5min"`,
/// [`CANCELLED_LABEL`], or `""` when on time.
#[must_use]
pub fn format_disruption(event: &impl StopEvent, axis: Axis) -> String {
    classify(event, axis).to_string()
}

/// Label for a journey-level `status` field.
///
/// Exact, case-sensitive lookup; unknown values map to `""`.
#[must_use]
pub fn format_journey_status(status: Option<&str>) -> &'static str {
    match status {
        Some("SIGNIFICANT_DELAYS" | "MODIFIED_SERVICE") => WARNING_LABEL,
        Some("NO_SERVICE") => CANCELLED_LABEL,
        _ => "",
    }
}
