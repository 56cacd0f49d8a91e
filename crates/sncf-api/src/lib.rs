//! API client library for sncf.
//!
//! Provides the Navitia client, the timestamp utilities, and the
//! disruption evaluator shared by every formatter.

/// Delay and cancellation labels for stop events.
pub mod disruption;

/// Navitia coverage API client.
pub mod navitia;

/// Navitia `YYYYMMDDTHHMMSS` timestamps.
pub mod timestamp;
