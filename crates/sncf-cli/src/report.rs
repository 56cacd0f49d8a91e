//! Diagnostics written to the log: failure hints and empty-result warnings.

use sncf_api::navitia::NavitiaError;

use crate::config::TOKEN_ENV_VAR;

/// Where developers request a Navitia token.
pub const TOKEN_URL: &str = "https://numerique.sncf.com/startup/api/token-developpeur/";

/// What the failed command was looking up.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// A station board or station validation.
    Station(&'a str),
    /// A journey between two locations.
    Journey,
    /// A station search query.
    Search(&'a str),
}

/// Logs how to obtain and set a token.
pub fn token_hints() {
    tracing::warn!("Get a token at: {TOKEN_URL}");
    tracing::warn!("Set it with: export {TOKEN_ENV_VAR}='your-token'");
}

/// Logs that a station does not exist and how to find valid IDs.
pub fn station_not_found(id: &str) {
    tracing::warn!("Station ID '{id}' not found");
    tracing::warn!("Search stations with: sncf stations 'name'");
}

/// Logs actionable hints for a failed API call.
///
/// Errors that are not [`NavitiaError`] get no hint.
pub fn failure_hints(err: &anyhow::Error, subject: Subject<'_>) {
    let Some(api_err) = err.downcast_ref::<NavitiaError>() else {
        return;
    };

    match (api_err, subject) {
        (NavitiaError::Unauthorized, _) => token_hints(),
        (NavitiaError::NotFound, Subject::Station(id)) => station_not_found(id),
        (NavitiaError::NotFound, Subject::Journey) => {
            tracing::warn!("Invalid location");
            tracing::warn!(
                "Locations should be station IDs (stop_area:SNCF:...) or coordinates (lon;lat)"
            );
        }
        (NavitiaError::BadRequest(_), Subject::Search(query)) => {
            tracing::warn!("Invalid search query: '{query}'");
        }
        (NavitiaError::Timeout | NavitiaError::Network(_), _) => {
            tracing::warn!("Retry the request or check your connection");
        }
        (NavitiaError::NotFound, Subject::Search(_))
        | (NavitiaError::BadRequest(_) | NavitiaError::Status(_), _) => {}
    }
}

/// Logs that a listing command returned nothing.
pub fn empty_result(subject: Subject<'_>, kind: &str, has_datetime: bool) {
    match subject {
        Subject::Station(id) => {
            tracing::warn!("No {kind} found for station '{id}'");
            if has_datetime {
                tracing::warn!("Try a different datetime or check the station ID");
            }
        }
        Subject::Journey => {
            tracing::warn!("No {kind} found");
            tracing::warn!("Check that both locations are valid station IDs or coordinates");
        }
        Subject::Search(query) => {
            tracing::warn!("No {kind} found for '{query}'");
            tracing::warn!("Try a different search term or check spelling");
        }
    }
}
