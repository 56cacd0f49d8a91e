//! sncf - SNCF train schedule CLI.

/// Application configuration (TOML) and token resolution.
mod config;
/// Human-readable and JSON output.
mod render;
/// Failure hints and empty-result warnings.
mod report;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sncf_api::disruption::Axis;
use sncf_api::navitia::{
    BoardParams, DEFAULT_TIMEOUT, DataFreshness, DatetimeRepresents, JourneyParams,
    LocalNavitiaApi, NavitiaClient, PlacesParams, lookup_station, search_stations,
    validate_station_id_format,
};
use sncf_api::timestamp::{Timestamp, normalize};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TOKEN_ENV_VAR, resolve_config_path, resolve_token};
use crate::report::Subject;

/// Journey planning is slower than board lookups.
const JOURNEY_TIMEOUT: Duration = Duration::from_secs(15);

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show upcoming departures from a station.
    Departures(BoardArgs),
    /// Show upcoming arrivals at a station.
    Arrivals(BoardArgs),
    /// Plan journeys between two locations.
    Journey(JourneyArgs),
    /// Search stations by name.
    Stations(StationsArgs),
    /// Check that a station ID exists.
    ValidateStation(ValidateStationArgs),
    /// Check (and optionally convert) a datetime for the API.
    ValidateDatetime(ValidateDatetimeArgs),
}

/// Output format.
#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Numbered, human-readable list.
    #[default]
    Human,
    /// Pretty-printed JSON of the API items.
    Json,
}

/// Timetable to query.
#[derive(Clone, Copy, Default, ValueEnum)]
enum FreshnessArg {
    /// Realtime data with disruptions applied.
    #[default]
    Realtime,
    /// Theoretical schedule only.
    #[value(name = "base_schedule")]
    BaseSchedule,
}

impl From<FreshnessArg> for DataFreshness {
    fn from(value: FreshnessArg) -> Self {
        match value {
            FreshnessArg::Realtime => Self::Realtime,
            FreshnessArg::BaseSchedule => Self::BaseSchedule,
        }
    }
}

/// Meaning of `--datetime` for journeys.
#[derive(Clone, Copy, Default, ValueEnum)]
enum RepresentsArg {
    /// Leave at or after the datetime.
    #[default]
    Departure,
    /// Arrive at or before the datetime.
    Arrival,
}

impl From<RepresentsArg> for DatetimeRepresents {
    fn from(value: RepresentsArg) -> Self {
        match value {
            RepresentsArg::Departure => Self::Departure,
            RepresentsArg::Arrival => Self::Arrival,
        }
    }
}

/// Arguments for the `departures` and `arrivals` subcommands.
#[derive(clap::Args)]
struct BoardArgs {
    /// Station ID (e.g. "stop_area:SNCF:87686006").
    station_id: String,
    /// Number of rows.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,
    /// Start of the board, YYYYMMDDTHHMMSS (default: now).
    #[arg(long, value_parser = parse_datetime)]
    datetime: Option<Timestamp>,
    /// Timetable to query.
    #[arg(long, value_enum, default_value_t)]
    data_freshness: FreshnessArg,
    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

/// Arguments for the `journey` subcommand.
#[derive(clap::Args)]
struct JourneyArgs {
    /// Origin: station ID or "lon;lat".
    from: String,
    /// Destination: station ID or "lon;lat".
    to: String,
    /// Reference datetime, YYYYMMDDTHHMMSS (default: now).
    #[arg(long, value_parser = parse_datetime)]
    datetime: Option<Timestamp>,
    /// Whether --datetime is the departure or the arrival time.
    #[arg(long, value_enum, default_value_t)]
    datetime_represents: RepresentsArg,
    /// Number of journeys.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,
    /// Timetable to query.
    #[arg(long, value_enum, default_value_t)]
    data_freshness: FreshnessArg,
    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

/// Arguments for the `stations` subcommand.
#[derive(clap::Args)]
struct StationsArgs {
    /// Search text (e.g. "Paris Gare de Lyon").
    query: String,
    /// Maximum number of results.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,
    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

/// Arguments for the `validate-station` subcommand.
#[derive(clap::Args)]
struct ValidateStationArgs {
    /// Station ID to check.
    station_id: String,
}

/// Arguments for the `validate-datetime` subcommand.
#[derive(clap::Args)]
struct ValidateDatetimeArgs {
    /// Datetime to check.
    value: String,
    /// Also accept common formats (e.g. "2026-02-10 14:00") and convert them.
    #[arg(long)]
    convert: bool,
}

/// Clap value parser for `--datetime`.
fn parse_datetime(value: &str) -> std::result::Result<Timestamp, String> {
    Timestamp::parse(value).map_err(|err| {
        format!("{err} (required format: YYYYMMDDTHHMMSS, example: 20260210T140000)")
    })
}

/// Writes command output to stdout.
fn emit(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}").context("failed to write to stdout")
}

/// Writes a result list in the requested format.
///
/// An empty list prints nothing in human format and `[]` in JSON.
fn emit_list<T: Serialize>(
    items: &[T],
    format: OutputFormat,
    human: impl FnOnce(&[T]) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => emit(&render::to_json(items)?),
        OutputFormat::Human if items.is_empty() => Ok(()),
        OutputFormat::Human => emit(&human(items)),
    }
}

/// Builds a `NavitiaClient` from the resolved token and `config.toml`.
///
/// `default_timeout` applies when the config does not set `api.timeout_secs`.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, no token is found, or
/// the client fails to build.
#[instrument(skip_all)]
fn build_client(dir: Option<&PathBuf>, default_timeout: Duration) -> Result<NavitiaClient> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;
    let work_dir = std::env::current_dir().context("failed to determine working directory")?;

    let Some(token) = resolve_token(std::env::var(TOKEN_ENV_VAR).ok(), &work_dir, &config) else {
        report::token_hints();
        bail!("{TOKEN_ENV_VAR} environment variable not set");
    };
    tracing::debug!(source = %token.source, "using API token");

    let mut builder = NavitiaClient::builder()
        .api_token(token.value)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.api.timeout_or(default_timeout));
    if let Some(base_url) = config.api.base_url()? {
        builder = builder.base_url(base_url);
    }

    builder.build().context("failed to build Navitia client")
}

/// Runs the `departures` and `arrivals` subcommands.
///
/// # Errors
///
/// Returns an error if the station ID is malformed, the client fails to
/// build, or the API request fails.
#[instrument(skip_all)]
async fn run_board(args: &BoardArgs, axis: Axis, dir: Option<&PathBuf>) -> Result<()> {
    let station_id = validate_station_id_format(&args.station_id)?;
    let client = build_client(dir, DEFAULT_TIMEOUT)?;

    let params = BoardParams {
        count: args.count,
        from_datetime: args.datetime.map(|dt| dt.to_string()),
        data_freshness: args.data_freshness.into(),
    };

    let (kind, result) = match axis {
        Axis::Departure => ("departures", client.departures(&station_id, &params).await),
        Axis::Arrival => ("arrivals", client.arrivals(&station_id, &params).await),
    };
    let passages = match result {
        Ok(passages) => passages,
        Err(err) => {
            report::failure_hints(&err, Subject::Station(&station_id));
            return Err(err.context(format!("failed to fetch {kind}")));
        }
    };

    tracing::info!(%station_id, rows = passages.len(), "Fetched {kind}");
    if passages.is_empty() {
        report::empty_result(Subject::Station(&station_id), kind, args.datetime.is_some());
    }

    emit_list(&passages, args.format, |items| render::render_board(items, axis))
}

/// Runs the `journey` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_journey(args: &JourneyArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir, JOURNEY_TIMEOUT)?;

    let mut params = JourneyParams::new(args.from.trim(), args.to.trim())
        .count(args.count)
        .data_freshness(args.data_freshness.into());
    if let Some(datetime) = args.datetime {
        params = params.datetime(datetime.to_string(), args.datetime_represents.into());
    }

    let journeys = match client.journeys(&params).await {
        Ok(journeys) => journeys,
        Err(err) => {
            report::failure_hints(&err, Subject::Journey);
            return Err(err.context("failed to plan journey"));
        }
    };

    tracing::info!(from = %params.from, to = %params.to, count = journeys.len(), "Planned journeys");
    if journeys.is_empty() {
        report::empty_result(Subject::Journey, "journeys", args.datetime.is_some());
    }

    emit_list(&journeys, args.format, render::render_journeys)
}

/// Runs the `stations` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_stations(args: &StationsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir, DEFAULT_TIMEOUT)?;
    let params = PlacesParams::new(args.query.trim()).count(args.count);

    let stations = match search_stations(&client, &params).await {
        Ok(stations) => stations,
        Err(err) => {
            report::failure_hints(&err, Subject::Search(&params.query));
            return Err(err);
        }
    };

    tracing::info!(query = %params.query, hits = stations.len(), "Searched stations");
    if stations.is_empty() {
        report::empty_result(Subject::Search(&params.query), "stations", false);
    }

    emit_list(&stations, args.format, render::render_stations)
}

/// Runs the `validate-station` subcommand.
///
/// # Errors
///
/// Returns an error if the ID is malformed, the station does not exist, or
/// the API request fails.
#[instrument(skip_all)]
async fn run_validate_station(args: &ValidateStationArgs, dir: Option<&PathBuf>) -> Result<()> {
    let station_id = validate_station_id_format(&args.station_id)?;
    let client = build_client(dir, DEFAULT_TIMEOUT)?;

    let area = match lookup_station(&client, &station_id).await {
        Ok(area) => area,
        Err(err) => {
            report::failure_hints(&err, Subject::Station(&station_id));
            return Err(err.context("failed to validate station"));
        }
    };

    let Some(area) = area else {
        report::station_not_found(&station_id);
        bail!("Station ID not found: '{station_id}'");
    };

    emit(&render::render_station(&station_id, &area))
}

/// Runs the `validate-datetime` subcommand. Needs no token or network.
///
/// # Errors
///
/// Returns an error if the value matches no accepted format.
#[instrument(skip_all)]
fn run_validate_datetime(args: &ValidateDatetimeArgs) -> Result<()> {
    match normalize(&args.value, args.convert) {
        Ok(normalized) => emit(&render::render_datetime(&normalized)),
        Err(err) => {
            tracing::warn!("Required format: YYYYMMDDTHHmmss");
            tracing::warn!("Example: 20260210T140000");
            if !args.convert {
                tracing::warn!(
                    "Use --convert to convert from common formats: sncf validate-datetime '2026-02-10 14:00:00' --convert"
                );
            }
            Err(err.into())
        }
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Departures(args) => run_board(&args, Axis::Departure, cli.dir.as_ref()).await,
        Commands::Arrivals(args) => run_board(&args, Axis::Arrival, cli.dir.as_ref()).await,
        Commands::Journey(args) => run_journey(&args, cli.dir.as_ref()).await,
        Commands::Stations(args) => run_stations(&args, cli.dir.as_ref()).await,
        Commands::ValidateStation(args) => run_validate_station(&args, cli.dir.as_ref()).await,
        Commands::ValidateDatetime(args) => run_validate_datetime(&args),
    }
}
