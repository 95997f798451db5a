//! Year pipeline: sample → scan → refine → deduplicate.

use gochara_core::{GeoLocation, PositionOracle, QuerySession, QueryStats};
use gochara_time::Instant;
use serde::Serialize;
use tracing::{debug, info};

use crate::dedup::deduplicate;
use crate::error::SearchError;
use crate::event_types::Event;
use crate::refine::refine;
use crate::sample_types::SampleFrame;
use crate::sampler::{sample_year, validate_sample_interval};
use crate::scanner::scan;
use crate::search_types::SearchConfig;

/// Samples and refined events for one (year, location, interval).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub year: i32,
    pub location: GeoLocation,
    pub sample_interval_hours: f64,
    #[serde(rename = "samples")]
    pub frames: Vec<SampleFrame>,
    /// Events within the year, chronological.
    pub events: Vec<Event>,
    /// Oracle usage of the computation that produced this result.
    pub stats: QueryStats,
}

impl YearResult {
    /// Events involving `body`, in order.
    pub fn events_for(&self, body: gochara_core::Body) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.involves(body))
    }
}

/// Run the full pipeline for `year` at `location`, without caching.
///
/// Oracle failures degrade individual samples or events; the only
/// computation failure is [`SearchError::NoSamples`].
pub fn compute_year(
    oracle: &dyn PositionOracle,
    year: i32,
    location: GeoLocation,
    sample_interval_hours: f64,
    config: &SearchConfig,
) -> Result<YearResult, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    location.validate().map_err(SearchError::InvalidConfig)?;
    validate_sample_interval(sample_interval_hours).map_err(SearchError::InvalidConfig)?;

    let year_start = Instant::year_start(year)?;
    let year_end = Instant::year_start(year + 1)?;
    let session = QuerySession::new(oracle, location, config.topocentric);

    let frames = sample_year(&session, year, sample_interval_hours, &config.bodies)?;
    let sampling_calls = session.stats().oracle_calls;

    let candidates = scan(&frames, config);
    debug!(year, candidates = candidates.len(), "scan complete");

    let refined: Vec<Event> = candidates
        .iter()
        .map(|c| refine(&session, c, &config.refine))
        .filter(|e| (year_start..year_end).contains(&e.instant()))
        .collect();
    let refined_count = refined.len();
    let events = deduplicate(refined, config.dedup_window_hours);
    debug!(
        year,
        refined = refined_count,
        kept = events.len(),
        "deduplication complete"
    );

    let stats = session.stats();
    info!(
        year,
        oracle = oracle.name(),
        frames = frames.len(),
        events = events.len(),
        sampling_calls,
        oracle_calls = stats.oracle_calls,
        oracle_failures = stats.failures,
        "year computed"
    );

    Ok(YearResult {
        year,
        location,
        sample_interval_hours,
        frames,
        events,
        stats,
    })
}
