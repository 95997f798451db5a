//! Yearly transit event engine: ingresses, stations and aspects.
//!
//! This crate provides:
//! - A position sampler driving a [`PositionOracle`](gochara_core::PositionOracle)
//!   across an even grid over the year
//! - A single-pass candidate scanner over adjacent sample frames
//! - Per-kind refiners: ingress bisection, hybrid station search, and
//!   hierarchical aspect scan
//! - Aspect deduplication
//! - [`YearCache`], a bounded thread-safe memo in front of the pipeline

pub mod cache;
pub mod dedup;
pub mod error;
pub mod event_types;
pub mod refine;
pub mod sample_types;
pub mod sampler;
pub mod scanner;
pub(crate) mod search_util;
pub mod search_types;
pub mod year;

pub use cache::{DEFAULT_CACHE_CAPACITY, YearCache, YearOutcome};
pub use dedup::deduplicate;
pub use error::SearchError;
pub use event_types::{
    AspectEvent, Bracket, CandidateEvent, Event, EventKind, IngressEvent, StationEvent,
    StationType,
};
pub use refine::refine;
pub use sample_types::{BodySample, SampleFrame};
pub use sampler::{
    DEFAULT_SAMPLE_INTERVAL_HOURS, MAX_SAMPLE_INTERVAL_HOURS, MIN_SAMPLE_INTERVAL_HOURS,
    sample_range, sample_year, validate_sample_interval,
};
pub use scanner::scan;
pub use search_types::{ALL_ASPECTS, AspectKind, RefineConfig, SearchConfig};
pub use year::{YearResult, compute_year};
