use std::sync::Arc;

use clap::{Parser, Subcommand};
use gochara_core::{Body, GeoLocation, PositionOracle, ZodiacSign, normalize_360};
use gochara_ephem::MeanElementOracle;
use gochara_search::{
    AspectKind, DEFAULT_SAMPLE_INTERVAL_HOURS, Event, RefineConfig, SearchConfig, StationType,
    YearCache, YearOutcome,
};
use gochara_time::{Instant, UtcTime};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gochara", about = "Yearly transit event engine")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingresses, stations and aspects for one calendar year
    YearEvents {
        /// Gregorian year
        #[arg(long)]
        year: i32,
        /// Latitude in degrees, north positive
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees, east positive
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Altitude in meters
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        alt: f64,
        /// Sample spacing in hours
        #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL_HOURS)]
        interval: f64,
        /// Restrict to these bodies (repeatable; default all)
        #[arg(long = "body")]
        bodies: Vec<String>,
        /// Restrict to these aspects (repeatable; default all five)
        #[arg(long = "aspect")]
        aspects: Vec<String>,
        /// Aspect orb in degrees
        #[arg(long)]
        orb: Option<f64>,
        /// Cheaper refinement (bisection-only stations, minute-level aspects)
        #[arg(long)]
        fast: bool,
        /// Topocentric instead of geocentric positions
        #[arg(long)]
        topocentric: bool,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a UTC date/time to a Julian Date
    ToInstant {
        /// UTC datetime (YYYY-MM-DDThh:mm:ssZ)
        date: String,
    },
    /// Convert a Julian Date (UTC) to a calendar date
    ToCalendar {
        /// Julian Date
        jd: f64,
    },
    /// Ecliptic position of one body from the mean-element oracle
    Position {
        /// UTC datetime (YYYY-MM-DDThh:mm:ssZ)
        #[arg(long)]
        date: String,
        /// Body name (Sun, Moon, Mercury, ... Pluto)
        #[arg(long)]
        body: String,
        /// Latitude in degrees, north positive
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees, east positive
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        lon: f64,
        /// Apply diurnal parallax for the location
        #[arg(long)]
        topocentric: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::YearEvents {
            year,
            lat,
            lon,
            alt,
            interval,
            bodies,
            aspects,
            orb,
            fast,
            topocentric,
            json,
        } => {
            let mut config = if bodies.is_empty() {
                SearchConfig::standard()
            } else {
                let parsed: Vec<Body> = bodies.iter().map(|b| require_body(b)).collect();
                SearchConfig::for_bodies(&parsed)
            };
            if !aspects.is_empty() {
                config.aspects = aspects.iter().map(|a| require_aspect(a)).collect();
            }
            if let Some(orb) = orb {
                config.orb_deg = orb;
            }
            if fast {
                config.refine = RefineConfig::fast();
            }
            config.topocentric = topocentric;

            let oracle: Arc<dyn PositionOracle> = Arc::new(MeanElementOracle::new());
            let cache = YearCache::new(oracle, config).unwrap_or_else(|e| {
                eprintln!("Invalid configuration: {e}");
                std::process::exit(1);
            });
            let location = GeoLocation::new(lat, lon, alt);
            let outcome = cache
                .get_or_compute(year, location, interval)
                .unwrap_or_else(|e| {
                    eprintln!("Year computation failed: {e}");
                    std::process::exit(1);
                });

            if json {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(s) => println!("{s}"),
                    Err(e) => {
                        eprintln!("JSON encoding failed: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print_year(&outcome);
            }
        }
        Commands::ToInstant { date } => {
            let instant = parse_instant(&date);
            println!("JD (UTC): {:.8}", instant.jd());
            println!("Centuries since J2000: {:.10}", instant.centuries_since_j2000());
        }
        Commands::ToCalendar { jd } => {
            let instant = Instant::from_jd(jd).unwrap_or_else(|e| {
                eprintln!("Invalid Julian Date: {e}");
                std::process::exit(1);
            });
            println!("{}", instant.to_calendar());
            println!("Rounded: {instant}");
        }
        Commands::Position {
            date,
            body,
            lat,
            lon,
            topocentric,
        } => {
            let instant = parse_instant(&date);
            let body = require_body(&body);
            let location = GeoLocation::from_lat_lon(lat, lon);
            if let Err(e) = location.validate() {
                eprintln!("Invalid location: {e}");
                std::process::exit(1);
            }
            let oracle = MeanElementOracle::new();
            match oracle.position_at(instant, body, &location, topocentric) {
                Ok(pos) => {
                    let lon = normalize_360(pos.longitude_deg);
                    let sign = ZodiacSign::from_longitude(lon);
                    println!("{body} at {instant}");
                    let within = lon - sign.start_longitude();
                    println!("  Longitude: {lon:.6} deg ({sign} {within:.4})");
                    println!("  Latitude:  {:.6} deg", pos.latitude_deg);
                    println!("  Distance:  {:.8} AU", pos.distance_au);
                }
                Err(e) => {
                    eprintln!("Position query failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();
}

fn print_year(outcome: &YearOutcome) {
    let result = &outcome.result;
    println!(
        "Year {} at ({:.4}, {:.4}), {} h grid, {} samples{}",
        result.year,
        result.location.latitude_deg,
        result.location.longitude_deg,
        result.sample_interval_hours,
        result.frames.len(),
        if outcome.cached { " (cached)" } else { "" }
    );
    println!(
        "Oracle calls: {} ({} failed)",
        result.stats.oracle_calls, result.stats.failures
    );
    println!("Events: {}", result.events.len());
    for event in &result.events {
        match event {
            Event::Ingress(e) => println!(
                "  {}  ingress  {:<8} {} -> {}{}",
                e.instant,
                e.body.name(),
                e.from_sign,
                e.to_sign,
                if e.is_retrograde { " (retrograde)" } else { "" }
            ),
            Event::Station(e) => println!(
                "  {}  station  {:<8} {} at {} {:.4}",
                e.instant,
                e.body.name(),
                match e.station_type {
                    StationType::Retrograde => "retrograde",
                    StationType::Direct => "direct",
                },
                e.sign,
                e.longitude_deg - e.sign.start_longitude()
            ),
            Event::Aspect(e) => println!(
                "  {}  aspect   {:<8} {} {} (orb {:.4})",
                e.instant,
                e.body_a.name(),
                e.aspect,
                e.body_b.name(),
                e.orb_deg
            ),
        }
    }
}

fn parse_instant(s: &str) -> Instant {
    s.parse::<UtcTime>()
        .and_then(|utc| utc.to_instant())
        .unwrap_or_else(|e| {
            eprintln!("Invalid date '{s}': {e}");
            std::process::exit(1);
        })
}

fn require_body(name: &str) -> Body {
    Body::from_name(name).unwrap_or_else(|| {
        eprintln!("Invalid body: {name}");
        eprintln!("Valid: Sun, Moon, Mercury, Venus, Mars, Jupiter, Saturn, Uranus, Neptune, Pluto");
        std::process::exit(1);
    })
}

fn require_aspect(name: &str) -> AspectKind {
    AspectKind::from_name(name).unwrap_or_else(|| {
        eprintln!("Invalid aspect: {name}");
        eprintln!("Valid: conjunction, sextile, square, trine, opposition");
        std::process::exit(1);
    })
}
