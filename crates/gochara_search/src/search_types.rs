//! Configuration types for the yearly transit search.

use gochara_core::{ALL_BODIES, Body};
use serde::Serialize;

/// Angular relationships the scanner looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

/// The five major aspects in order of angle.
pub const ALL_ASPECTS: [AspectKind; 5] = [
    AspectKind::Conjunction,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Opposition,
];

impl AspectKind {
    /// Exact separation in degrees.
    pub const fn angle_deg(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ASPECTS
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for AspectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Refinement parameters shared by the three event refiners.
///
/// [`RefineConfig::precise`] runs every stage; [`RefineConfig::fast`] stops
/// stations after bisection and aspects after the minute scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Maximum bisection halvings (default 30).
    pub max_iterations: u32,
    /// Bisection stops once the bracket is narrower than this (default 1 s).
    pub convergence_seconds: f64,
    /// Half-width of the central difference used for speed (default 60 s).
    pub derivative_step_seconds: f64,
    /// Station coarse scan extends the bracket by this much each side (default 6 h).
    pub station_window_hours: f64,
    /// Station coarse scan step (default 30 s).
    pub station_coarse_step_seconds: f64,
    /// Station fine scan step (default 1 s).
    pub station_fine_step_seconds: f64,
    /// Station fine scan half-width (default 5 min).
    pub station_fine_radius_minutes: f64,
    /// Fine scan half-width when the coarse optimum lies this far or further
    /// from the bisection result (default 10 min).
    pub station_wide_radius_minutes: f64,
    /// Minimum padding around an aspect bracket (default 24 h).
    pub aspect_window_hours: f64,
    /// Run the scan stages after bisection (stations) and the per-second
    /// stage (aspects).
    pub multi_stage: bool,
}

impl RefineConfig {
    /// Full multi-stage refinement.
    pub fn precise() -> Self {
        Self {
            max_iterations: 30,
            convergence_seconds: 1.0,
            derivative_step_seconds: 60.0,
            station_window_hours: 6.0,
            station_coarse_step_seconds: 30.0,
            station_fine_step_seconds: 1.0,
            station_fine_radius_minutes: 5.0,
            station_wide_radius_minutes: 10.0,
            aspect_window_hours: 24.0,
            multi_stage: true,
        }
    }

    /// Bisection-only stations, two-stage aspects.
    pub fn fast() -> Self {
        Self {
            multi_stage: false,
            ..Self::precise()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        if !self.convergence_seconds.is_finite() || self.convergence_seconds <= 0.0 {
            return Err("convergence_seconds must be positive");
        }
        if !self.derivative_step_seconds.is_finite() || self.derivative_step_seconds <= 0.0 {
            return Err("derivative_step_seconds must be positive");
        }
        if !self.station_window_hours.is_finite() || self.station_window_hours < 0.0 {
            return Err("station_window_hours must be non-negative");
        }
        if !self.station_coarse_step_seconds.is_finite() || self.station_coarse_step_seconds <= 0.0
        {
            return Err("station_coarse_step_seconds must be positive");
        }
        if !self.station_fine_step_seconds.is_finite() || self.station_fine_step_seconds <= 0.0 {
            return Err("station_fine_step_seconds must be positive");
        }
        if !self.station_fine_radius_minutes.is_finite() || self.station_fine_radius_minutes <= 0.0
        {
            return Err("station_fine_radius_minutes must be positive");
        }
        if !self.station_wide_radius_minutes.is_finite()
            || self.station_wide_radius_minutes < self.station_fine_radius_minutes
        {
            return Err("station_wide_radius_minutes must be >= station_fine_radius_minutes");
        }
        if !self.aspect_window_hours.is_finite() || self.aspect_window_hours < 0.0 {
            return Err("aspect_window_hours must be non-negative");
        }
        Ok(())
    }
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self::precise()
    }
}

/// Parameters of one yearly search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Bodies to sample. Pairs for aspects are taken in this order.
    pub bodies: Vec<Body>,
    /// Aspects to detect between every pair of bodies.
    pub aspects: Vec<AspectKind>,
    /// Maximum deviation from the exact angle that counts as in aspect (default 0.5°).
    pub orb_deg: f64,
    /// Station candidates need one speed above this magnitude (default 1e-5 °/day).
    pub station_noise_floor: f64,
    /// Minimum spacing between local-minimum aspect candidates for the same
    /// pair and angle (default 18 h).
    pub aspect_retrigger_hours: f64,
    /// Aspect events for the same pair and angle closer than this are merged
    /// (default 18 h).
    pub dedup_window_hours: f64,
    /// Query topocentric rather than geocentric positions.
    pub topocentric: bool,
    pub refine: RefineConfig,
}

impl SearchConfig {
    /// All bodies, all five aspects, precise refinement.
    pub fn standard() -> Self {
        Self {
            bodies: ALL_BODIES.to_vec(),
            aspects: ALL_ASPECTS.to_vec(),
            orb_deg: 0.5,
            station_noise_floor: 1e-5,
            aspect_retrigger_hours: 18.0,
            dedup_window_hours: 18.0,
            topocentric: false,
            refine: RefineConfig::precise(),
        }
    }

    /// Same search restricted to `bodies`.
    pub fn for_bodies(bodies: &[Body]) -> Self {
        Self {
            bodies: bodies.to_vec(),
            ..Self::standard()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.bodies.is_empty() {
            return Err("bodies must not be empty");
        }
        for (i, body) in self.bodies.iter().enumerate() {
            if self.bodies[..i].contains(body) {
                return Err("bodies must not contain duplicates");
            }
        }
        for (i, aspect) in self.aspects.iter().enumerate() {
            if self.aspects[..i].contains(aspect) {
                return Err("aspects must not contain duplicates");
            }
        }
        if !self.orb_deg.is_finite() || self.orb_deg <= 0.0 || self.orb_deg > 15.0 {
            return Err("orb_deg must be in (0, 15]");
        }
        if !self.station_noise_floor.is_finite() || self.station_noise_floor < 0.0 {
            return Err("station_noise_floor must be non-negative");
        }
        if !self.aspect_retrigger_hours.is_finite() || self.aspect_retrigger_hours < 0.0 {
            return Err("aspect_retrigger_hours must be non-negative");
        }
        if !self.dedup_window_hours.is_finite() || self.dedup_window_hours < 0.0 {
            return Err("dedup_window_hours must be non-negative");
        }
        self.refine.validate()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_defaults() {
        let c = SearchConfig::standard();
        assert_eq!(c.bodies.len(), 10);
        assert_eq!(c.aspects.len(), 5);
        assert!((c.orb_deg - 0.5).abs() < 1e-12);
        assert!((c.aspect_retrigger_hours - 18.0).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn fast_differs_only_in_stages() {
        let p = RefineConfig::precise();
        let f = RefineConfig::fast();
        assert!(p.multi_stage);
        assert!(!f.multi_stage);
        assert_eq!(RefineConfig { multi_stage: true, ..f }, p);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn rejects_empty_bodies() {
        let c = SearchConfig::for_bodies(&[]);
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_bodies() {
        let c = SearchConfig::for_bodies(&[Body::Sun, Body::Mars, Body::Sun]);
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_bad_orb() {
        let mut c = SearchConfig::standard();
        c.orb_deg = 0.0;
        assert!(c.validate().is_err());
        c.orb_deg = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_iterations() {
        let mut c = SearchConfig::standard();
        c.refine.max_iterations = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_narrow_wide_radius() {
        let mut c = RefineConfig::precise();
        c.station_wide_radius_minutes = 1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn aspect_angles() {
        let angles: Vec<f64> = ALL_ASPECTS.iter().map(|a| a.angle_deg()).collect();
        assert_eq!(angles, vec![0.0, 60.0, 90.0, 120.0, 180.0]);
        assert_eq!(AspectKind::from_name("Trine"), Some(AspectKind::Trine));
        assert_eq!(AspectKind::from_name("quincunx"), None);
    }
}
