//! Candidate scanner: one pass over adjacent frames.
//!
//! Ingress: sign changed between the two samples. Station: sampled speed
//! changed sign. Aspect: the pair's deviation from an aspect angle entered
//! the orb, or sits in orb at a local minimum not already reported within
//! the re-trigger window.

use std::collections::HashMap;

use gochara_core::{Body, angular_separation, normalize_to_pm180};
use gochara_time::Instant;

use crate::event_types::{Bracket, CandidateEvent};
use crate::sample_types::SampleFrame;
use crate::search_types::{AspectKind, SearchConfig};

/// Scan `frames` (strictly increasing instants) for candidate events.
///
/// Candidates come out in bracket order; within one bracket, ingresses
/// first, then stations, then aspects.
pub fn scan(frames: &[SampleFrame], config: &SearchConfig) -> Vec<CandidateEvent> {
    let mut candidates = Vec::new();
    let mut last_aspect_fire: HashMap<(Body, Body, AspectKind), Instant> = HashMap::new();

    for i in 1..frames.len() {
        let prev = &frames[i - 1];
        let curr = &frames[i];
        let next = frames.get(i + 1);
        let bracket = Bracket {
            start: prev.instant,
            end: curr.instant,
        };

        scan_ingresses(prev, curr, bracket, config, &mut candidates);
        scan_stations(prev, curr, bracket, config, &mut candidates);
        scan_aspects(
            prev,
            curr,
            next,
            bracket,
            config,
            &mut last_aspect_fire,
            &mut candidates,
        );
    }

    candidates
}

fn scan_ingresses(
    prev: &SampleFrame,
    curr: &SampleFrame,
    bracket: Bracket,
    config: &SearchConfig,
    out: &mut Vec<CandidateEvent>,
) {
    for &body in &config.bodies {
        let (Some(a), Some(b)) = (prev.sample(body), curr.sample(body)) else {
            continue;
        };
        let (from_sign, to_sign) = (a.zodiac_sign(), b.zodiac_sign());
        if from_sign != to_sign {
            out.push(CandidateEvent::Ingress {
                body,
                from_sign,
                to_sign,
                bracket,
                start_longitude: a.longitude_deg,
                end_longitude: b.longitude_deg,
            });
        }
    }
}

fn scan_stations(
    prev: &SampleFrame,
    curr: &SampleFrame,
    bracket: Bracket,
    config: &SearchConfig,
    out: &mut Vec<CandidateEvent>,
) {
    for &body in config.bodies.iter().filter(|b| b.can_retrograde()) {
        let (Some(a), Some(b)) = (prev.sample(body), curr.sample(body)) else {
            continue;
        };
        let (v_a, v_b) = (a.speed_deg_per_day, b.speed_deg_per_day);
        if is_speed_reversal(v_a, v_b, config.station_noise_floor) {
            out.push(CandidateEvent::Station {
                body,
                bracket,
                start_speed: v_a,
                end_speed: v_b,
                end_longitude: b.longitude_deg,
            });
        }
    }
}

/// Opposite-signed nonzero speeds with at least one above the noise floor.
fn is_speed_reversal(v_a: f64, v_b: f64, noise_floor: f64) -> bool {
    v_a != 0.0
        && v_b != 0.0
        && (v_a > 0.0) != (v_b > 0.0)
        && (v_a.abs() > noise_floor || v_b.abs() > noise_floor)
}

fn scan_aspects(
    prev: &SampleFrame,
    curr: &SampleFrame,
    next: Option<&SampleFrame>,
    bracket: Bracket,
    config: &SearchConfig,
    last_fire: &mut HashMap<(Body, Body, AspectKind), Instant>,
    out: &mut Vec<CandidateEvent>,
) {
    for (i, &body_a) in config.bodies.iter().enumerate() {
        for &body_b in &config.bodies[i + 1..] {
            let (Some(pa), Some(pb), Some(ca), Some(cb)) = (
                prev.sample(body_a),
                prev.sample(body_b),
                curr.sample(body_a),
                curr.sample(body_b),
            ) else {
                continue;
            };
            let sep_prev = angular_separation(pa.longitude_deg, pb.longitude_deg);
            let sep_curr = angular_separation(ca.longitude_deg, cb.longitude_deg);
            let sep_next = next.and_then(|n| {
                let na = n.sample(body_a)?;
                let nb = n.sample(body_b)?;
                Some(angular_separation(na.longitude_deg, nb.longitude_deg))
            });

            for &aspect in &config.aspects {
                let angle = aspect.angle_deg();
                let dev_prev = (sep_prev - angle).abs();
                let dev_curr = (sep_curr - angle).abs();
                if dev_curr > config.orb_deg {
                    continue;
                }

                let key = (body_a, body_b, aspect);
                let crossing_in = dev_prev > config.orb_deg;
                let local_min = sep_next.is_some_and(|sep| {
                    dev_curr <= dev_prev && dev_curr <= (sep - angle).abs()
                }) && last_fire.get(&key).is_none_or(|&t| {
                    curr.instant.days_since(t) * 24.0 >= config.aspect_retrigger_hours
                });

                if crossing_in || local_min {
                    last_fire.insert(key, curr.instant);
                    out.push(CandidateEvent::Aspect {
                        body_a,
                        body_b,
                        aspect,
                        bracket,
                        end_longitude_a: ca.longitude_deg,
                        end_longitude_b: cb.longitude_deg,
                    });
                }
            }
        }
    }
}

/// Whether an ingress between two longitudes runs against sign order.
pub(crate) fn is_retrograde_crossing(start_longitude: f64, end_longitude: f64) -> bool {
    normalize_to_pm180(end_longitude - start_longitude) < 0.0
}
