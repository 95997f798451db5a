//! Collapse repeated detections of the same aspect.

use std::collections::BTreeMap;

use gochara_core::Body;

use crate::event_types::{AspectEvent, Event, chronological};
use crate::search_types::AspectKind;

/// Merge aspect events for the same pair and angle that fall within
/// `min_separation_hours` of the last kept one, keeping the smaller orb.
///
/// Ingress and station events pass through untouched. The output is sorted
/// chronologically.
pub fn deduplicate(events: Vec<Event>, min_separation_hours: f64) -> Vec<Event> {
    let mut out = Vec::with_capacity(events.len());
    let mut groups: BTreeMap<(Body, Body, AspectKind), Vec<AspectEvent>> = BTreeMap::new();

    for event in events {
        match event {
            Event::Aspect(a) => groups
                .entry((a.body_a, a.body_b, a.aspect))
                .or_default()
                .push(a),
            other => out.push(other),
        }
    }

    for mut group in groups.into_values() {
        group.sort_by(|a, b| a.instant.cmp(&b.instant));
        let mut kept: Vec<AspectEvent> = Vec::with_capacity(group.len());
        for event in group {
            match kept.last_mut() {
                Some(last)
                    if event.instant.days_since(last.instant) * 24.0 < min_separation_hours =>
                {
                    if event.orb_deg < last.orb_deg {
                        *last = event;
                    }
                }
                _ => kept.push(event),
            }
        }
        out.extend(kept.into_iter().map(Event::Aspect));
    }

    out.sort_by(chronological);
    out
}
