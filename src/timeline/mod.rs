//! Link status timeline.
//!
//! Answers "what was the status of pair (A, B) at time T" from a flat list of
//! link events. Two implementations share the [`LinkStatusSource`] contract:
//!
//! - [`ScanTimeline`]: full linear scan over every event on each query
//! - [`IndexedTimeline`]: per-pair event lists sorted by time, binary search
//!
//! Both resolve events at an identical timestamp the same way: the event that
//! was inserted first (CSV row order) wins.

pub mod indexed;
pub mod scan;

use serde::{Deserialize, Serialize};

use crate::model::{LinkEvent, TimeMs};

pub use indexed::IndexedTimeline;
pub use scan::ScanTimeline;

/// Most-recent-event-at-or-before query over link events
pub trait LinkStatusSource {
    /// Status of the unordered pair `(a, b)` at `time_ms`, or `None` when no
    /// event for the pair is effective yet.
    fn status_at(&self, a: &str, b: &str, time_ms: TimeMs) -> Option<&str>;

    /// Number of events held
    fn event_count(&self) -> usize;
}

/// Which timeline implementation backs the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineIndex {
    Scan,
    #[default]
    Indexed,
}

/// Build the configured timeline from events in insertion order
pub fn build_timeline(kind: TimelineIndex, events: Vec<LinkEvent>) -> Box<dyn LinkStatusSource> {
    log::debug!("Building {:?} link timeline over {} events", kind, events.len());
    match kind {
        TimelineIndex::Scan => Box::new(ScanTimeline::from_events(events)),
        TimelineIndex::Indexed => Box::new(IndexedTimeline::from_events(events)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<LinkEvent> {
        vec![
            LinkEvent::new("GS_01", "UAV_01", 0.0, "up"),
            LinkEvent::new("UAV_02", "UAV_01", 250.0, "up"),
            LinkEvent::new("UAV_01", "GS_01", 400.0, "degraded"),
            LinkEvent::new("UAV_01", "UAV_02", 250.0, "down"),
            LinkEvent::new("GS_01", "UAV_01", 400.0, "up"),
            LinkEvent::new("GS_01", "UAV_01", 900.0, "down"),
            LinkEvent::new("SAT_01", "GS_01", 100.0, ""),
        ]
    }

    #[test]
    fn test_scan_and_indexed_agree() {
        let mut events = sample_events();
        events.push(LinkEvent::new("GS_01", "UAV_01", f64::NAN, "x"));
        events.push(LinkEvent::new("SAT_01", "UAV_01", f64::NEG_INFINITY, "x"));
        events.push(LinkEvent::new("SAT_01", "GS_01", f64::INFINITY, "x"));

        let scan = build_timeline(TimelineIndex::Scan, events.clone());
        let indexed = build_timeline(TimelineIndex::Indexed, events);
        let ids = ["GS_01", "UAV_01", "UAV_02", "SAT_01", "UNKNOWN"];
        let times = [
            -1.0,
            0.0,
            50.0,
            100.0,
            249.9,
            250.0,
            399.0,
            400.0,
            401.0,
            900.0,
            1e9,
            f64::INFINITY,
        ];

        for a in ids {
            for b in ids {
                for t in times {
                    assert_eq!(
                        scan.status_at(a, b, t),
                        indexed.status_at(a, b, t),
                        "mismatch for ({}, {}) at {}",
                        a,
                        b,
                        t
                    );
                }
            }
        }
        assert_eq!(scan.event_count(), 7);
        assert_eq!(indexed.event_count(), 7);
    }

    #[test]
    fn test_non_finite_event_times_are_ignored() {
        let events = vec![
            LinkEvent::new("A", "B", 100.0, "up"),
            LinkEvent::new("A", "B", f64::NAN, "x"),
            LinkEvent::new("B", "A", 50.0, "down"),
        ];
        for kind in [TimelineIndex::Scan, TimelineIndex::Indexed] {
            let timeline = build_timeline(kind, events.clone());
            assert_eq!(timeline.status_at("A", "B", 75.0), Some("down"));
            assert_eq!(timeline.status_at("A", "B", 100.0), Some("up"));
            assert_eq!(timeline.event_count(), 2);
        }
    }

    #[test]
    fn test_tie_resolves_to_first_inserted() {
        for kind in [TimelineIndex::Scan, TimelineIndex::Indexed] {
            let timeline = build_timeline(kind, sample_events());
            assert_eq!(timeline.status_at("UAV_01", "UAV_02", 300.0), Some("up"));
            assert_eq!(timeline.status_at("GS_01", "UAV_01", 400.0), Some("degraded"));
            // Repeated queries are stable
            assert_eq!(timeline.status_at("UAV_01", "GS_01", 400.0), Some("degraded"));
        }
    }

    #[test]
    fn test_empty_status_is_kept() {
        let timeline = build_timeline(TimelineIndex::Indexed, sample_events());
        assert_eq!(timeline.status_at("GS_01", "SAT_01", 150.0), Some(""));
    }
}
