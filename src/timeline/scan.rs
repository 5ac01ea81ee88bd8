//! Linear-scan link timeline.

use crate::model::{LinkEvent, TimeMs};

use super::LinkStatusSource;

/// Flat, unordered event list queried by a full scan
#[derive(Debug, Clone, Default)]
pub struct ScanTimeline {
    events: Vec<LinkEvent>,
}

impl ScanTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<LinkEvent>) -> Self {
        let mut timeline = Self::new();
        for event in events {
            timeline.push(event);
        }
        timeline
    }

    /// Append an event; insertion order is kept for tie resolution.
    /// Events without a finite timestamp are ignored.
    pub fn push(&mut self, event: LinkEvent) {
        if event.time_ms.is_finite() {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[LinkEvent] {
        &self.events
    }
}

impl LinkStatusSource for ScanTimeline {
    fn status_at(&self, a: &str, b: &str, time_ms: TimeMs) -> Option<&str> {
        let mut latest: Option<&LinkEvent> = None;

        for event in &self.events {
            if !(event.time_ms <= time_ms) || !event.pair.matches(a, b) {
                continue;
            }
            // Strictly greater: on equal timestamps the earlier row stays
            if latest.map_or(true, |current| event.time_ms > current.time_ms) {
                latest = Some(event);
            }
        }

        latest.map(|event| event.status.as_str())
    }

    fn event_count(&self) -> usize {
        self.events.len()
    }
}
