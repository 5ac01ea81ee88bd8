//! Per-pair indexed link timeline.
//!
//! Events are grouped by pair key and stably sorted by time once at build
//! time; queries binary-search for the last event at or before the query.

use std::collections::HashMap;

use crate::model::{LinkEvent, PairKey, TimeMs};

use super::LinkStatusSource;

#[derive(Debug, Clone)]
struct Entry {
    time_ms: TimeMs,
    status: String,
}

/// Time-sorted event lists keyed by unordered pair
#[derive(Debug, Clone, Default)]
pub struct IndexedTimeline {
    by_pair: HashMap<PairKey, Vec<Entry>>,
    event_count: usize,
}

impl IndexedTimeline {
    /// Events without a finite timestamp are never effective and are left out
    pub fn from_events(events: Vec<LinkEvent>) -> Self {
        let mut event_count = 0;
        let mut by_pair: HashMap<PairKey, Vec<Entry>> = HashMap::new();

        for event in events.into_iter().filter(|e| e.time_ms.is_finite()) {
            event_count += 1;
            by_pair.entry(event.pair).or_default().push(Entry {
                time_ms: event.time_ms,
                status: event.status,
            });
        }

        // sort_by is stable, so rows sharing a timestamp keep CSV order
        for entries in by_pair.values_mut() {
            entries.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        }

        Self { by_pair, event_count }
    }

    /// Number of distinct pairs with at least one event
    pub fn pair_count(&self) -> usize {
        self.by_pair.len()
    }
}

impl LinkStatusSource for IndexedTimeline {
    fn status_at(&self, a: &str, b: &str, time_ms: TimeMs) -> Option<&str> {
        let entries = self.by_pair.get(&PairKey::new(a, b))?;

        let end = entries.partition_point(|e| e.time_ms <= time_ms);
        if end == 0 {
            return None;
        }

        // First entry of the run sharing the latest effective timestamp
        let latest = entries[end - 1].time_ms;
        let start = entries[..end].partition_point(|e| e.time_ms < latest);
        Some(entries[start].status.as_str())
    }

    fn event_count(&self) -> usize {
        self.event_count
    }
}
