//! Core data types shared by ingestion, the timeline and the trajectory store.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Simulation timestamp in milliseconds since the clock epoch
pub type TimeMs = f64;

/// Cartesian position in the ECEF frame (source units, normally meters)
pub type Coordinate = Vector3<f64>;

/// Opaque node identifier (trimmed, case-sensitive)
pub type NodeId = String;

/// Category of a network node, fixed at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    Satellite,
    GroundStation,
    Aerial,
}

impl NodeCategory {
    /// Derive the category from the raw `type` column.
    ///
    /// Ground-station spellings are checked first, then anything mentioning
    /// `SAT`; all remaining types are treated as aerial vehicles.
    pub fn from_raw_type(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        match upper.as_str() {
            "GS" | "GROUNDSTATION" | "GROUND_STATION" => NodeCategory::GroundStation,
            _ if upper.contains("SAT") => NodeCategory::Satellite,
            _ => NodeCategory::Aerial,
        }
    }

    pub fn is_ground_station(&self) -> bool {
        matches!(self, NodeCategory::GroundStation)
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeCategory::Satellite => write!(f, "SATELLITE"),
            NodeCategory::GroundStation => write!(f, "GROUND_STATION"),
            NodeCategory::Aerial => write!(f, "AERIAL"),
        }
    }
}

/// A network node as listed in the telemetry files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub category: NodeCategory,
}

/// One kept position sample of a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub time_ms: TimeMs,
    pub position: Coordinate,
}

/// Canonical identity of an unordered node pair.
///
/// The two ids are stored lexicographically ordered, so `PairKey::new(a, b)`
/// and `PairKey::new(b, a)` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low: NodeId,
    high: NodeId,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    /// Compare against an unordered pair without allocating a key
    pub fn matches(&self, a: &str, b: &str) -> bool {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.low == low && self.high == high
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}---{}", self.low, self.high)
    }
}

/// A link status change between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEvent {
    pub time_ms: TimeMs,
    pub pair: PairKey,
    pub status: String,
}

impl LinkEvent {
    pub fn new(source: &str, target: &str, time_ms: TimeMs, status: impl Into<String>) -> Self {
        Self {
            time_ms,
            pair: PairKey::new(source, target),
            status: status.into(),
        }
    }
}

/// Presentation class of a link, derived from its free-form status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkColor {
    /// Status mentions "up"
    Up,
    /// Anything else: degraded or down
    Degraded,
}

impl LinkColor {
    pub fn from_status(status: &str) -> Self {
        if status.contains("up") {
            LinkColor::Up
        } else {
            LinkColor::Degraded
        }
    }

    /// Hex color used by the 2D graph
    pub fn hex(&self) -> &'static str {
        match self {
            LinkColor::Up => "#00f2ff",
            LinkColor::Degraded => "#f1c40f",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_raw_type() {
        assert_eq!(NodeCategory::from_raw_type("gs"), NodeCategory::GroundStation);
        assert_eq!(NodeCategory::from_raw_type(" GroundStation "), NodeCategory::GroundStation);
        assert_eq!(NodeCategory::from_raw_type("ground_station"), NodeCategory::GroundStation);
        assert_eq!(NodeCategory::from_raw_type("SAT"), NodeCategory::Satellite);
        assert_eq!(NodeCategory::from_raw_type("leo-satellite"), NodeCategory::Satellite);
        assert_eq!(NodeCategory::from_raw_type("UAV"), NodeCategory::Aerial);
        assert_eq!(NodeCategory::from_raw_type(""), NodeCategory::Aerial);
    }

    #[test]
    fn test_pair_key_is_order_independent() {
        let ab = PairKey::new("UAV_01", "GS_01");
        let ba = PairKey::new("GS_01", "UAV_01");
        assert_eq!(ab, ba);
        assert_eq!(ab.low(), "GS_01");
        assert_eq!(ab.to_string(), "GS_01---UAV_01");
        assert!(ab.matches("UAV_01", "GS_01"));
        assert!(!ab.matches("UAV_01", "UAV_02"));
    }

    #[test]
    fn test_pair_key_separator_does_not_collide() {
        let a = PairKey::new("a---b", "c");
        let b = PairKey::new("a", "b---c");
        assert_ne!(a, b);
    }

    #[test]
    fn test_link_color_from_status() {
        assert_eq!(LinkColor::from_status("up"), LinkColor::Up);
        assert_eq!(LinkColor::from_status("link_up_5g"), LinkColor::Up);
        assert_eq!(LinkColor::from_status("down"), LinkColor::Degraded);
        assert_eq!(LinkColor::from_status("UP"), LinkColor::Degraded);
        assert_eq!(LinkColor::Up.hex(), "#00f2ff");
    }
}
