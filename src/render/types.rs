//! Payloads exchanged with the 3D scene and 2D graph renderers.

use std::time::Duration;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, LinkColor, NodeCategory, NodeId, PairKey};

/// Camera offset used when following a selected node
pub const FOLLOW_VIEW_OFFSET: [f64; 3] = [-300.0, -300.0, 150.0];

/// Radius of the circle the 2D layout starts from
pub const GRAPH_SEED_RADIUS: f64 = 150.0;

/// Symbol size of every 2D graph node
pub const GRAPH_SYMBOL_SIZE: f64 = 25.0;

pub const SELECTED_NODE_COLOR: &str = "#ff4757";
pub const NODE_COLOR: &str = "#00f2ff";
pub const EDGE_LABEL_COLOR: &str = "#00ff88";

pub fn follow_view_offset() -> Coordinate {
    Vector3::new(FOLLOW_VIEW_OFFSET[0], FOLLOW_VIEW_OFFSET[1], FOLLOW_VIEW_OFFSET[2])
}

/// Visual marker of a node, keyed by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub model_uri: String,
    pub min_pixel_size: u32,
}

impl Marker {
    pub fn for_category(category: NodeCategory) -> Self {
        let (model_uri, min_pixel_size) = match category {
            NodeCategory::Satellite => ("/models/satellite.glb", 60),
            NodeCategory::GroundStation => ("/models/gs.glb", 40),
            NodeCategory::Aerial => ("/models/uav.glb", 40),
        };
        Self {
            model_uri: model_uri.to_string(),
            min_pixel_size,
        }
    }
}

/// Trailing path drawn behind a moving node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailSpec {
    #[serde(with = "humantime_serde")]
    pub lead_time: Duration,
    #[serde(with = "humantime_serde")]
    pub trail_time: Duration,
    pub width: f64,
}

/// Everything the scene needs to create one node entity at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub id: NodeId,
    pub label: String,
    pub category: NodeCategory,
    pub marker: Marker,
    pub trail: Option<TrailSpec>,
}

/// Per-frame state of the polyline between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LinkState {
    Hidden,
    Shown {
        from: Coordinate,
        to: Coordinate,
        color: LinkColor,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkVisual {
    pub pair: PairKey,
    pub state: LinkState,
}

impl LinkVisual {
    pub fn is_shown(&self) -> bool {
        matches!(self.state, LinkState::Shown { .. })
    }
}

/// Initial 2D layout position of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNodeSeed {
    pub id: NodeId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub symbol_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub name: String,
    pub color: String,
    pub shadow_blur: f64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub status: String,
    pub color: String,
    pub label: String,
    pub label_color: String,
}

/// Full node and edge set pushed to the 2D graph on change
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopologyUpdate {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_by_category() {
        assert_eq!(Marker::for_category(NodeCategory::Satellite).min_pixel_size, 60);
        assert_eq!(Marker::for_category(NodeCategory::GroundStation).model_uri, "/models/gs.glb");
        assert_eq!(Marker::for_category(NodeCategory::Aerial).model_uri, "/models/uav.glb");
    }

    #[test]
    fn test_link_state_serializes_tagged() {
        let visual = LinkVisual {
            pair: PairKey::new("A", "B"),
            state: LinkState::Hidden,
        };
        let json = serde_json::to_value(&visual).unwrap();
        assert_eq!(json["state"]["state"], "hidden");
        assert!(!visual.is_shown());
    }
}
