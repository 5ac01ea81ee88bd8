//! 2D topology diff-updater.
//!
//! Recomputes the active edge set every frame but pushes it to the graph
//! renderer only when its canonical signature changes, so the force layout
//! is not restarted for identical frames.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::model::{LinkColor, Node, NodeId};
use crate::render::{
    GraphEdge, GraphNode, GraphNodeSeed, GraphRenderer, TopologyUpdate, EDGE_LABEL_COLOR,
    GRAPH_SEED_RADIUS, GRAPH_SYMBOL_SIZE, NODE_COLOR, SELECTED_NODE_COLOR,
};

use super::state::ViewState;

const SELECTED_SHADOW_BLUR: f64 = 15.0;

/// A link with a known status between two positioned nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub status: String,
}

/// Order-independent fingerprint of an edge set
pub fn edge_signature(edges: &[ActiveEdge]) -> Vec<String> {
    let mut signature: Vec<String> = edges
        .iter()
        .map(|e| format!("{}\u{1f}{}\u{1f}{}", e.source, e.target, e.status))
        .collect();
    signature.sort();
    signature
}

/// Spread nodes on a circle so the force layout does not start from a line
pub fn seed_layout(nodes: &[Node]) -> Vec<GraphNodeSeed> {
    let count = nodes.len().max(1) as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = (i as f64 / count) * PI * 2.0;
            GraphNodeSeed {
                id: node.id.clone(),
                name: node.name.clone(),
                x: angle.cos() * GRAPH_SEED_RADIUS,
                y: angle.sin() * GRAPH_SEED_RADIUS,
                symbol_size: GRAPH_SYMBOL_SIZE,
            }
        })
        .collect()
}

/// Graph payload for the given edges, highlighting the current target
pub fn build_update(nodes: &[Node], edges: &[ActiveEdge], state: &ViewState) -> TopologyUpdate {
    let nodes = nodes
        .iter()
        .map(|node| {
            let highlighted = state.is_target(&node.id);
            GraphNode {
                id: node.id.clone(),
                name: node.name.clone(),
                color: if highlighted { SELECTED_NODE_COLOR } else { NODE_COLOR }.to_string(),
                shadow_blur: if highlighted { SELECTED_SHADOW_BLUR } else { 0.0 },
                highlighted,
            }
        })
        .collect();

    let edges = edges
        .iter()
        .map(|edge| GraphEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            status: edge.status.clone(),
            color: LinkColor::from_status(&edge.status).hex().to_string(),
            label: edge.status.clone(),
            label_color: EDGE_LABEL_COLOR.to_string(),
        })
        .collect();

    TopologyUpdate { nodes, edges }
}

/// Remembers the last pushed signature
#[derive(Debug, Default)]
pub struct TopologyDiffer {
    last_signature: Option<Vec<String>>,
    seeded: bool,
    pushes: usize,
}

impl TopologyDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the edge set if it differs from the last one pushed.
    /// Returns whether the graph was updated.
    pub fn update(
        &mut self,
        nodes: &[Node],
        edges: &[ActiveEdge],
        state: &ViewState,
        graph: &mut dyn GraphRenderer,
    ) -> bool {
        if !self.seeded {
            graph.seed(&seed_layout(nodes));
            self.seeded = true;
        }

        let signature = edge_signature(edges);
        if self.last_signature.as_ref() == Some(&signature) {
            return false;
        }

        graph.apply(&build_update(nodes, edges, state));
        self.last_signature = Some(signature);
        self.pushes += 1;
        true
    }

    /// Force the next update through, e.g. after the highlight changed
    pub fn invalidate(&mut self) {
        self.last_signature = None;
    }

    /// Clear the graph and start over on the next update
    pub fn reset(&mut self, graph: &mut dyn GraphRenderer) {
        graph.clear();
        self.last_signature = None;
        self.seeded = false;
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeCategory;
    use crate::render::RecordingGraph;

    fn nodes() -> Vec<Node> {
        ["GS_01", "UAV_01", "UAV_02"]
            .iter()
            .map(|id| Node {
                id: id.to_string(),
                name: id.to_string(),
                category: NodeCategory::Aerial,
            })
            .collect()
    }

    fn edge(source: &str, target: &str, status: &str) -> ActiveEdge {
        ActiveEdge {
            source: source.to_string(),
            target: target.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_signature_ignores_edge_order() {
        let a = vec![edge("GS_01", "UAV_01", "up"), edge("UAV_01", "UAV_02", "down")];
        let b = vec![edge("UAV_01", "UAV_02", "down"), edge("GS_01", "UAV_01", "up")];
        assert_eq!(edge_signature(&a), edge_signature(&b));
        assert_ne!(
            edge_signature(&[edge("A", "BC", "up")]),
            edge_signature(&[edge("AB", "C", "up")])
        );
    }

    #[test]
    fn test_unchanged_edges_push_once() {
        let nodes = nodes();
        let state = ViewState::default();
        let mut graph = RecordingGraph::new();
        let mut differ = TopologyDiffer::new();
        let edges = vec![edge("GS_01", "UAV_01", "up")];

        assert!(differ.update(&nodes, &edges, &state, &mut graph));
        assert!(!differ.update(&nodes, &edges, &state, &mut graph));
        assert_eq!(graph.updates.len(), 1);
        assert_eq!(graph.seeds.len(), 3);

        let changed = vec![edge("GS_01", "UAV_01", "down")];
        assert!(differ.update(&nodes, &changed, &state, &mut graph));
        assert_eq!(graph.updates.len(), 2);
        assert_eq!(graph.last_update().unwrap().edges[0].color, "#f1c40f");
        assert_eq!(differ.pushes(), 2);
    }

    #[test]
    fn test_empty_edge_set_is_pushed_once() {
        let nodes = nodes();
        let state = ViewState::default();
        let mut graph = RecordingGraph::new();
        let mut differ = TopologyDiffer::new();

        assert!(differ.update(&nodes, &[], &state, &mut graph));
        assert!(!differ.update(&nodes, &[], &state, &mut graph));
    }

    #[test]
    fn test_highlight_and_reset() {
        let nodes = nodes();
        let mut state = ViewState::default();
        state.current_target = Some("UAV_02".to_string());
        let mut graph = RecordingGraph::new();
        let mut differ = TopologyDiffer::new();
        let edges = vec![edge("UAV_01", "UAV_02", "link up")];

        differ.update(&nodes, &edges, &state, &mut graph);
        let update = graph.last_update().unwrap();
        let selected = update.nodes.iter().find(|n| n.id == "UAV_02").unwrap();
        assert!(selected.highlighted);
        assert_eq!(selected.color, SELECTED_NODE_COLOR);
        assert_eq!(selected.shadow_blur, 15.0);
        assert_eq!(update.nodes[0].color, NODE_COLOR);
        assert_eq!(update.edges[0].label, "link up");
        assert_eq!(update.edges[0].color, "#00f2ff");
        assert_eq!(update.edges[0].label_color, "#00ff88");

        differ.invalidate();
        assert!(differ.update(&nodes, &edges, &state, &mut graph));

        differ.reset(&mut graph);
        assert_eq!(graph.clears, 1);
        assert!(differ.update(&nodes, &edges, &state, &mut graph));
        assert_eq!(graph.updates.len(), 3);
    }

    #[test]
    fn test_seed_layout_is_circular() {
        let seeds = seed_layout(&nodes());
        for seed in &seeds {
            let radius = (seed.x * seed.x + seed.y * seed.y).sqrt();
            assert!((radius - GRAPH_SEED_RADIUS).abs() < 1e-9);
        }
        assert!((seeds[0].x - GRAPH_SEED_RADIUS).abs() < 1e-9);
    }
}
