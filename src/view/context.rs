//! Explicit view context: the loaded data plus mutable view state, handed
//! to the frame driver and to every control handler.

use std::time::Duration;

use serde::Serialize;

use crate::config::ViewConfig;
use crate::ingest::Dataset;
use crate::model::{Coordinate, LinkColor, Node, NodeCategory, PairKey, TimeMs};
use crate::render::{
    follow_view_offset, EntityDescriptor, GraphRenderer, LinkState, LinkVisual, Marker,
    SceneRenderer, TrailSpec,
};
use crate::timeline::{build_timeline, LinkStatusSource};
use crate::trajectory::TrajectoryStore;

use super::state::{ViewMode, ViewState};
use super::topology::{ActiveEdge, TopologyDiffer};

const TRAIL_WIDTH: f64 = 1.0;

/// What one frame produced
#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub time_ms: TimeMs,
    /// Nodes with a position at this time
    pub visible_nodes: usize,
    /// Pairs whose 3D link was drawn
    pub shown_links: Vec<PairKey>,
    /// Links with a status between two positioned nodes
    pub edges: Vec<ActiveEdge>,
    /// Whether the 2D graph received an update
    pub topology_pushed: bool,
}

pub struct ViewContext {
    nodes: Vec<Node>,
    trajectories: TrajectoryStore,
    timeline: Box<dyn LinkStatusSource>,
    state: ViewState,
    topology: TopologyDiffer,
    satellite_trail: Duration,
}

impl ViewContext {
    pub fn new(
        nodes: Vec<Node>,
        trajectories: TrajectoryStore,
        timeline: Box<dyn LinkStatusSource>,
        satellite_trail: Duration,
    ) -> Self {
        Self {
            nodes,
            trajectories,
            timeline,
            state: ViewState::default(),
            topology: TopologyDiffer::new(),
            satellite_trail,
        }
    }

    pub fn from_config(dataset: Dataset, config: &ViewConfig) -> Self {
        let timeline = build_timeline(config.timeline_index, dataset.events);
        Self::new(
            dataset.nodes,
            dataset.trajectories,
            timeline,
            config.satellite_trail,
        )
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn event_count(&self) -> usize {
        self.timeline.event_count()
    }

    /// Number of unordered node pairs checked every frame
    pub fn pair_count(&self) -> usize {
        let n = self.nodes.len();
        n * n.saturating_sub(1) / 2
    }

    pub fn position_at(&self, id: &str, time_ms: TimeMs) -> Option<Coordinate> {
        self.trajectories.position_at(id, time_ms)
    }

    pub fn status_at(&self, a: &str, b: &str, time_ms: TimeMs) -> Option<&str> {
        self.timeline.status_at(a, b, time_ms)
    }

    /// One entity per node; only satellites leave a trail
    pub fn describe_entities(&self) -> Vec<EntityDescriptor> {
        self.nodes
            .iter()
            .map(|node| EntityDescriptor {
                id: node.id.clone(),
                label: node.name.clone(),
                category: node.category,
                marker: Marker::for_category(node.category),
                trail: (node.category == NodeCategory::Satellite).then(|| TrailSpec {
                    lead_time: Duration::ZERO,
                    trail_time: self.satellite_trail,
                    width: TRAIL_WIDTH,
                }),
            })
            .collect()
    }

    /// Create every entity in the scene and frame them
    pub fn attach(&self, scene: &mut dyn SceneRenderer) {
        for entity in self.describe_entities() {
            scene.add_entity(&entity);
        }
        scene.zoom_to_all();
        log::debug!("Attached {} entities to the scene", self.nodes.len());
    }

    /// Push node positions and link states for `time_ms`, then refresh the
    /// 2D graph if the analytics panel is open.
    pub fn render_frame(
        &mut self,
        time_ms: TimeMs,
        scene: &mut dyn SceneRenderer,
        graph: &mut dyn GraphRenderer,
    ) -> FrameSummary {
        let positions: Vec<Option<Coordinate>> = self
            .nodes
            .iter()
            .map(|node| self.trajectories.position_at(&node.id, time_ms))
            .collect();

        for (node, position) in self.nodes.iter().zip(&positions) {
            scene.update_node(&node.id, position.as_ref());
        }

        let mut shown_links = Vec::new();
        let mut edges = Vec::new();

        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let (a, b) = (&self.nodes[i], &self.nodes[j]);
                let pair = PairKey::new(&a.id, &b.id);
                let status = self
                    .timeline
                    .status_at(&a.id, &b.id, time_ms)
                    .filter(|s| !s.is_empty());

                let state = match (positions[i], positions[j], status) {
                    (Some(from), Some(to), Some(status)) => {
                        edges.push(ActiveEdge {
                            source: a.id.clone(),
                            target: b.id.clone(),
                            status: status.to_string(),
                        });
                        if self.state.show_topology {
                            shown_links.push(pair.clone());
                            LinkState::Shown {
                                from,
                                to,
                                color: LinkColor::from_status(status),
                            }
                        } else {
                            LinkState::Hidden
                        }
                    }
                    _ => LinkState::Hidden,
                };

                scene.update_link(&LinkVisual { pair, state });
            }
        }

        let topology_pushed = if self.state.show_analytics {
            self.topology.update(&self.nodes, &edges, &self.state, graph)
        } else {
            false
        };

        FrameSummary {
            time_ms,
            visible_nodes: positions.iter().filter(|p| p.is_some()).count(),
            shown_links,
            edges,
            topology_pushed,
        }
    }

    /// Show or hide the analytics panel. Hiding clears the 2D graph.
    /// Returns the new visibility.
    pub fn toggle_analytics(&mut self, graph: &mut dyn GraphRenderer) -> bool {
        self.state.show_analytics = !self.state.show_analytics;
        if !self.state.show_analytics {
            self.topology.reset(graph);
        }
        log::debug!("Analytics panel visible: {}", self.state.show_analytics);
        self.state.show_analytics
    }

    /// Show or hide the 3D link overlay. Returns the new visibility.
    pub fn toggle_topology(&mut self) -> bool {
        self.state.show_topology = !self.state.show_topology;
        log::debug!("Topology overlay visible: {}", self.state.show_topology);
        self.state.show_topology
    }

    /// Make `id` the camera target. Returns whether the camera now follows
    /// it; an unknown id is remembered but not tracked.
    pub fn select_target(&mut self, id: &str, scene: &mut dyn SceneRenderer) -> bool {
        if id.is_empty() {
            return false;
        }

        self.state.current_target = Some(id.to_string());
        self.topology.invalidate();

        if self.node(id).is_none() {
            log::warn!("Selected target {} is not a known node", id);
            return false;
        }

        scene.track(id, follow_view_offset());
        self.state.view_mode = ViewMode::Follow;
        true
    }

    pub fn change_view(&mut self, mode: ViewMode, scene: &mut dyn SceneRenderer) {
        match mode {
            ViewMode::Overview => {
                scene.untrack();
                scene.zoom_to_all();
            }
            ViewMode::Follow => {
                if let Some(target) = self.state.current_target.as_deref() {
                    if self.node(target).is_some() {
                        scene.track(target, follow_view_offset());
                    }
                }
            }
        }
        self.state.view_mode = mode;
    }
}
