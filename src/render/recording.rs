//! Renderers that record what they were asked to draw.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Coordinate, NodeId, PairKey};

use super::{
    EntityDescriptor, GraphNodeSeed, GraphRenderer, LinkVisual, SceneRenderer, TopologyUpdate,
};

/// Scene that keeps the latest state of every entity, link and the camera
#[derive(Debug, Default)]
pub struct RecordingScene {
    pub entities: Vec<EntityDescriptor>,
    pub positions: HashMap<NodeId, Option<Coordinate>>,
    pub links: BTreeMap<PairKey, LinkVisual>,
    pub tracked: Option<(NodeId, Coordinate)>,
    pub zoom_requests: usize,
    pub link_updates: usize,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&self, a: &str, b: &str) -> Option<&LinkVisual> {
        self.links.get(&PairKey::new(a, b))
    }

    pub fn shown_link_count(&self) -> usize {
        self.links.values().filter(|l| l.is_shown()).count()
    }

    pub fn tracked_id(&self) -> Option<&str> {
        self.tracked.as_ref().map(|(id, _)| id.as_str())
    }
}

impl SceneRenderer for RecordingScene {
    fn add_entity(&mut self, entity: &EntityDescriptor) {
        self.entities.push(entity.clone());
    }

    fn update_node(&mut self, id: &str, position: Option<&Coordinate>) {
        self.positions.insert(id.to_string(), position.copied());
    }

    fn update_link(&mut self, link: &LinkVisual) {
        self.link_updates += 1;
        self.links.insert(link.pair.clone(), link.clone());
    }

    fn track(&mut self, id: &str, offset: Coordinate) {
        self.tracked = Some((id.to_string(), offset));
    }

    fn untrack(&mut self) {
        self.tracked = None;
    }

    fn zoom_to_all(&mut self) {
        self.zoom_requests += 1;
    }
}

/// Graph that keeps every update it received
#[derive(Debug, Default)]
pub struct RecordingGraph {
    pub seeds: Vec<GraphNodeSeed>,
    pub updates: Vec<TopologyUpdate>,
    pub clears: usize,
}

impl RecordingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_update(&self) -> Option<&TopologyUpdate> {
        self.updates.last()
    }
}

impl GraphRenderer for RecordingGraph {
    fn seed(&mut self, nodes: &[GraphNodeSeed]) {
        self.seeds = nodes.to_vec();
    }

    fn apply(&mut self, update: &TopologyUpdate) {
        self.updates.push(update.clone());
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}
