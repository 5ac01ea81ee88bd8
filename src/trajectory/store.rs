//! Per-node trajectories and the sampling policy applied while loading them.

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::geodesy::normalize_ground_sample;
use crate::model::{Coordinate, NodeCategory, NodeId, PositionSample, TimeMs};

use super::interpolation::interpolate;

/// Rules applied to raw telemetry rows before they become samples
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingPolicy {
    /// Minimum spacing between kept samples of non-ground nodes
    pub min_gap_ms: TimeMs,
    /// Decimal places kept on each coordinate
    pub coordinate_decimals: u32,
    /// Zero the geodetic height of ground-station samples
    pub clamp_ground_height: bool,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            min_gap_ms: 500.0,
            coordinate_decimals: 2,
            clamp_ground_height: false,
        }
    }
}

impl SamplingPolicy {
    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.coordinate_decimals as i32);
        (value * factor).round() / factor
    }

    fn round_coordinate(&self, raw: &Coordinate) -> Coordinate {
        Vector3::new(self.round(raw.x), self.round(raw.y), self.round(raw.z))
    }
}

/// Time-ascending samples of a single node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<PositionSample>,
}

impl Trajectory {
    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last sample times
    pub fn time_range(&self) -> Option<(TimeMs, TimeMs)> {
        Some((self.samples.first()?.time_ms, self.samples.last()?.time_ms))
    }

    pub fn position_at(&self, time_ms: TimeMs, degree: usize) -> Option<Coordinate> {
        interpolate(&self.samples, time_ms, degree)
    }
}

/// Accumulates rows for one node, applying the sampling policy
#[derive(Debug)]
pub struct TrajectoryBuilder<'a> {
    node_id: NodeId,
    category: NodeCategory,
    policy: &'a SamplingPolicy,
    samples: Vec<PositionSample>,
    last_kept: Option<TimeMs>,
    out_of_order: usize,
}

impl<'a> TrajectoryBuilder<'a> {
    pub fn new(node_id: impl Into<NodeId>, category: NodeCategory, policy: &'a SamplingPolicy) -> Self {
        Self {
            node_id: node_id.into(),
            category,
            policy,
            samples: Vec::new(),
            last_kept: None,
            out_of_order: 0,
        }
    }

    /// Offer a raw sample; returns whether it was kept.
    pub fn push(&mut self, time_ms: TimeMs, raw: Coordinate) -> bool {
        let is_ground = self.category.is_ground_station();

        if let Some(last) = self.last_kept {
            if time_ms < last {
                log::warn!(
                    "Dropping out-of-order sample for {} at {} ms (last kept {} ms)",
                    self.node_id,
                    time_ms,
                    last
                );
                self.out_of_order += 1;
                return false;
            }
            if !is_ground && time_ms - last < self.policy.min_gap_ms {
                return false;
            }
        }

        let mut position = self.policy.round_coordinate(&raw);
        if is_ground {
            position = normalize_ground_sample(position, self.policy.clamp_ground_height);
        }

        let sample = PositionSample { time_ms, position };
        match self.samples.last_mut() {
            Some(previous) if previous.time_ms == time_ms => *previous = sample,
            _ => self.samples.push(sample),
        }
        self.last_kept = Some(time_ms);
        true
    }

    /// Samples rejected so far for arriving before the last kept one
    pub fn out_of_order(&self) -> usize {
        self.out_of_order
    }

    pub fn build(self) -> Trajectory {
        log::debug!(
            "Trajectory for {}: {} samples kept, {} out-of-order dropped",
            self.node_id,
            self.samples.len(),
            self.out_of_order
        );
        Trajectory { samples: self.samples }
    }
}

/// Interpolated positions for every node in the dataset
#[derive(Debug, Clone)]
pub struct TrajectoryStore {
    trajectories: HashMap<NodeId, Trajectory>,
    degree: usize,
}

impl TrajectoryStore {
    pub fn new(degree: usize) -> Self {
        Self {
            trajectories: HashMap::new(),
            degree,
        }
    }

    pub fn insert(&mut self, node_id: impl Into<NodeId>, trajectory: Trajectory) {
        self.trajectories.insert(node_id.into(), trajectory);
    }

    pub fn get(&self, node_id: &str) -> Option<&Trajectory> {
        self.trajectories.get(node_id)
    }

    /// Interpolated position of `node_id`, or `None` for unknown nodes and
    /// times outside the node's recorded range.
    pub fn position_at(&self, node_id: &str, time_ms: TimeMs) -> Option<Coordinate> {
        self.trajectories.get(node_id)?.position_at(time_ms, self.degree)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.trajectories.values().map(Trajectory::len).sum()
    }
}
