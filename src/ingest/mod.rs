//! CSV ingestion.
//!
//! Reads the topology event file and the two telemetry files (trace and
//! satellite), then assembles nodes, trajectories and link events into a
//! [`Dataset`]. Rows without identifying fields are skipped.

pub mod telemetry;
pub mod topology;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::DataConfig;
use crate::model::{LinkEvent, Node, NodeCategory, NodeId, TimeMs};
use crate::trajectory::{SamplingPolicy, TrajectoryBuilder, TrajectoryStore};

pub use telemetry::{parse_telemetry, read_telemetry_file, TelemetryRow};
pub use topology::{parse_topology, read_topology_file};

/// Errors raised while loading the CSV resources
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} is missing required column(s): {columns}")]
    MissingColumns { path: PathBuf, columns: String },
}

/// Check that every required column is present in the header row
pub(crate) fn require_columns(
    headers: &csv::StringRecord,
    required: &[&str],
    path: &Path,
) -> Result<(), IngestError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing.join(", "),
        })
    }
}

/// Everything loaded at startup, read-only afterwards
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Nodes in order of first appearance (trace file, then satellite file)
    pub nodes: Vec<Node>,
    pub trajectories: TrajectoryStore,
    /// Link events in CSV row order
    pub events: Vec<LinkEvent>,
    /// Latest `time_ms` seen in any telemetry row
    pub max_time_ms: TimeMs,
}

impl Dataset {
    /// Group telemetry rows by node and build one trajectory per node.
    ///
    /// Each node's name and category come from its first row. The clock
    /// range covers every timed row, including rows later dropped by
    /// downsampling.
    pub fn assemble(
        telemetry: Vec<TelemetryRow>,
        events: Vec<LinkEvent>,
        policy: &SamplingPolicy,
        interpolation_degree: usize,
    ) -> Self {
        let mut nodes: Vec<Node> = Vec::new();
        let mut groups: HashMap<NodeId, Vec<TelemetryRow>> = HashMap::new();
        let mut max_time_ms: TimeMs = 0.0;

        for row in telemetry {
            if let Some(time_ms) = row.time_ms {
                max_time_ms = max_time_ms.max(time_ms);
            }
            let group = groups.entry(row.node_id.clone()).or_insert_with(|| {
                nodes.push(Node {
                    id: row.node_id.clone(),
                    name: row.name.clone().unwrap_or_else(|| row.node_id.clone()),
                    category: NodeCategory::from_raw_type(row.raw_type.as_deref().unwrap_or("")),
                });
                Vec::new()
            });
            group.push(row);
        }

        let mut trajectories = TrajectoryStore::new(interpolation_degree);
        for node in &nodes {
            let mut builder = TrajectoryBuilder::new(node.id.clone(), node.category, policy);
            for row in groups.remove(&node.id).unwrap_or_default() {
                match (row.time_ms, row.position) {
                    (Some(time_ms), Some(position)) => {
                        builder.push(time_ms, position);
                    }
                    _ => log::debug!("Skipping untimed or unpositioned row for {}", node.id),
                }
            }
            trajectories.insert(node.id.clone(), builder.build());
        }

        log::info!(
            "Assembled {} nodes, {} kept samples, {} link events, clock range 0..{} ms",
            nodes.len(),
            trajectories.total_samples(),
            events.len(),
            max_time_ms
        );

        Self {
            nodes,
            trajectories,
            events,
            max_time_ms,
        }
    }
}

/// Load the three CSV resources in parallel and assemble the dataset.
///
/// Any failing resource fails the whole load.
pub fn load_dataset(
    data: &DataConfig,
    policy: &SamplingPolicy,
    interpolation_degree: usize,
) -> Result<Dataset, IngestError> {
    log::info!(
        "Loading topology {:?}, trace {:?}, satellites {:?}",
        data.topology,
        data.trace,
        data.sat
    );

    let (events, (trace, sat)) = rayon::join(
        || read_topology_file(&data.topology),
        || {
            rayon::join(
                || read_telemetry_file(&data.trace),
                || read_telemetry_file(&data.sat),
            )
        },
    );
    let events = events?;
    let mut telemetry = trace?;
    telemetry.extend(sat?);

    Ok(Dataset::assemble(telemetry, events, policy, interpolation_degree))
}
