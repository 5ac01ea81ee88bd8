//! Trace and satellite telemetry parsing.
//!
//! Columns: `node_id, name, type, time_ms, ecef_x, ecef_y, ecef_z`. Extra
//! columns (role, ip, heading, battery) are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nalgebra::Vector3;
use serde::Deserialize;

use crate::model::{Coordinate, NodeId, TimeMs};

use super::{require_columns, IngestError};

const REQUIRED_COLUMNS: [&str; 5] = ["node_id", "time_ms", "ecef_x", "ecef_y", "ecef_z"];

#[derive(Debug, Deserialize)]
struct TelemetryRecord {
    #[serde(default)]
    node_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    raw_type: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    time_ms: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    ecef_x: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    ecef_y: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    ecef_z: Option<f64>,
}

/// One telemetry row with an identified node
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRow {
    pub node_id: NodeId,
    pub name: Option<String>,
    pub raw_type: Option<String>,
    pub time_ms: Option<TimeMs>,
    pub position: Option<Coordinate>,
}

impl TelemetryRecord {
    fn into_row(self) -> Option<TelemetryRow> {
        let node_id = self.node_id.filter(|id| !id.is_empty())?;
        let position = match (self.ecef_x, self.ecef_y, self.ecef_z) {
            (Some(x), Some(y), Some(z)) if x.is_finite() && y.is_finite() && z.is_finite() => {
                Some(Vector3::new(x, y, z))
            }
            _ => None,
        };

        Some(TelemetryRow {
            node_id,
            name: self.name.filter(|n| !n.is_empty()),
            raw_type: self.raw_type,
            time_ms: self.time_ms.filter(|t| t.is_finite()),
            position,
        })
    }
}

/// Parse telemetry rows from CSV text, keeping row order.
///
/// Rows without a `node_id` are skipped; rows with missing numbers are kept
/// so they still count towards node discovery.
pub fn parse_telemetry<R: Read>(reader: R, path: &Path) -> Result<Vec<TelemetryRow>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    require_columns(&headers, &REQUIRED_COLUMNS, path)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in rdr.deserialize::<TelemetryRecord>().enumerate() {
        match result {
            Ok(record) => match record.into_row() {
                Some(row) => rows.push(row),
                None => skipped += 1,
            },
            Err(source) if source.is_io_error() => {
                return Err(IngestError::Csv {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(e) => {
                log::debug!("{}: skipping unreadable row {}: {}", path.display(), index + 1, e);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Parsed {} telemetry rows from {} ({} rows skipped)",
        rows.len(),
        path.display(),
        skipped
    );
    Ok(rows)
}

/// Read and parse a telemetry file
pub fn read_telemetry_file(path: &Path) -> Result<Vec<TelemetryRow>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_telemetry(file, path)
}
