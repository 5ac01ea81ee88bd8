//! Topology event file parsing.
//!
//! Columns: `source, target, time_ms, status`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::model::LinkEvent;

use super::{require_columns, IngestError};

const REQUIRED_COLUMNS: [&str; 4] = ["source", "target", "time_ms", "status"];

#[derive(Debug, Deserialize)]
struct TopologyRecord {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    time_ms: Option<f64>,
    #[serde(default)]
    status: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse link events from CSV text, keeping row order.
///
/// Rows missing `source` or `target`, or with a non-numeric `time_ms`, are
/// skipped. A missing status is kept as an empty string.
pub fn parse_topology<R: Read>(reader: R, path: &Path) -> Result<Vec<LinkEvent>, IngestError> {
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

    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in rdr.deserialize::<TopologyRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(source) if source.is_io_error() => {
                return Err(IngestError::Csv {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(e) => {
                log::debug!("{}: skipping unreadable row {}: {}", path.display(), index + 1, e);
                skipped += 1;
                continue;
            }
        };

        let (Some(source), Some(target)) = (non_empty(record.source), non_empty(record.target)) else {
            skipped += 1;
            continue;
        };
        let Some(time_ms) = record.time_ms.filter(|t| t.is_finite()) else {
            log::debug!("{}: row {} has no usable time_ms", path.display(), index + 1);
            skipped += 1;
            continue;
        };

        events.push(LinkEvent::new(
            &source,
            &target,
            time_ms,
            record.status.unwrap_or_default(),
        ));
    }

    log::info!(
        "Parsed {} link events from {} ({} rows skipped)",
        events.len(),
        path.display(),
        skipped
    );
    Ok(events)
}

/// Read and parse a topology event file
pub fn read_topology_file(path: &Path) -> Result<Vec<LinkEvent>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_topology(file, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PairKey;

    fn parse(text: &str) -> Result<Vec<LinkEvent>, IngestError> {
        parse_topology(text.as_bytes(), Path::new("topology.csv"))
    }

    #[test]
    fn test_parse_events_in_row_order() {
        let events = parse(
            "source,target,time_ms,status\n\
             UAV_01 , GS_01,300,down\n\
             GS_01,UAV_01,100, up \n\
             UAV_02,UAV_01,150.5,up\n",
        )
        .unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].pair, PairKey::new("GS_01", "UAV_01"));
        assert_eq!(events[0].time_ms, 300.0);
        assert_eq!(events[1].status, "up");
        assert_eq!(events[2].time_ms, 150.5);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let events = parse(
            "source,target,time_ms,status\n\
             ,GS_01,100,up\n\
             UAV_01,,100,up\n\
             UAV_01,GS_01,soon,up\n\
             UAV_01,GS_01\n\
             UAV_01,GS_01,200,\n",
        )
        .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time_ms, 200.0);
        assert_eq!(events[0].status, "");
    }

    #[test]
    fn test_missing_columns_fail_the_load() {
        let err = parse("source,target,status\nA,B,up\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumns { .. }));
        assert!(err.to_string().contains("time_ms"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_topology_file(Path::new("/nonexistent/topology.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
