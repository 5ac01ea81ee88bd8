//! Headless replay and report generation.
//!
//! Drives the view frame by frame against recording renderers and writes
//! both JSON and human-readable text reports of what was shown.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::clock::SimulationClock;
use crate::model::TimeMs;
use crate::render::{GraphRenderer, SceneRenderer};
use crate::view::topology::edge_signature;
use crate::view::{ActiveEdge, ViewContext, ViewState};

#[derive(Debug, Clone, Serialize)]
pub struct ReplayMetadata {
    pub generated_at: String,
    pub epoch: DateTime<Utc>,
    pub duration_ms: TimeMs,
    #[serde(with = "humantime_serde")]
    pub step: Duration,
    pub multiplier: f64,
    pub frames: usize,
    pub node_count: usize,
    pub pair_count: usize,
    pub event_count: usize,
}

/// Edge set that became active at a given frame
#[derive(Debug, Clone, Serialize)]
pub struct TopologyChange {
    pub time_ms: TimeMs,
    /// `None` when the offset is past the calendar range
    pub iso_time: Option<String>,
    pub edges: Vec<ActiveEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub metadata: ReplayMetadata,
    pub topology_changes: Vec<TopologyChange>,
    /// Frames in which each pair's 3D link was drawn, keyed `low---high`
    pub link_activity: BTreeMap<String, usize>,
    /// Updates actually pushed to the 2D graph
    pub graph_pushes: usize,
    pub final_state: ViewState,
}

/// Run the clock from its current time to the stop time, rendering one
/// frame per step.
pub fn replay(
    ctx: &mut ViewContext,
    clock: &mut SimulationClock,
    step: Duration,
    scene: &mut dyn SceneRenderer,
    graph: &mut dyn GraphRenderer,
) -> ReplayReport {
    let started_at = clock.elapsed_ms();
    let mut frames = 0;
    let mut graph_pushes = 0;
    let mut topology_changes = Vec::new();
    let mut link_activity: BTreeMap<String, usize> = BTreeMap::new();
    let mut last_signature: Option<Vec<String>> = None;

    loop {
        let time_ms = clock.elapsed_ms();
        let frame = ctx.render_frame(time_ms, scene, graph);
        frames += 1;

        if frame.topology_pushed {
            graph_pushes += 1;
        }
        for pair in &frame.shown_links {
            *link_activity.entry(pair.to_string()).or_insert(0) += 1;
        }

        let signature = edge_signature(&frame.edges);
        if last_signature.as_ref() != Some(&signature) {
            log::debug!("Topology changed at {} ms: {} edges", time_ms, frame.edges.len());
            topology_changes.push(TopologyChange {
                time_ms,
                iso_time: clock
                    .time_at(time_ms)
                    .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
                edges: frame.edges,
            });
            last_signature = Some(signature);
        }

        if clock.is_finished() {
            break;
        }
        let next = clock.tick(step);
        if next <= time_ms {
            log::warn!("Clock did not advance past {} ms, stopping replay", time_ms);
            break;
        }
    }

    log::info!(
        "Replayed {} frames over {} ms ({} topology changes)",
        frames,
        clock.elapsed_ms() - started_at,
        topology_changes.len()
    );

    ReplayReport {
        metadata: ReplayMetadata {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            epoch: clock.epoch(),
            duration_ms: clock.stop_ms(),
            step,
            multiplier: clock.multiplier(),
            frames,
            node_count: ctx.nodes().len(),
            pair_count: ctx.pair_count(),
            event_count: ctx.event_count(),
        },
        topology_changes,
        link_activity,
        graph_pushes,
        final_state: ctx.state().clone(),
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &ReplayReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Render the text report body
pub fn format_text_report(report: &ReplayReport) -> String {
    let meta = &report.metadata;
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(80));
    lines.push("                         LINKSCOPE REPLAY REPORT".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Generated: {}", meta.generated_at));
    lines.push(format!(
        "Epoch: {}",
        meta.epoch.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    lines.push(format!("Duration: {:.0} ms", meta.duration_ms));
    lines.push(format!(
        "Step: {} x{}",
        humantime::format_duration(meta.step),
        meta.multiplier
    ));
    lines.push(format!("Frames: {}", meta.frames));
    lines.push(format!("Nodes: {}", meta.node_count));
    lines.push(format!("Node pairs: {}", meta.pair_count));
    lines.push(format!("Link events: {}", meta.event_count));
    lines.push(format!("2D graph updates: {}", report.graph_pushes));
    lines.push(String::new());

    lines.push("=".repeat(80));
    lines.push("                            TOPOLOGY CHANGES".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    if report.topology_changes.is_empty() {
        lines.push("No frames rendered.".to_string());
    }
    for change in &report.topology_changes {
        lines.push(format!(
            "[{}] t={:.0}ms  {} active links",
            change.iso_time.as_deref().unwrap_or("out of range"),
            change.time_ms,
            change.edges.len()
        ));
        for edge in &change.edges {
            lines.push(format!("    {} <-> {}: {}", edge.source, edge.target, edge.status));
        }
    }
    lines.push(String::new());

    if !report.link_activity.is_empty() {
        lines.push("=".repeat(80));
        lines.push("                              LINK ACTIVITY".to_string());
        lines.push("=".repeat(80));
        lines.push(String::new());

        let frames = meta.frames.max(1) as f64;
        for (pair, shown) in &report.link_activity {
            lines.push(format!(
                "  {:<40} {:>6} frames ({:.1}%)",
                pair,
                shown,
                *shown as f64 / frames * 100.0
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Final view: {} (target: {})",
        report.final_state.view_mode,
        report.final_state.current_target.as_deref().unwrap_or("none")
    ));
    lines.push("=".repeat(80));

    lines.join("\n")
}

/// Generate human-readable text report
pub fn generate_text_report(report: &ReplayReport, output_path: &Path) -> Result<()> {
    fs::write(output_path, format_text_report(report))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &ReplayReport) {
    println!("\n=== LINKSCOPE REPLAY SUMMARY ===\n");
    println!("Frames: {}", report.metadata.frames);
    println!("Nodes: {}", report.metadata.node_count);
    println!("Topology changes: {}", report.topology_changes.len());
    println!("2D graph updates: {}", report.graph_pushes);

    if let Some((pair, shown)) = report.link_activity.iter().max_by_key(|(_, shown)| **shown) {
        println!("Most active link: {} ({} frames)", pair, shown);
    }

    println!();
}
