use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{error, info};

use linkscope::clock::SimulationClock;
use linkscope::config::Config;
use linkscope::config_loader::{self, DataOverrides};
use linkscope::geodesy;
use linkscope::ingest::{self, Dataset};
use linkscope::model::NodeCategory;
use linkscope::render::{RecordingGraph, RecordingScene};
use linkscope::report;
use linkscope::view::ViewContext;

/// Time-synchronized link topology and trajectory engine
#[derive(Parser, Debug)]
#[command(name = "linkscope", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the topology events CSV
    #[arg(long, global = true)]
    topology: Option<PathBuf>,

    /// Override the ground/aerial trace CSV
    #[arg(long, global = true)]
    trace: Option<PathBuf>,

    /// Override the satellite telemetry CSV
    #[arg(long, global = true)]
    sat: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show what was loaded
    Summary,

    /// Link status between two nodes at a simulation time
    Status {
        a: String,
        b: String,
        /// Simulation time in milliseconds
        #[arg(long)]
        time: f64,
    },

    /// Interpolated position of a node at a simulation time
    Position {
        node: String,
        /// Simulation time in milliseconds
        #[arg(long)]
        time: f64,
    },

    /// Replay the whole recording headlessly and write reports
    Replay {
        /// Frame step, e.g. "1s" or "250ms"
        #[arg(long, value_parser = humantime::parse_duration)]
        step: Option<Duration>,

        /// Clock speed multiplier
        #[arg(long)]
        multiplier: Option<f64>,

        /// Output directory for reports
        #[arg(short, long, default_value = "linkscope_output")]
        output: PathBuf,

        /// Open the analytics panel before replaying
        #[arg(long)]
        analytics: bool,

        /// Follow this node during the replay
        #[arg(long)]
        target: Option<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config_loader::configured_log_level(cli.config.as_deref()));
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let mut config = config_loader::load_or_default(cli.config.as_deref())?;
    let overrides = DataOverrides {
        topology: cli.topology.clone(),
        trace: cli.trace.clone(),
        sat: cli.sat.clone(),
    };
    config_loader::apply_overrides(&mut config, &overrides)?;

    if let Commands::Replay {
        step, multiplier, ..
    } = &cli.command
    {
        if let Some(step) = step {
            config.clock.step = *step;
        }
        if let Some(multiplier) = multiplier {
            config.clock.multiplier = *multiplier;
        }
        config.validate().wrap_err("Invalid replay options")?;
    }

    let dataset = load(&config)?;

    match cli.command {
        Commands::Summary => print_dataset_summary(&config, &dataset),
        Commands::Status { a, b, time } => {
            let ctx = ViewContext::from_config(dataset, &config.view);
            match ctx.status_at(&a, &b, time) {
                Some(status) if !status.is_empty() => {
                    println!("{} <-> {} at {} ms: {}", a, b, time, status)
                }
                _ => println!("{} <-> {} at {} ms: no link", a, b, time),
            }
        }
        Commands::Position { node, time } => {
            let ctx = ViewContext::from_config(dataset, &config.view);
            match ctx.position_at(&node, time) {
                Some(position) => {
                    println!(
                        "{} at {} ms: ECEF ({:.2}, {:.2}, {:.2})",
                        node, time, position.x, position.y, position.z
                    );
                    if let Some(geo) = geodesy::to_geodetic(&position) {
                        println!(
                            "  lon {:.6}°, lat {:.6}°, height {:.2} m",
                            geo.longitude_deg(),
                            geo.latitude_deg(),
                            geo.height
                        );
                    }
                }
                None => println!("{} at {} ms: no position", node, time),
            }
        }
        Commands::Replay {
            output,
            analytics,
            target,
            ..
        } => {
            let mut clock = SimulationClock::from_config(&config.clock, dataset.max_time_ms);
            let mut ctx = ViewContext::from_config(dataset, &config.view);
            let mut scene = RecordingScene::new();
            let mut graph = RecordingGraph::new();

            ctx.attach(&mut scene);
            if analytics {
                ctx.toggle_analytics(&mut graph);
            }
            if let Some(target) = target.as_deref() {
                ctx.select_target(target, &mut scene);
            }

            info!(
                "Replaying {} ms from {} in {:?} steps",
                clock.stop_ms(),
                clock.epoch(),
                config.clock.step
            );
            let replay_report =
                report::replay(&mut ctx, &mut clock, config.clock.step, &mut scene, &mut graph);

            fs::create_dir_all(&output).wrap_err_with(|| {
                format!("Failed to create output directory '{}'", output.display())
            })?;
            report::generate_json_report(&replay_report, &output.join("replay_report.json"))?;
            report::generate_text_report(&replay_report, &output.join("replay_report.txt"))?;
            report::print_summary(&replay_report);
        }
    }

    Ok(())
}

/// Load the CSV resources; failure leaves nothing initialized
fn load(config: &Config) -> Result<Dataset> {
    match ingest::load_dataset(
        &config.data,
        &config.sampling.policy(),
        config.sampling.interpolation_degree,
    ) {
        Ok(dataset) => {
            info!(
                "Loaded {} nodes, {} samples, {} link events",
                dataset.nodes.len(),
                dataset.trajectories.total_samples(),
                dataset.events.len()
            );
            Ok(dataset)
        }
        Err(e) => {
            error!("Failed to load telemetry: {}", e);
            Err(e).wrap_err("Initial data load failed")
        }
    }
}

fn print_dataset_summary(config: &Config, dataset: &Dataset) {
    let count = |category: NodeCategory| {
        dataset
            .nodes
            .iter()
            .filter(|n| n.category == category)
            .count()
    };

    println!("\n=== LINKSCOPE DATASET SUMMARY ===\n");
    println!("Nodes: {}", dataset.nodes.len());
    println!("  Satellites: {}", count(NodeCategory::Satellite));
    println!("  Ground stations: {}", count(NodeCategory::GroundStation));
    println!("  Aerial: {}", count(NodeCategory::Aerial));
    println!("Position samples kept: {}", dataset.trajectories.total_samples());
    println!("Link events: {}", dataset.events.len());
    println!("Duration: {:.0} ms", dataset.max_time_ms);

    let clock = SimulationClock::from_config(&config.clock, dataset.max_time_ms);
    match clock.time_at(clock.stop_ms()) {
        Some(end) => println!("Clock: {} -> {}", clock.epoch().to_rfc3339(), end.to_rfc3339()),
        None => println!(
            "Clock: {} -> (end outside the calendar range)",
            clock.epoch().to_rfc3339()
        ),
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["linkscope", "--config", "test.yaml", "summary"]);

        assert_eq!(cli.config, Some(PathBuf::from("test.yaml")));
        assert!(matches!(cli.command, Commands::Summary));
        assert_eq!(cli.log_level, None);
    }

    #[test]
    fn test_status_args() {
        let cli = Cli::parse_from([
            "linkscope", "status", "GS_01", "UAV_01", "--time", "1500", "--trace", "t.csv",
        ]);

        assert_eq!(cli.trace, Some(PathBuf::from("t.csv")));
        match cli.command {
            Commands::Status { a, b, time } => {
                assert_eq!(a, "GS_01");
                assert_eq!(b, "UAV_01");
                assert_eq!(time, 1500.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_replay_args() {
        let cli = Cli::parse_from([
            "linkscope",
            "replay",
            "--step",
            "250ms",
            "--multiplier",
            "2",
            "--analytics",
            "--target",
            "SAT_01",
        ]);

        match cli.command {
            Commands::Replay {
                step,
                multiplier,
                output,
                analytics,
                target,
            } => {
                assert_eq!(step, Some(Duration::from_millis(250)));
                assert_eq!(multiplier, Some(2.0));
                assert_eq!(output, PathBuf::from("linkscope_output"));
                assert!(analytics);
                assert_eq!(target.as_deref(), Some("SAT_01"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
