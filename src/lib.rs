//! # Linkscope - time-synchronized link topology and trajectory engine
//!
//! This library drives a visualization of a heterogeneous communication
//! network (satellites, ground stations and aerial vehicles) from recorded
//! telemetry. Given a simulation time it answers two questions: where each
//! node is, and what the status of the link between any two nodes is.
//!
//! ## Architecture
//!
//! - `model`: node, sample, pair-key and link event types
//! - `ingest`: CSV loading of topology events and telemetry
//! - `timeline`: most-recent-event link status queries
//! - `trajectory`: downsampled, interpolated node positions
//! - `geodesy`: WGS-84 conversions for ground-station correction
//! - `clock`: simulation time anchored at a UTC epoch
//! - `render`: the 3D scene and 2D graph collaborator traits
//! - `view`: per-frame driver, control handlers and the topology differ
//! - `report`: headless replay with JSON and text reports
//! - `config` / `config_loader`: YAML configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use linkscope::{config_loader, ingest, render, view::ViewContext};
//!
//! let config = config_loader::load_config(Path::new("linkscope.yaml"))?;
//! let dataset = ingest::load_dataset(
//!     &config.data,
//!     &config.sampling.policy(),
//!     config.sampling.interpolation_degree,
//! )?;
//! let mut ctx = ViewContext::from_config(dataset, &config.view);
//!
//! let mut scene = render::RecordingScene::new();
//! let mut graph = render::RecordingGraph::new();
//! ctx.attach(&mut scene);
//! let frame = ctx.render_frame(1500.0, &mut scene, &mut graph);
//! println!("{} links shown", frame.shown_links.len());
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Error Handling
//!
//! Loading errors are typed (`ingest::IngestError`, `config::ValidationError`)
//! and wrapped with context through `color_eyre` at the application level.
//! Queries outside the known data return `None` rather than an error.

pub mod clock;
pub mod config;
pub mod config_loader;
pub mod geodesy;
pub mod ingest;
pub mod model;
pub mod render;
pub mod report;
pub mod timeline;
pub mod trajectory;
pub mod view;
