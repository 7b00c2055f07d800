// Copyright 2025 the Tapeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless host for a Tapeline ruler picker.
//!
//! Builds a ruler from a TOML file and/or flags, replays a simulated drag,
//! prints every value change with one decimal place, and optionally writes an
//! SVG snapshot of the final state.
//!
//! ```text
//! tapeline_host --unit inch --length 10 --step 0.5 --drag 256 --svg ruler.svg
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tapeline_length::Unit;
use tapeline_ruler::RulerConfig;

mod host;

use host::{RulerHost, format_value};

/// Frames simulated after the drag before giving up on the ruler settling.
const MAX_FRAMES: u32 = 60 * 30;

#[derive(Parser, Debug)]
#[command(name = "tapeline_host")]
#[command(version, about = "Drive a Tapeline ruler picker headlessly")]
struct Cli {
    /// TOML file with `[ruler]` and `[view]` tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Unit of measure (`cm` or `in`)
    #[arg(short, long)]
    unit: Option<Unit>,

    /// Ruler length in units
    #[arg(short, long)]
    length: Option<f64>,

    /// Step that settled values snap to
    #[arg(short, long)]
    step: Option<f64>,

    /// Tick stroke width in pixels
    #[arg(long)]
    line_width: Option<f64>,

    /// Initial value
    #[arg(long)]
    value: Option<f64>,

    /// Ruler color, e.g. `#1e88e5` or `teal`
    #[arg(long)]
    tint: Option<String>,

    /// View width in pixels
    #[arg(short, long)]
    width: Option<f64>,

    /// Pixels to drag the tape left (negative drags right)
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    drag: f64,

    /// Release the drag with momentum
    #[arg(long)]
    fling: bool,

    /// Write an SVG snapshot of the settled ruler here
    #[arg(long)]
    svg: Option<PathBuf>,
}

/// Layout of the optional config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HostConfig {
    ruler: Option<RulerConfig>,
    view: ViewConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ViewConfig {
    width: f64,
    value: f64,
    tint: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            value: 0.0,
            tint: None,
        }
    }
}

impl HostConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };

    let config = resolve_ruler(&cli, file.ruler);
    let view_width = cli.width.unwrap_or(file.view.width);
    let tint = cli.tint.as_deref().or(file.view.tint.as_deref()).map(parse_tint).transpose()?;
    tracing::debug!(?config, view_width, "starting host");

    let mut host = RulerHost::new(
        config,
        view_width,
        Some(Box::new(|_: f64, text: &str| println!("{text}"))),
    )?;
    if let Some(color) = tint {
        host.set_tint(color);
    }
    host.set_value(cli.value.unwrap_or(file.view.value), false);
    println!("{}", host.readout());

    if cli.drag != 0.0 {
        host.drag(cli.drag, cli.fling);
        let frames = host.run_until_idle(MAX_FRAMES);
        tracing::info!(frames, "ruler settled");
    }
    println!("final: {}", format_value(host.ruler().value()));
    tracing::debug!(state = ?host.ruler().debug_info(), "final state");

    if let Some(path) = &cli.svg {
        fs::write(path, host.render_svg())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote SVG snapshot");
    }
    Ok(())
}

/// Flags override the file; anything missing falls back to a 20 cm ruler.
fn resolve_ruler(cli: &Cli, file: Option<RulerConfig>) -> RulerConfig {
    let base = file.unwrap_or_else(|| RulerConfig::new(Unit::Centimeter, 20.0));
    RulerConfig::new(
        cli.unit.unwrap_or(base.unit()),
        cli.length.unwrap_or(base.length()),
    )
    .with_step(cli.step.unwrap_or(base.step()))
    .with_line_width(cli.line_width.unwrap_or(base.line_width()))
}

fn parse_tint(text: &str) -> Result<Color> {
    let color = parse_color(text).map_err(|err| anyhow!("invalid tint {text:?}: {err}"))?;
    Ok(color.to_alpha_color::<Srgb>())
}
