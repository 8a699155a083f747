use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glam::IVec2;

use crate::layout::{Arrangement, LayoutStrategy, Options, StripLayout};
use crate::utils::geometry::Rectangle;
use crate::utils::version;

#[derive(Parser)]
#[command(author, version = version(), about, long_about = None)]
#[command(subcommand_value_name = "SUBCOMMAND")]
#[command(subcommand_help_heading = "Subcommands")]
pub struct Cli {
    #[command(subcommand)]
    pub subcommand: Sub,
}

#[derive(Subcommand)]
pub enum Sub {
    /// Compute the layout of a thumbnail strip.
    Layout(LayoutArgs),
    /// Validate the config file.
    Validate {
        /// Path to config file (default: `$XDG_CONFIG_HOME/thumbstrip/config.kdl`).
        ///
        /// This can also be set with the `THUMBSTRIP_CONFIG` environment variable. If both are
        /// set, the command line argument takes precedence.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Number of workspaces.
    #[arg(short = 'n', long, default_value_t = 3)]
    pub workspaces: usize,
    /// Width of the strip box in logical pixels.
    #[arg(long)]
    pub width: i32,
    /// Height of the strip box (default: preferred height for the width).
    #[arg(long)]
    pub height: Option<i32>,
    /// Size of the mirrored screen region.
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "1920x1080", value_parser = parse_size)]
    pub porthole: IVec2,
    /// Active workspace index, fractional to show a switch in progress.
    #[arg(long, default_value_t = 0.)]
    pub active: f64,
    /// Path to config file (default: `$XDG_CONFIG_HOME/thumbstrip/config.kdl`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Format output as JSON.
    #[arg(short, long)]
    pub json: bool,
}

fn parse_size(value: &str) -> Result<IVec2, String> {
    let (w, h) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let w = w.trim().parse().map_err(|err| format!("invalid width: {err}"))?;
    let h = h.trim().parse().map_err(|err| format!("invalid height: {err}"))?;
    Ok(IVec2::new(w, h))
}

pub fn layout(args: &LayoutArgs, options: &Options) -> anyhow::Result<String> {
    let layout = StripLayout::new(args.workspaces, args.porthole, args.active, options);
    let height = args
        .height
        .unwrap_or_else(|| layout.preferred_height(f64::from(args.width)) as i32);

    let area = Rectangle::from_size(IVec2::new(args.width, height));
    let arrangement = layout.arrange(area).with_context(|| {
        format!(
            "cannot lay out {} workspaces in {}x{height} with porthole {}x{}",
            args.workspaces, args.width, args.porthole.x, args.porthole.y
        )
    })?;

    if args.json {
        let json = serde_json::to_string_pretty(&arrangement).context("error formatting JSON")?;
        return Ok(json);
    }

    Ok(format_arrangement(&arrangement))
}

fn format_arrangement(arrangement: &Arrangement) -> String {
    let mut buf = String::new();
    let strip = arrangement.strip;

    writeln!(buf, "scale: {}", arrangement.scale).unwrap();
    writeln!(
        buf,
        "strip: x {}, width {}, height {}",
        strip.loc.x, strip.size.x, strip.size.y
    )
    .unwrap();

    for (idx, placement) in arrangement.thumbnails.iter().enumerate() {
        let geo = placement.geometry;
        writeln!(
            buf,
            "workspace {idx}: x {}, width {}, scale {} × {}",
            geo.loc.x, geo.size.x, placement.scale.x, placement.scale.y
        )
        .unwrap();
    }

    let indicator = arrangement.indicator;
    write!(
        buf,
        "indicator: x {} to {}, y {} to {}",
        indicator.loc.x,
        indicator.right(),
        indicator.loc.y,
        indicator.loc.y + indicator.size.y
    )
    .unwrap();

    buf
}
