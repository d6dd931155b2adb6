//! cloud2view: decode a point cloud file and prepare it for display.
//!
//! Reads a `.pcd` (ascii or binary payload) or `.xyz` file, reports the point
//! count and source-space bounding box, and optionally writes the normalized
//! positions and colors as JSON for a renderer to consume.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use cloudfmt::{decode, Format, ParseMeta};
use cloudprep::{normalize, ColorMode, RenderBuffer};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Which decoder to apply to the input file.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    /// Pick from the file extension.
    Auto,
    /// Structured PCD (ascii or binary payload).
    Pcd,
    /// Plain whitespace-delimited `x y z` text.
    Xyz,
}

/// Per-point color policy for the render buffer.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorArg {
    /// Uniform blue.
    Flat,
    /// Blue-to-red ramp over the normalized z range.
    Altitude,
}

#[derive(Parser, Debug)]
#[command(name = "cloud2view", version)]
struct Args {
    /// Input point cloud file (.pcd or .xyz).
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    #[arg(long, value_enum, default_value_t = ColorArg::Flat)]
    color_mode: ColorArg,

    /// Write the normalized buffer (with metadata) as JSON to this path.
    /// Without it, only the metadata is printed.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

/// What lands in the JSON dump: source-space metadata plus the render buffer.
#[derive(Serialize)]
struct ViewDump<'a> {
    meta: &'a ParseMeta,
    #[serde(flatten)]
    buffer: &'a RenderBuffer,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let format = match args.format {
        FormatArg::Pcd => Format::Pcd,
        FormatArg::Xyz => Format::Xyz,
        FormatArg::Auto => {
            let ext = args.input.extension().and_then(|e| e.to_str()).unwrap_or("");
            match Format::from_extension(ext) {
                Some(f) => f,
                None => bail!(
                    "cannot infer a format from `{}`; pass --format pcd|xyz",
                    args.input.display()
                ),
            }
        }
    };

    let bytes = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let (points, meta) = decode(&bytes, format)
        .with_context(|| format!("decoding {}", args.input.display()))?;

    info!(
        "{}: {} points, bounds min {:?} max {:?}",
        args.input.display(),
        meta.num_points,
        meta.bounds.min,
        meta.bounds.max
    );
    if meta.num_points == 0 {
        warn!("no points decoded; emitting the placeholder cloud");
    }

    let color_mode = match args.color_mode {
        ColorArg::Flat => ColorMode::Flat,
        ColorArg::Altitude => ColorMode::Altitude,
    };
    let buffer = normalize(&points, &meta.bounds, color_mode);

    match &args.out {
        Some(out_path) => {
            let dump = ViewDump {
                meta: &meta,
                buffer: &buffer,
            };
            let json = if args.pretty {
                serde_json::to_string_pretty(&dump)?
            } else {
                serde_json::to_string(&dump)?
            };
            fs::write(out_path, json)
                .with_context(|| format!("writing {}", out_path.display()))?;
            info!(
                "OK {} -> {} ({} points in buffer)",
                args.input.display(),
                out_path.display(),
                buffer.num_points()
            );
        }
        None => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&meta)?
            } else {
                serde_json::to_string(&meta)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
