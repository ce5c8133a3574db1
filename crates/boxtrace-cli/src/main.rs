//! boxtrace: find rectangles in an image from the command line.
//!
//! Decodes an image file, runs rectangle detection with configurable
//! parameters and prints the shapes plus a diagnostics report. Useful for:
//!
//! - Comparing the border-trace and segment-scan detectors
//! - Tuning tolerance and minimum block size for a family of images
//! - Producing an annotated copy or SVG overlay for inspection
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin boxtrace -- [OPTIONS] <IMAGE_PATH>
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use boxtrace_export::{AnnotateStyle, SvgMetadata};
use boxtrace_pipeline::diagnostics::{Clock, ScanDiagnostics};
use boxtrace_pipeline::{DetectConfig, DetectResult, DetectorKind};
use clap::{Parser, ValueEnum};
use tracing::info;

/// Find axis-aligned rectangles in an image by tracing contrast borders.
#[derive(Parser)]
#[command(name = "boxtrace", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Border neighbourhood radius and consecutive-miss limit in pixels.
    #[arg(long, default_value_t = DetectConfig::DEFAULT_TOLERANCE, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    tolerance: u32,

    /// Minimum width of a completed rectangle in pixels.
    #[arg(long, default_value_t = DetectConfig::DEFAULT_MIN_WIDTH)]
    min_width: u32,

    /// Minimum height of a completed rectangle in pixels.
    #[arg(long, default_value_t = DetectConfig::DEFAULT_MIN_HEIGHT)]
    min_height: u32,

    /// Also report traces that did not close or came out too small.
    #[arg(long)]
    keep_incomplete: bool,

    /// Upper bound on search moves per trace.
    #[arg(long, default_value_t = DetectConfig::DEFAULT_MAX_TRACE_STEPS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_trace_steps: usize,

    /// Detection strategy.
    #[arg(long, value_enum, default_value_t = Detector::BorderTrace)]
    detector: Detector,

    /// Full detection config as a JSON string.
    ///
    /// When provided, all other detection parameter flags are ignored.
    /// Missing fields take their default values.
    #[arg(long)]
    config_json: Option<String>,

    /// Write an annotated copy of the image to this path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fill opacity of annotated shapes (0.0-1.0).
    #[arg(long, default_value_t = AnnotateStyle::DEFAULT_ALPHA)]
    alpha: f32,

    /// Write an SVG overlay to this path.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Print shapes and diagnostics as JSON instead of a text report.
    #[arg(long)]
    json: bool,
}

/// Detection strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Detector {
    /// Follow each outline with mirrored rails until they meet.
    BorderTrace,
    /// Grow boxes from long horizontal contrast runs.
    SegmentScan,
}

/// Build a [`DetectConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<DetectConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(DetectConfig {
        tolerance: cli.tolerance,
        min_width: cli.min_width,
        min_height: cli.min_height,
        keep_incomplete: cli.keep_incomplete,
        max_trace_steps: cli.max_trace_steps,
        detector: match cli.detector {
            Detector::BorderTrace => DetectorKind::BorderTrace,
            Detector::SegmentScan => DetectorKind::SegmentScan,
        },
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli)?;

    let image_bytes = std::fs::read(&cli.image_path)
        .map_err(|e| format!("Error reading {}: {e}", cli.image_path.display()))?;
    info!(
        path = %cli.image_path.display(),
        bytes = image_bytes.len(),
        "loaded image"
    );

    let picture = boxtrace_pipeline::decode::decode_picture(&image_bytes)
        .map_err(|e| format!("Detection error: {e}"))?;
    let (result, diagnostics) =
        boxtrace_pipeline::diagnostics::detect_with_diagnostics(&picture, &config, &StdClock)
            .map_err(|e| format!("Detection error: {e}"))?;

    if cli.json {
        print_json(&result, &diagnostics)?;
    } else {
        print_report(&result, &diagnostics);
    }

    if let Some(ref out_path) = cli.out {
        let style = AnnotateStyle {
            alpha: cli.alpha,
            ..AnnotateStyle::default()
        };
        let annotated = boxtrace_export::annotate(picture.source(), &result.shapes, &style)
            .map_err(|e| format!("Annotation error: {e}"))?;
        annotated
            .save(out_path)
            .map_err(|e| format!("Error writing {}: {e}", out_path.display()))?;
        info!(path = %out_path.display(), "annotated image written");
    }

    if let Some(ref svg_path) = cli.svg {
        write_svg(svg_path, &cli.image_path, &config, &result)?;
    }

    Ok(())
}

fn print_report(result: &DetectResult, diagnostics: &ScanDiagnostics) {
    for shape in &result.shapes {
        println!("{shape}");
    }
    println!();
    println!("{}", diagnostics.report());
}

fn print_json(result: &DetectResult, diagnostics: &ScanDiagnostics) -> Result<(), String> {
    let value = serde_json::json!({
        "result": result,
        "diagnostics": diagnostics,
    });
    let json = serde_json::to_string_pretty(&value)
        .map_err(|e| format!("Error serializing output: {e}"))?;
    println!("{json}");
    Ok(())
}

fn write_svg(
    svg_path: &Path,
    image_path: &Path,
    config: &DetectConfig,
    result: &DetectResult,
) -> Result<(), String> {
    let title = image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("boxtrace");
    let desc = format!(
        "tolerance={} min_width={} min_height={} detector={:?}",
        config.tolerance, config.min_width, config.min_height, config.detector,
    );
    let config_json = serde_json::to_string(config).ok();
    let metadata = SvgMetadata {
        title: Some(title),
        description: Some(&desc),
        config_json: config_json.as_deref(),
    };
    let svg = boxtrace_export::to_svg(&result.shapes, result.dimensions, &metadata);
    std::fs::write(svg_path, &svg)
        .map_err(|e| format!("Error writing SVG to {}: {e}", svg_path.display()))?;
    info!(path = %svg_path.display(), bytes = svg.len(), "SVG written");
    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("boxtrace").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_detect_config() {
        let cli = parse(&["in.png"]);
        assert_eq!(config_from_cli(&cli).unwrap(), DetectConfig::default());
    }

    #[test]
    fn flags_build_config() {
        let cli = parse(&[
            "in.png",
            "--tolerance",
            "2",
            "--min-width",
            "10",
            "--keep-incomplete",
            "--detector",
            "segment-scan",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.tolerance, 2);
        assert_eq!(config.min_width, 10);
        assert_eq!(config.min_height, DetectConfig::DEFAULT_MIN_HEIGHT);
        assert!(config.keep_incomplete);
        assert_eq!(config.detector, DetectorKind::SegmentScan);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "in.png",
            "--tolerance",
            "7",
            "--config-json",
            r#"{"min_height": 5}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.tolerance, DetectConfig::DEFAULT_TOLERANCE);
        assert_eq!(config.min_height, 5);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = parse(&["in.png", "--config-json", "{"]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.contains("--config-json"));
    }

    #[test]
    fn zero_tolerance_flag_is_rejected() {
        let parsed = Cli::try_parse_from(["boxtrace", "in.png", "--tolerance", "0"]);
        assert!(parsed.is_err());
    }
}
