//! Scan diagnostics: timing and counts for one detection run.
//!
//! These are permanent instrumentation for tuning tolerance and size
//! thresholds. [`detect_with_diagnostics`] collects them alongside the
//! detection result.
//!
//! Timestamps come from a caller-supplied [`Clock`] so this crate never
//! reads the system time itself. Durations are serialized as fractional
//! seconds (`f64`) for JSON compatibility, since `std::time::Duration`
//! does not implement serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::detector::{DetectorKind, RectangleDetector};
use crate::picture::{Picture, RasterSource};
use crate::scan::ScanStats;
use crate::types::{DetectConfig, DetectError, DetectResult, Dimensions};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp.
    type Instant;

    /// The current time.
    fn now(&self) -> Self::Instant;

    /// Time passed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDiagnostics {
    /// Scanned picture size.
    pub dimensions: Dimensions,
    /// Total pixel count.
    pub pixel_count: u64,
    /// Inferred background color.
    pub background: Color,
    /// Strategy that ran.
    pub detector: DetectorKind,
    /// Tolerance used.
    pub tolerance: u32,
    /// Time spent inferring the background (seconds).
    #[serde(with = "duration_serde")]
    pub background_duration: Duration,
    /// Time spent scanning (seconds).
    #[serde(with = "duration_serde")]
    pub scan_duration: Duration,
    /// Wall-clock duration of the whole run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Scan counters.
    pub stats: ScanStats,
}

impl ScanDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Scan Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.dimensions.width, self.dimensions.height, self.pixel_count,
        ));
        lines.push(format!(
            "Background: {}  Detector: {:?}  Tolerance: {}",
            self.background, self.detector, self.tolerance,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms (background {:.3}ms, scan {:.3}ms)",
            duration_ms(self.total_duration),
            duration_ms(self.background_duration),
            duration_ms(self.scan_duration),
        ));
        lines.push(String::new());

        let s = &self.stats;
        lines.push(format!(
            "Seeds: {}  |  Closed: {}  |  Stuck: {}  |  Too small: {}  |  Budget exhausted: {}",
            s.seeds, s.closed, s.stuck, s.too_small, s.budget_exhausted,
        ));
        lines.push(format!(
            "Shapes: {} completed, {} incomplete",
            s.completed, s.incomplete,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Run detection on `picture` while collecting [`ScanDiagnostics`].
///
/// # Errors
///
/// Returns [`DetectError::InvalidConfig`] if `config` fails validation.
pub fn detect_with_diagnostics<S: RasterSource, C: Clock>(
    picture: &Picture<S>,
    config: &DetectConfig,
    clock: &C,
) -> Result<(DetectResult, ScanDiagnostics), DetectError> {
    config.validate()?;
    let start = clock.now();

    let background = picture.background_color();
    let background_duration = clock.elapsed(&start);

    let scan_start = clock.now();
    let output = config.detector.detect(picture, background, config);
    let scan_duration = clock.elapsed(&scan_start);

    let dimensions = picture.dimensions();
    let diagnostics = ScanDiagnostics {
        dimensions,
        pixel_count: dimensions.pixel_count(),
        background,
        detector: config.detector,
        tolerance: config.tolerance,
        background_duration,
        scan_duration,
        total_duration: clock.elapsed(&start),
        stats: output.stats,
    };
    let result = DetectResult {
        shapes: output.shapes,
        dimensions,
        background,
    };
    Ok((result, diagnostics))
}
