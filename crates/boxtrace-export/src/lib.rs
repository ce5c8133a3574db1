//! boxtrace-export: Pure serializers for detection results (sans-IO)
//!
//! Renders detected shapes as an SVG overlay or draws them onto a copy
//! of the scanned raster. Completed shapes are green, incomplete ones red.

pub mod annotate;
pub mod svg;

pub use annotate::{AnnotateStyle, ExportError, annotate};
pub use svg::{SvgMetadata, to_svg};
