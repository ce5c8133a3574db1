//! Raster annotation: paint detected shapes onto a copy of the image.
//!
//! Each shape gets a translucent fill over its traced pixels and an
//! opaque one-pixel outline, green for completed shapes and red for
//! incomplete ones.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use boxtrace_pipeline::Shape;

/// Errors that can occur while annotating.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Fill opacity outside `0.0..=1.0`.
    #[error("fill alpha must be within 0.0..=1.0, got {0}")]
    InvalidAlpha(f32),
}

/// Colors and opacity used by [`annotate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotateStyle {
    /// Color of completed shapes.
    pub completed: Rgb<u8>,
    /// Color of incomplete shapes.
    pub incomplete: Rgb<u8>,
    /// Fill opacity, `0.0` (no fill) to `1.0` (solid).
    pub alpha: f32,
    /// Draw a solid outline around each shape.
    pub outline: bool,
}

impl AnnotateStyle {
    /// Default [`completed`](Self::completed) color.
    pub const DEFAULT_COMPLETED: Rgb<u8> = Rgb([0, 176, 80]);
    /// Default [`incomplete`](Self::incomplete) color.
    pub const DEFAULT_INCOMPLETE: Rgb<u8> = Rgb([224, 48, 48]);
    /// Default [`alpha`](Self::alpha).
    pub const DEFAULT_ALPHA: f32 = 0.35;

    /// Color for `shape` under this style.
    #[must_use]
    pub const fn color_for(&self, shape: &Shape) -> Rgb<u8> {
        if shape.is_completed() {
            self.completed
        } else {
            self.incomplete
        }
    }
}

impl Default for AnnotateStyle {
    fn default() -> Self {
        Self {
            completed: Self::DEFAULT_COMPLETED,
            incomplete: Self::DEFAULT_INCOMPLETE,
            alpha: Self::DEFAULT_ALPHA,
            outline: true,
        }
    }
}

/// Blend `color` over `base` with opacity `alpha`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(base: Rgb<u8>, color: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let mix = |b: u8, c: u8| {
        let v = f32::from(b).mul_add(1.0 - alpha, f32::from(c) * alpha);
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgb([
        mix(base[0], color[0]),
        mix(base[1], color[1]),
        mix(base[2], color[2]),
    ])
}

/// Inclusive pixel range of `shape` clipped to `0..limit`, or `None`
/// when it lies entirely outside.
fn clip(start: i32, span: u32, limit: u32) -> Option<(u32, u32)> {
    let end = i64::from(start) + i64::from(span);
    let first = u32::try_from(i64::from(start).max(0)).ok()?;
    let last = u32::try_from(end.min(i64::from(limit) - 1)).ok()?;
    (first <= last).then_some((first, last))
}

/// Return a copy of `image` with `shapes` painted on top.
///
/// Shapes are drawn in order, so later shapes cover earlier ones where
/// they overlap. Parts of a shape outside the image are clipped.
///
/// # Errors
///
/// Returns [`ExportError::InvalidAlpha`] if `style.alpha` is not within
/// `0.0..=1.0`.
pub fn annotate(
    image: &RgbImage,
    shapes: &[Shape],
    style: &AnnotateStyle,
) -> Result<RgbImage, ExportError> {
    if !(0.0..=1.0).contains(&style.alpha) {
        return Err(ExportError::InvalidAlpha(style.alpha));
    }

    let mut canvas = image.clone();
    for shape in shapes {
        let color = style.color_for(shape);

        if style.alpha > 0.0
            && let Some((x0, x1)) = clip(shape.x(), shape.width(), canvas.width())
            && let Some((y0, y1)) = clip(shape.y(), shape.height(), canvas.height())
        {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let blended = blend(*canvas.get_pixel(x, y), color, style.alpha);
                    canvas.put_pixel(x, y, blended);
                }
            }
        }

        if style.outline {
            let rect = Rect::at(shape.x(), shape.y()).of_size(
                shape.width().saturating_add(1),
                shape.height().saturating_add(1),
            );
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
    }
    Ok(canvas)
}
