//! Integration tests: detect rectangles in synthetic drawings.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use boxtrace_pipeline::{DetectConfig, DetectResult, DetectorKind, Picture, Shape, detect};
use image::{Rgb, RgbImage};
use proptest::prelude::*;

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// Inclusive pixel box `(left, top, right, bottom)`.
type Bounds = (u32, u32, u32, u32);

fn inside((l, t, r, b): Bounds, x: u32, y: u32) -> bool {
    (l..=r).contains(&x) && (t..=b).contains(&y)
}

fn on_outline(bounds: Bounds, thickness: u32, x: u32, y: u32) -> bool {
    let (l, t, r, b) = bounds;
    let k = thickness - 1;
    inside(bounds, x, y) && !inside((l + 1 + k, t + 1 + k, r - 1 - k, b - 1 - k), x, y)
}

fn draw(width: u32, height: u32, ink: impl Fn(u32, u32) -> bool) -> Picture {
    Picture::new(RgbImage::from_fn(width, height, |x, y| {
        if ink(x, y) { INK } else { PAPER }
    }))
    .unwrap()
}

fn run(picture: &Picture) -> DetectResult {
    detect(picture, &DetectConfig::default()).unwrap()
}

fn bbox(shape: &Shape) -> (i32, i32, u32, u32) {
    (shape.x(), shape.y(), shape.width(), shape.height())
}

fn completed(result: &DetectResult) -> Vec<(i32, i32, u32, u32)> {
    result.completed().map(bbox).collect()
}

#[test]
fn filled_rectangle() {
    let pic = draw(80, 50, |x, y| inside((10, 10, 69, 39), x, y));
    assert_eq!(completed(&run(&pic)), vec![(10, 10, 59, 29)]);
}

#[test]
fn one_pixel_outline() {
    let pic = draw(80, 50, |x, y| on_outline((10, 10, 69, 39), 1, x, y));
    assert_eq!(completed(&run(&pic)), vec![(10, 10, 59, 29)]);
}

#[test]
fn thick_outline() {
    let pic = draw(80, 50, |x, y| on_outline((10, 10, 69, 39), 3, x, y));
    assert_eq!(completed(&run(&pic)), vec![(10, 10, 59, 29)]);
}

#[test]
fn rounded_corners() {
    // Each corner is cut by a two-pixel diagonal.
    let pic = draw(80, 50, |x, y| {
        let horizontal = (y == 10 || y == 39) && (12..=67).contains(&x);
        let vertical = (x == 10 || x == 69) && (12..=37).contains(&y);
        let diagonal = matches!((x, y), (11 | 68, 11 | 38));
        horizontal || vertical || diagonal
    });
    assert_eq!(completed(&run(&pic)), vec![(10, 10, 59, 29)]);
}

#[test]
fn gray_box_on_dark_background() {
    let img = RgbImage::from_fn(100, 70, |x, y| {
        if inside((20, 15, 84, 54), x, y) {
            Rgb([180, 180, 170])
        } else {
            Rgb([20, 20, 40])
        }
    });
    let result = run(&Picture::new(img).unwrap());
    assert_eq!(result.background, boxtrace_pipeline::Color::new(20, 20, 40));
    assert_eq!(completed(&result), vec![(20, 15, 64, 39)]);
}

#[test]
fn outline_touching_the_image_corner() {
    let pic = draw(80, 50, |x, y| on_outline((0, 0, 59, 29), 1, x, y));
    assert_eq!(completed(&run(&pic)), vec![(0, 0, 59, 29)]);
}

#[test]
fn small_rectangle_is_not_completed() {
    let pic = draw(60, 40, |x, y| inside((10, 10, 29, 19), x, y));
    assert!(completed(&run(&pic)).is_empty());
}

#[test]
fn blank_image() {
    let pic = draw(64, 64, |_, _| false);
    assert!(run(&pic).shapes.is_empty());
}

#[test]
fn nested_box_is_not_reported_twice() {
    let pic = draw(100, 80, |x, y| {
        on_outline((5, 5, 94, 74), 1, x, y) || on_outline((25, 25, 74, 50), 1, x, y)
    });
    assert_eq!(completed(&run(&pic)), vec![(5, 5, 89, 69)]);
}

#[test]
fn separate_boxes_do_not_overlap() {
    let pic = draw(200, 100, |x, y| {
        on_outline((5, 5, 70, 40), 1, x, y)
            || inside((100, 20, 180, 60), x, y)
            || on_outline((10, 60, 80, 90), 2, x, y)
    });
    let result = run(&pic);
    let shapes: Vec<_> = result.completed().copied().collect();
    assert_eq!(shapes.len(), 3);
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            assert!(!a.intersects(b), "{a} overlaps {b}");
        }
    }
}

fn with_incomplete(keep_incomplete: bool) -> DetectConfig {
    DetectConfig {
        keep_incomplete,
        ..DetectConfig::default()
    }
}

fn assert_no_nesting(shapes: &[Shape]) {
    for (i, a) in shapes.iter().enumerate() {
        for (j, b) in shapes.iter().enumerate() {
            assert!(i == j || !a.encloses(b), "{a} encloses {b}");
        }
    }
}

#[test]
fn overlapping_outlines_are_both_found() {
    let pic = draw(130, 70, |x, y| {
        on_outline((10, 10, 69, 39), 1, x, y) || on_outline((40, 25, 109, 54), 1, x, y)
    });
    for keep in [false, true] {
        let result = detect(&pic, &with_incomplete(keep)).unwrap();
        assert_no_nesting(&result.shapes);
        assert_eq!(
            completed(&result),
            vec![(10, 10, 59, 29), (40, 25, 69, 29)],
            "keep_incomplete = {keep}"
        );
        assert_eq!(result.shapes.len(), 2, "keep_incomplete = {keep}");
    }
}

#[test]
fn boxes_sharing_a_side_merge_into_one() {
    let pic = draw(140, 50, |x, y| {
        on_outline((10, 10, 69, 39), 1, x, y) || on_outline((69, 10, 129, 39), 1, x, y)
    });
    for keep in [false, true] {
        let result = detect(&pic, &with_incomplete(keep)).unwrap();
        assert_no_nesting(&result.shapes);
        assert_eq!(
            result.shapes.iter().map(bbox).collect::<Vec<_>>(),
            vec![(10, 10, 119, 29)],
            "keep_incomplete = {keep}"
        );
    }
}

#[test]
fn huge_tolerance_terminates() {
    let pic = draw(40, 30, |x, y| inside((5, 5, 30, 20), x, y));
    for detector in [DetectorKind::BorderTrace, DetectorKind::SegmentScan] {
        let config = DetectConfig {
            tolerance: u32::MAX,
            detector,
            keep_incomplete: true,
            ..DetectConfig::default()
        };
        let result = detect(&pic, &config).unwrap();
        assert_no_nesting(&result.shapes);
    }
}

#[test]
fn scanning_twice_gives_the_same_shapes() {
    let pic = draw(200, 100, |x, y| {
        on_outline((5, 5, 70, 40), 1, x, y) || inside((100, 20, 180, 60), x, y)
    });
    let config = DetectConfig {
        keep_incomplete: true,
        ..DetectConfig::default()
    };
    let mut first = detect(&pic, &config).unwrap().shapes;
    let mut second = detect(&pic, &config).unwrap().shapes;
    first.sort_by_key(bbox);
    second.sort_by_key(bbox);
    assert_eq!(first, second);
}

#[test]
fn step_budget_of_one_never_completes() {
    let pic = draw(80, 50, |x, y| inside((10, 10, 69, 39), x, y));
    let config = DetectConfig {
        max_trace_steps: 1,
        ..DetectConfig::default()
    };
    assert!(detect(&pic, &config).unwrap().completed().next().is_none());
}

#[test]
fn segment_scan_matches_border_trace_on_clean_boxes() {
    let pic = draw(200, 100, |x, y| {
        on_outline((5, 5, 70, 40), 1, x, y) || inside((100, 20, 180, 60), x, y)
    });
    let traced = run(&pic);
    let segmented = detect(
        &pic,
        &DetectConfig {
            detector: DetectorKind::SegmentScan,
            ..DetectConfig::default()
        },
    )
    .unwrap();
    assert_eq!(completed(&traced), completed(&segmented));
    assert_eq!(completed(&traced).len(), 2);
}

proptest! {
    #[test]
    fn any_large_filled_rectangle_is_found_exactly(
        left in 0u32..=20,
        top in 0u32..=20,
        width in 41u32..=80,
        height in 16u32..=40,
    ) {
        let bounds = (left, top, left + width - 1, top + height - 1);
        let pic = draw(120, 80, |x, y| inside(bounds, x, y));
        let result = run(&pic);

        let expected = (
            i32::try_from(left).unwrap(),
            i32::try_from(top).unwrap(),
            width - 1,
            height - 1,
        );
        prop_assert_eq!(result.shapes.len(), 1);
        prop_assert_eq!(completed(&result), vec![expected]);
    }
}
