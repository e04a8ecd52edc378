//! Pixel-space hit-testing for annotations.

use crate::coords::{CoordinateMapper, ScreenPos};
use crate::geometry::{point_in_rect, point_near_segment, pitchfork_rays};

use super::store::AnnotationStore;
use super::types::{Annotation, AnnotationId, AnnotationKind};

/// Line proximity threshold in pixels.
pub const HIT_THRESHOLD: f32 = 5.0;
/// Anchor grab radius in pixels.
pub const ANCHOR_RADIUS: f32 = 8.0;

/// Fixed bounding box of text/icon labels.
const LABEL_WIDTH: f32 = 50.0;
const LABEL_HEIGHT: f32 = 20.0;
/// How far pitchfork rays are projected for hit purposes.
const PITCHFORK_EXTENSION: f32 = 1000.0;
/// Minimum rendered width of position boxes.
const POSITION_MIN_WIDTH: f32 = 50.0;

/// Whether the cursor hits the annotation. Anchors that cannot be mapped to
/// pixels (off the active scale) make their geometry unhittable rather than
/// erroring.
pub fn hit_test(
    annotation: &Annotation,
    cursor: ScreenPos,
    mapper: &dyn CoordinateMapper,
) -> bool {
    let anchors = &annotation.anchors;
    match annotation.kind {
        AnnotationKind::TrendLine | AnnotationKind::Fibonacci => {
            segment_hit(annotation, 0, 1, cursor, mapper)
        }
        AnnotationKind::HorizontalLine => {
            let Some(y) = anchors
                .first()
                .and_then(|a| mapper.price_to_y(a.price))
            else {
                return false;
            };
            (cursor.y - y).abs() <= HIT_THRESHOLD
        }
        AnnotationKind::Rectangle | AnnotationKind::Measure => {
            let (Some(c1), Some(c2)) = (
                screen_anchor(annotation, 0, mapper),
                screen_anchor(annotation, 1, mapper),
            ) else {
                return false;
            };
            point_in_rect(cursor, c1, c2)
        }
        AnnotationKind::Text | AnnotationKind::Icon => {
            let Some(p) = screen_anchor(annotation, 0, mapper) else {
                return false;
            };
            cursor.x >= p.x
                && cursor.x <= p.x + LABEL_WIDTH
                && cursor.y >= p.y - LABEL_HEIGHT
                && cursor.y <= p.y
        }
        AnnotationKind::Brush | AnnotationKind::ElliottWave => {
            (1..anchors.len()).any(|i| segment_hit(annotation, i - 1, i, cursor, mapper))
        }
        AnnotationKind::Pitchfork => {
            let (Some(head), Some(p2), Some(p3)) = (
                screen_anchor(annotation, 0, mapper),
                screen_anchor(annotation, 1, mapper),
                screen_anchor(annotation, 2, mapper),
            ) else {
                return false;
            };
            let rays = pitchfork_rays(head, p2, p3, PITCHFORK_EXTENSION);
            rays.iter()
                .any(|(s, e)| point_near_segment(cursor, *s, *e, HIT_THRESHOLD))
                || point_near_segment(cursor, p2, p3, HIT_THRESHOLD)
        }
        AnnotationKind::LongPosition | AnnotationKind::ShortPosition => {
            let (Some(entry), Some(tp), Some(sl)) = (
                screen_anchor(annotation, 0, mapper),
                screen_anchor(annotation, 1, mapper),
                screen_anchor(annotation, 2, mapper),
            ) else {
                return false;
            };
            let right_x = entry.x + POSITION_MIN_WIDTH.max(tp.x.max(sl.x) - entry.x);
            let profit = point_in_rect(cursor, entry, ScreenPos::new(right_x, tp.y));
            let loss = point_in_rect(cursor, entry, ScreenPos::new(right_x, sl.y));
            profit || loss
        }
    }
}

/// The index of the annotation's anchor within grab radius of the cursor.
pub fn anchor_hit(
    annotation: &Annotation,
    cursor: ScreenPos,
    mapper: &dyn CoordinateMapper,
) -> Option<usize> {
    annotation.anchors.iter().enumerate().find_map(|(i, a)| {
        let p = mapper.point_to_screen(*a)?;
        (cursor.distance_to(p) <= ANCHOR_RADIUS).then_some(i)
    })
}

/// Topmost annotation under the cursor; the most recently added wins ties.
pub fn topmost_hit(
    store: &AnnotationStore,
    cursor: ScreenPos,
    mapper: &dyn CoordinateMapper,
) -> Option<AnnotationId> {
    store
        .iter_topmost_first()
        .find(|a| hit_test(a, cursor, mapper))
        .map(|a| a.id)
}

fn screen_anchor(
    annotation: &Annotation,
    index: usize,
    mapper: &dyn CoordinateMapper,
) -> Option<ScreenPos> {
    annotation
        .anchors
        .get(index)
        .and_then(|a| mapper.point_to_screen(*a))
}

fn segment_hit(
    annotation: &Annotation,
    i: usize,
    j: usize,
    cursor: ScreenPos,
    mapper: &dyn CoordinateMapper,
) -> bool {
    let (Some(a), Some(b)) = (
        screen_anchor(annotation, i, mapper),
        screen_anchor(annotation, j, mapper),
    ) else {
        return false;
    };
    point_near_segment(cursor, a, b, HIT_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::LinearScale;
    use chartmark_core::DataPoint;

    /// 1px per ms horizontally, 1px per price unit vertically (inverted).
    fn scale() -> LinearScale {
        LinearScale::new(0, 1000, 0.0, 500.0, 1000.0, 500.0)
    }

    fn at(kind: AnnotationKind, anchors: &[(i64, f64)]) -> Annotation {
        Annotation::new(
            kind,
            anchors.iter().map(|&(t, p)| DataPoint::new(t, p)).collect(),
        )
    }

    #[test]
    fn test_horizontal_line_threshold() {
        let line = at(AnnotationKind::HorizontalLine, &[(100, 250.0)]);
        let map = scale();
        // price 250 -> y 250; exactly on the row hits anywhere across the width
        assert!(hit_test(&line, ScreenPos::new(900.0, 250.0), &map));
        assert!(hit_test(&line, ScreenPos::new(10.0, 254.5), &map));
        // 6px away misses
        assert!(!hit_test(&line, ScreenPos::new(10.0, 256.0), &map));
    }

    #[test]
    fn test_trend_line_segment_distance() {
        let line = at(AnnotationKind::TrendLine, &[(100, 400.0), (300, 400.0)]);
        let map = scale();
        // y = 100 on screen for price 400
        assert!(hit_test(&line, ScreenPos::new(200.0, 104.0), &map));
        assert!(!hit_test(&line, ScreenPos::new(200.0, 106.5), &map));
        // Past the endpoint: measured to the endpoint, not the infinite line
        assert!(!hit_test(&line, ScreenPos::new(310.0, 100.0), &map));
    }

    #[test]
    fn test_rectangle_containment() {
        let rect = at(AnnotationKind::Rectangle, &[(100, 400.0), (300, 300.0)]);
        let map = scale();
        assert!(hit_test(&rect, ScreenPos::new(200.0, 150.0), &map));
        assert!(!hit_test(&rect, ScreenPos::new(200.0, 250.0), &map));
    }

    #[test]
    fn test_text_label_box() {
        let text = at(AnnotationKind::Text, &[(100, 400.0)]);
        let map = scale();
        // Anchor maps to (100, 100); box spans x 100..150, y 80..100
        assert!(hit_test(&text, ScreenPos::new(120.0, 90.0), &map));
        assert!(!hit_test(&text, ScreenPos::new(151.0, 90.0), &map));
        assert!(!hit_test(&text, ScreenPos::new(120.0, 101.0), &map));
    }

    #[test]
    fn test_brush_per_segment() {
        let brush = at(
            AnnotationKind::Brush,
            &[(100, 400.0), (150, 390.0), (200, 400.0)],
        );
        let map = scale();
        assert!(hit_test(&brush, ScreenPos::new(175.0, 105.0), &map));
        assert!(!hit_test(&brush, ScreenPos::new(175.0, 130.0), &map));
    }

    #[test]
    fn test_position_boxes_and_min_width() {
        // Entry at (100, 250), TP above, SL below, both at time 110, so
        // only 10px wide, so the 50px minimum applies.
        let pos = at(
            AnnotationKind::LongPosition,
            &[(100, 250.0), (110, 300.0), (110, 200.0)],
        );
        let map = scale();
        // Profit box: x 100..150, y 200..250 (price 250..300)
        assert!(hit_test(&pos, ScreenPos::new(140.0, 220.0), &map));
        // Loss box: x 100..150, y 250..300
        assert!(hit_test(&pos, ScreenPos::new(140.0, 280.0), &map));
        // Beyond the 50px minimum width
        assert!(!hit_test(&pos, ScreenPos::new(155.0, 220.0), &map));
    }

    #[test]
    fn test_pitchfork_median_ray() {
        // Head at (100, 250); prongs symmetric about y so the median ray is
        // horizontal through y = 250.
        let fork = at(
            AnnotationKind::Pitchfork,
            &[(100, 250.0), (200, 300.0), (200, 200.0)],
        );
        let map = scale();
        // Far along the median ray, still within the 1000px extension
        assert!(hit_test(&fork, ScreenPos::new(800.0, 250.0), &map));
        // Between the rays, away from all three
        assert!(!hit_test(&fork, ScreenPos::new(800.0, 230.0), &map));
    }

    #[test]
    fn test_unmappable_anchor_is_no_match() {
        // Anchor outside the scale's time window.
        let line = at(AnnotationKind::TrendLine, &[(-500, 400.0), (300, 400.0)]);
        let map = scale();
        assert!(!hit_test(&line, ScreenPos::new(200.0, 100.0), &map));
    }

    #[test]
    fn test_anchor_hit_radius() {
        let line = at(AnnotationKind::TrendLine, &[(100, 400.0), (300, 300.0)]);
        let map = scale();
        assert_eq!(anchor_hit(&line, ScreenPos::new(105.0, 105.0), &map), Some(0));
        assert_eq!(anchor_hit(&line, ScreenPos::new(300.0, 207.0), &map), Some(1));
        assert_eq!(anchor_hit(&line, ScreenPos::new(112.0, 100.0), &map), None);
    }

    #[test]
    fn test_topmost_wins() {
        let mut store = AnnotationStore::new();
        let bottom = store.add(at(AnnotationKind::Rectangle, &[(100, 400.0), (300, 300.0)]));
        let top = store.add(at(AnnotationKind::Rectangle, &[(150, 380.0), (250, 320.0)]));
        let map = scale();
        // Overlap region: the later addition wins.
        assert_eq!(topmost_hit(&store, ScreenPos::new(200.0, 150.0), &map), Some(top));
        // Only the bottom rectangle covers this point.
        assert_eq!(topmost_hit(&store, ScreenPos::new(110.0, 110.0), &map), Some(bottom));
        assert_eq!(topmost_hit(&store, ScreenPos::new(600.0, 450.0), &map), None);
    }
}
