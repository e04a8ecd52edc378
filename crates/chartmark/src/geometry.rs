//! Pixel-space geometry shared by hit-testing and interaction.

use crate::coords::ScreenPos;

/// Distance from a point to a line segment. A zero-length segment degrades
/// to plain point distance.
pub fn point_segment_distance(point: ScreenPos, start: ScreenPos, end: ScreenPos) -> f32 {
    let a = point.x - start.x;
    let b = point.y - start.y;
    let c = end.x - start.x;
    let d = end.y - start.y;

    let len_sq = c * c + d * d;
    let param = if len_sq != 0.0 {
        (a * c + b * d) / len_sq
    } else {
        -1.0
    };

    let (xx, yy) = if param < 0.0 {
        (start.x, start.y)
    } else if param > 1.0 {
        (end.x, end.y)
    } else {
        (start.x + param * c, start.y + param * d)
    };

    let dx = point.x - xx;
    let dy = point.y - yy;
    (dx * dx + dy * dy).sqrt()
}

/// Whether a point lies within `threshold` pixels of a segment.
pub fn point_near_segment(
    point: ScreenPos,
    start: ScreenPos,
    end: ScreenPos,
    threshold: f32,
) -> bool {
    point_segment_distance(point, start, end) <= threshold
}

/// Whether a point lies inside the axis-aligned box of two corners.
pub fn point_in_rect(point: ScreenPos, corner1: ScreenPos, corner2: ScreenPos) -> bool {
    let min_x = corner1.x.min(corner2.x);
    let max_x = corner1.x.max(corner2.x);
    let min_y = corner1.y.min(corner2.y);
    let max_y = corner1.y.max(corner2.y);
    point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
}

/// The three pitchfork rays: median from `head`, plus one parallel ray from
/// each prong. All run along head -> midpoint(prong1, prong2), extended by
/// `extension` pixels.
pub fn pitchfork_rays(
    head: ScreenPos,
    prong1: ScreenPos,
    prong2: ScreenPos,
    extension: f32,
) -> [(ScreenPos, ScreenPos); 3] {
    let mid_x = (prong1.x + prong2.x) / 2.0;
    let mid_y = (prong1.y + prong2.y) / 2.0;
    let dx = mid_x - head.x;
    let dy = mid_y - head.y;

    let len = (dx * dx + dy * dy).sqrt();
    let ratio = extension / if len == 0.0 { 1.0 } else { len };
    let ex = dx * ratio;
    let ey = dy * ratio;

    let extend = |p: ScreenPos| ScreenPos::new(p.x + ex, p.y + ey);
    [
        (head, extend(head)),
        (prong1, extend(prong1)),
        (prong2, extend(prong2)),
    ]
}
