//! Geometric predicates on transformed polygon vertices

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (inclusive on all sides)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Tightest box around a non-empty point set
    pub fn from_points(points: &[Vec2]) -> Self {
        let first = points.first().copied().unwrap_or(Vec2::ZERO);
        points.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |acc, &p| Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        )
    }

    /// Box spanned by a segment
    #[inline]
    pub fn from_segment(p0: Vec2, p1: Vec2) -> Self {
        Self {
            min: p0.min(p1),
            max: p0.max(p1),
        }
    }

    /// Touching boxes count as overlapping
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x >= other.min.x
            && other.max.x >= self.min.x
            && self.max.y >= other.min.y
            && other.max.y >= self.min.y
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Orientation of `c` relative to the line through `a` and `b`
///
/// Positive for a left turn, negative for a right turn, zero when collinear.
#[inline]
pub fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (a - c).perp_dot(b - c)
}

/// Whether segments `p0-p1` and `p2-p3` intersect (touching counts)
pub fn segments_intersect(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> bool {
    Aabb::from_segment(p0, p1).overlaps(&Aabb::from_segment(p2, p3))
        && orientation(p0, p2, p3) * orientation(p1, p2, p3) <= 0.0
        && orientation(p2, p0, p1) * orientation(p3, p0, p1) <= 0.0
}

/// Even-odd ray crossing test against an implicitly closed vertex loop
///
/// The crossing condition skips edges that do not straddle `v.y`, so the
/// division never sees a horizontal edge. Points exactly on an edge may
/// land on either side.
pub fn point_in_polygon(v: Vec2, vertices: &[Vec2]) -> bool {
    let Some(&last) = vertices.last() else {
        return false;
    };

    let mut inside = false;
    let mut first = last;
    for &second in vertices {
        if (second.y > v.y) != (first.y > v.y)
            && v.x < (first.x - second.x) * (v.y - second.y) / (first.y - second.y) + second.x
        {
            inside = !inside;
        }
        first = second;
    }
    inside
}
