//! Collision detection for polygons on a toroidal field
//!
//! The tricky part of the game: an object straddling a field edge is also
//! visible on the opposite edge, so it has to collide there too. Each object
//! carries up to three wrap offsets (horizontal, vertical, diagonal) and the
//! toroidal test runs the plain polygon test at the closest of those images.

use glam::Vec2;

use super::geometry::{Aabb, point_in_polygon, segments_intersect};
use super::polygon::Polygon;

/// Counters for the narrow-phase work done by one collision query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NarrowPhaseStats {
    /// Point-in-polygon tests run
    pub point_tests: u32,
    /// Segment pair tests run
    pub edge_tests: u32,
}

/// Whether two polygons intersect (boolean only, no contact data)
pub fn collides(a: &Polygon, b: &Polygon) -> bool {
    collides_traced(a, b, &mut NarrowPhaseStats::default())
}

/// [`collides`], counting the narrow-phase predicates it had to evaluate
pub fn collides_traced(a: &Polygon, b: &Polygon, stats: &mut NarrowPhaseStats) -> bool {
    if !a.aabb().overlaps(&b.aabb()) {
        return false;
    }

    let a_vertices = a.transformed_vertices();
    let b_vertices = b.transformed_vertices();

    // A vertex of one inside the other catches full containment
    for &v in a_vertices {
        stats.point_tests += 1;
        if point_in_polygon(v, b_vertices) {
            return true;
        }
    }
    for &v in b_vertices {
        stats.point_tests += 1;
        if point_in_polygon(v, a_vertices) {
            return true;
        }
    }

    // Then crossing edges
    for (a0, a1) in edges(a_vertices) {
        for (b0, b1) in edges(b_vertices) {
            stats.edge_tests += 1;
            if segments_intersect(a0, a1, b0, b1) {
                return true;
            }
        }
    }

    false
}

/// Closed-loop edges, starting with (last, first)
fn edges(vertices: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| (vertices[(i + n - 1) % n], vertices[i]))
}

/// Offsets of the toroidal images of a box that overlap the visible field
///
/// A box leaving through the left edge gets `+width`, through the right edge
/// `-width`, and likewise vertically. The diagonal image is added only when
/// both axes straddle. Opposite flags on one axis cannot both be set while
/// the field is larger than the object, so the left/top checks win.
pub fn wrap_offsets(aabb: Aabb, field: Vec2) -> Vec<Vec2> {
    let horizontal = if aabb.min.x < 0.0 {
        field.x
    } else if aabb.max.x >= field.x {
        -field.x
    } else {
        0.0
    };
    let vertical = if aabb.min.y < 0.0 {
        field.y
    } else if aabb.max.y >= field.y {
        -field.y
    } else {
        0.0
    };

    let mut offsets = Vec::with_capacity(3);
    if horizontal != 0.0 {
        offsets.push(Vec2::new(horizontal, 0.0));
    }
    if vertical != 0.0 {
        offsets.push(Vec2::new(0.0, vertical));
    }
    if horizontal != 0.0 && vertical != 0.0 {
        offsets.push(Vec2::new(horizontal, vertical));
    }
    offsets
}

/// Bring a position back into [0, width) x [0, height)
pub fn wrap_position(mut pos: Vec2, field: Vec2) -> Vec2 {
    pos.x = wrap_axis(pos.x, field.x);
    pos.y = wrap_axis(pos.y, field.y);
    pos
}

fn wrap_axis(value: f32, size: f32) -> f32 {
    if !value.is_finite() || size <= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(size);
    // rem_euclid can round up to exactly `size` for tiny negative inputs
    if wrapped >= size { 0.0 } else { wrapped }
}

/// The (a, b) offset pair bringing the two centers closest together
///
/// Zero offsets are always candidates and win ties.
pub fn closest_images(
    a_translation: Vec2,
    a_offsets: &[Vec2],
    b_translation: Vec2,
    b_offsets: &[Vec2],
) -> (Vec2, Vec2) {
    let mut best = (Vec2::ZERO, Vec2::ZERO);
    let mut min_dist = a_translation.distance_squared(b_translation);

    let a_candidates = a_offsets.iter().copied().chain(std::iter::once(Vec2::ZERO));
    for a_off in a_candidates {
        let b_candidates = b_offsets.iter().copied().chain(std::iter::once(Vec2::ZERO));
        for b_off in b_candidates {
            let dist = (a_translation + a_off).distance_squared(b_translation + b_off);
            if dist < min_dist {
                min_dist = dist;
                best = (a_off, b_off);
            }
        }
    }
    best
}

/// Collision test at the closest toroidal configuration of `a` and `b`
///
/// Both polygons are moved to their chosen images for the test and put back
/// at their exact original translations afterwards.
pub fn collides_wrapped(
    a: &mut Polygon,
    a_offsets: &[Vec2],
    b: &mut Polygon,
    b_offsets: &[Vec2],
) -> bool {
    let a_translation = a.translation();
    let b_translation = b.translation();
    let (a_off, b_off) = closest_images(a_translation, a_offsets, b_translation, b_offsets);

    if a_off != Vec2::ZERO {
        a.set_translation(a_translation + a_off);
    }
    if b_off != Vec2::ZERO {
        b.set_translation(b_translation + b_off);
    }

    let hit = collides(a, b);

    if a_off != Vec2::ZERO {
        a.set_translation(a_translation);
    }
    if b_off != Vec2::ZERO {
        b.set_translation(b_translation);
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(1024.0, 768.0);

    fn square_at(size: f32, pos: Vec2) -> Polygon {
        let h = size / 2.0;
        let mut poly = Polygon::new(vec![
            Vec2::new(-h, -h),
            Vec2::new(h, -h),
            Vec2::new(h, h),
            Vec2::new(-h, h),
        ])
        .unwrap();
        poly.set_translation(pos);
        poly
    }

    fn triangle_at(pos: Vec2, rot: f32) -> Polygon {
        let mut poly = Polygon::new(vec![
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, -20.0),
            Vec2::new(-10.0, 5.0),
        ])
        .unwrap();
        poly.set_translation(pos);
        poly.set_rotation(rot);
        poly
    }

    #[test]
    fn test_overlapping_squares_collide() {
        let a = square_at(10.0, Vec2::new(100.0, 100.0));
        let b = square_at(10.0, Vec2::new(106.0, 104.0));
        assert!(collides(&a, &b));
    }

    #[test]
    fn test_containment_collides() {
        let big = square_at(100.0, Vec2::new(200.0, 200.0));
        let small = square_at(4.0, Vec2::new(210.0, 190.0));
        assert!(collides(&big, &small));
        assert!(collides(&small, &big));
    }

    #[test]
    fn test_crossing_without_contained_vertices() {
        // A plus sign: neither bar has a vertex inside the other
        let mut wide = Polygon::new(vec![
            Vec2::new(-20.0, -2.0),
            Vec2::new(20.0, -2.0),
            Vec2::new(20.0, 2.0),
            Vec2::new(-20.0, 2.0),
        ])
        .unwrap();
        let mut tall = Polygon::new(vec![
            Vec2::new(-2.0, -20.0),
            Vec2::new(2.0, -20.0),
            Vec2::new(2.0, 20.0),
            Vec2::new(-2.0, 20.0),
        ])
        .unwrap();
        wide.set_translation(Vec2::new(50.0, 50.0));
        tall.set_translation(Vec2::new(50.0, 50.0));

        let mut stats = NarrowPhaseStats::default();
        assert!(collides_traced(&wide, &tall, &mut stats));
        assert_eq!(stats.point_tests, 8);
        assert!(stats.edge_tests > 0);
    }

    #[test]
    fn test_overlapping_boxes_but_apart() {
        // Triangles whose boxes overlap but whose hulls don't touch
        let a = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ])
        .unwrap();
        let b = Polygon::new(vec![
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 6.0),
            Vec2::new(6.0, 10.0),
        ])
        .unwrap();
        assert!(a.aabb().overlaps(&b.aabb()));
        assert!(!collides(&a, &b));
    }

    #[test]
    fn test_disjoint_boxes_short_circuit() {
        let a = square_at(10.0, Vec2::new(100.0, 100.0));
        let b = square_at(10.0, Vec2::new(300.0, 100.0));
        let mut stats = NarrowPhaseStats::default();
        assert!(!collides_traced(&a, &b, &mut stats));
        assert_eq!(stats, NarrowPhaseStats::default());
    }

    #[test]
    fn test_wrap_offsets_interior_object() {
        let sq = square_at(10.0, Vec2::new(500.0, 400.0));
        assert!(wrap_offsets(sq.aabb(), FIELD).is_empty());
    }

    #[test]
    fn test_wrap_offsets_left_top_corner() {
        let sq = square_at(10.0, Vec2::new(2.0, 1.0));
        let offsets = wrap_offsets(sq.aabb(), FIELD);
        assert_eq!(
            offsets,
            vec![
                Vec2::new(1024.0, 0.0),
                Vec2::new(0.0, 768.0),
                Vec2::new(1024.0, 768.0),
            ]
        );
    }

    #[test]
    fn test_wrap_offsets_right_bottom_corner() {
        let sq = square_at(10.0, Vec2::new(1022.0, 766.0));
        let offsets = wrap_offsets(sq.aabb(), FIELD);
        assert_eq!(
            offsets,
            vec![
                Vec2::new(-1024.0, 0.0),
                Vec2::new(0.0, -768.0),
                Vec2::new(-1024.0, -768.0),
            ]
        );
    }

    #[test]
    fn test_wrap_offsets_mixed_corner() {
        let sq = square_at(10.0, Vec2::new(1.0, 766.0));
        let offsets = wrap_offsets(sq.aabb(), FIELD);
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[2], Vec2::new(1024.0, -768.0));
    }

    #[test]
    fn test_wrap_offsets_single_edge() {
        let sq = square_at(10.0, Vec2::new(500.0, 2.0));
        assert_eq!(wrap_offsets(sq.aabb(), FIELD), vec![Vec2::new(0.0, 768.0)]);
    }

    #[test]
    fn test_wrap_position() {
        assert_eq!(
            wrap_position(Vec2::new(-1.0, 770.0), FIELD),
            Vec2::new(1023.0, 2.0)
        );
        assert_eq!(
            wrap_position(Vec2::new(1024.0, 0.0), FIELD),
            Vec2::new(0.0, 0.0)
        );
        assert_eq!(
            wrap_position(Vec2::new(-3000.0, 100.0), FIELD),
            Vec2::new(72.0, 100.0)
        );
    }

    #[test]
    fn test_wrap_position_far_outside_field() {
        // Subtracting the field size no longer changes values this large
        let pos = wrap_position(Vec2::new(6.0e12, -3.5e13), FIELD);
        assert!((0.0..FIELD.x).contains(&pos.x));
        assert!((0.0..FIELD.y).contains(&pos.y));

        let pos = wrap_position(Vec2::new(-1e-9, 5.0), FIELD);
        assert!((0.0..FIELD.x).contains(&pos.x));
    }

    #[test]
    fn test_collision_across_vertical_edge() {
        let mut left = square_at(10.0, Vec2::new(2.0, 300.0));
        let mut right = square_at(10.0, Vec2::new(1020.0, 300.0));
        let left_offsets = wrap_offsets(left.aabb(), FIELD);
        let right_offsets = wrap_offsets(right.aabb(), FIELD);

        assert!(!collides(&left, &right));
        assert!(collides_wrapped(
            &mut left,
            &left_offsets,
            &mut right,
            &right_offsets
        ));

        // Translations restored exactly
        assert_eq!(left.translation(), Vec2::new(2.0, 300.0));
        assert_eq!(right.translation(), Vec2::new(1020.0, 300.0));
        assert_eq!(left.aabb().min.x, -3.0);
    }

    #[test]
    fn test_collision_across_corner() {
        let mut a = square_at(10.0, Vec2::new(1.0, 1.0));
        let mut b = square_at(10.0, Vec2::new(1022.0, 766.0));
        let a_offsets = wrap_offsets(a.aabb(), FIELD);
        let b_offsets = wrap_offsets(b.aabb(), FIELD);
        assert!(collides_wrapped(&mut a, &a_offsets, &mut b, &b_offsets));
    }

    #[test]
    fn test_no_collision_near_opposite_edges_when_far_vertically() {
        let mut a = square_at(10.0, Vec2::new(2.0, 100.0));
        let mut b = square_at(10.0, Vec2::new(1020.0, 400.0));
        let a_offsets = wrap_offsets(a.aabb(), FIELD);
        let b_offsets = wrap_offsets(b.aabb(), FIELD);
        assert!(!collides_wrapped(&mut a, &a_offsets, &mut b, &b_offsets));
    }

    #[test]
    fn test_closest_images_prefers_zero_on_tie() {
        let (a_off, b_off) = closest_images(
            Vec2::new(10.0, 10.0),
            &[Vec2::new(1024.0, 0.0)],
            Vec2::new(10.0, 10.0),
            &[Vec2::new(1024.0, 0.0)],
        );
        assert_eq!((a_off, b_off), (Vec2::ZERO, Vec2::ZERO));
    }

    proptest! {
        #[test]
        fn prop_collides_symmetric(
            ax in 0.0f32..80.0, ay in 0.0f32..80.0, ar in 0.0f32..360.0,
            bx in 0.0f32..80.0, by in 0.0f32..80.0, br in 0.0f32..360.0,
        ) {
            let a = triangle_at(Vec2::new(ax, ay), ar);
            let b = triangle_at(Vec2::new(bx, by), br);
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }

        #[test]
        fn prop_interior_wrapped_matches_plain(
            ax in 100.0f32..900.0, ay in 100.0f32..650.0, ar in 0.0f32..360.0,
            dx in -40.0f32..40.0, dy in -40.0f32..40.0, br in 0.0f32..360.0,
        ) {
            let mut a = triangle_at(Vec2::new(ax, ay), ar);
            let mut b = triangle_at(Vec2::new(ax + dx, ay + dy), br);
            let a_offsets = wrap_offsets(a.aabb(), FIELD);
            let b_offsets = wrap_offsets(b.aabb(), FIELD);
            prop_assert!(a_offsets.is_empty() && b_offsets.is_empty());
            let plain = collides(&a, &b);
            prop_assert_eq!(collides_wrapped(&mut a, &a_offsets, &mut b, &b_offsets), plain);
        }
    }
}
