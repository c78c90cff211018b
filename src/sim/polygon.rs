//! Polygon with a lazily cached world transform
//!
//! A polygon keeps its vertices in local space plus a rotation (degrees) and
//! a translation. The transformed vertex list and the bounding box are
//! derived on first read after a mutation and then reused until the next
//! `rotate` / `translate` / `set_*` call resets them.

use std::cell::OnceCell;

use glam::Vec2;

use super::geometry::Aabb;
use crate::error::GeometryError;
use crate::{normalize_degrees, rotate_deg};

#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    /// Degrees, always in [0, 360)
    rotation: f32,
    translation: Vec2,
    transformed: OnceCell<Vec<Vec2>>,
    aabb: OnceCell<Aabb>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: vertices.len(),
            });
        }
        Ok(Self::from_vertices(vertices))
    }

    /// Triangles always satisfy the vertex minimum
    pub fn triangle(vertices: [Vec2; 3]) -> Self {
        Self::from_vertices(vertices.to_vec())
    }

    fn from_vertices(vertices: Vec<Vec2>) -> Self {
        Self {
            vertices,
            rotation: 0.0,
            translation: Vec2::ZERO,
            transformed: OnceCell::new(),
            aabb: OnceCell::new(),
        }
    }

    /// Local-space vertices
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    fn invalidate(&mut self) {
        self.transformed.take();
        self.aabb.take();
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
        self.invalidate();
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
        self.invalidate();
    }

    /// Add to the rotation, modulo 360
    pub fn rotate(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Add to the translation (no wrapping here, see `collision::wrap_position`)
    pub fn translate(&mut self, offset: Vec2) {
        self.set_translation(self.translation + offset);
    }

    /// A local-space point in world space, bypassing the cache
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        rotate_deg(local, self.rotation) + self.translation
    }

    /// World-space vertices, recomputed once per mutation
    pub fn transformed_vertices(&self) -> &[Vec2] {
        self.transformed.get_or_init(|| {
            let rotation = Vec2::from_angle(self.rotation.to_radians());
            self.vertices
                .iter()
                .map(|&v| rotation.rotate(v) + self.translation)
                .collect()
        })
    }

    /// Bounding box of the world-space vertices, recomputed once per mutation
    pub fn aabb(&self) -> Aabb {
        *self
            .aabb
            .get_or_init(|| Aabb::from_points(self.transformed_vertices()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> Polygon {
        Polygon::new(vec![
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, -20.0),
            Vec2::new(-10.0, 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_degenerate() {
        let err = Polygon::new(vec![Vec2::ZERO, Vec2::X]).unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices { count: 2 });
    }

    #[test]
    fn test_rotation_wraps() {
        let mut poly = triangle();
        poly.rotate(350.0);
        poly.rotate(20.0);
        assert!((poly.rotation() - 10.0).abs() < 1e-4);
        poly.rotate(-30.0);
        assert!((poly.rotation() - 340.0).abs() < 1e-4);
    }

    #[test]
    fn test_translation_is_additive_without_modulus() {
        let mut poly = triangle();
        poly.translate(Vec2::new(2000.0, -50.0));
        poly.translate(Vec2::new(1.0, 1.0));
        assert_eq!(poly.translation(), Vec2::new(2001.0, -49.0));
    }

    #[test]
    fn test_cache_refreshes_after_mutation() {
        let mut poly = triangle();
        let before = poly.transformed_vertices().to_vec();
        assert_eq!(before[1], Vec2::new(0.0, -20.0));

        poly.translate(Vec2::new(100.0, 100.0));
        assert_eq!(poly.transformed_vertices()[1], Vec2::new(100.0, 80.0));
        assert_eq!(poly.aabb().min, Vec2::new(90.0, 80.0));

        poly.rotate(180.0);
        let tip = poly.transformed_vertices()[1];
        assert!(tip.abs_diff_eq(Vec2::new(100.0, 120.0), 1e-3));
        assert!((poly.aabb().max.y - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_aabb_read_first_matches_vertices_read_first() {
        let mut a = triangle();
        let mut b = triangle();
        a.translate(Vec2::new(3.0, 4.0));
        b.translate(Vec2::new(3.0, 4.0));
        let aabb_first = a.aabb();
        let _ = b.transformed_vertices();
        assert_eq!(aabb_first, b.aabb());
    }

    #[derive(Debug, Clone)]
    enum Mutation {
        Rotate(f32),
        Translate(f32, f32),
        SetRotation(f32),
        SetTranslation(f32, f32),
    }

    fn mutation() -> impl Strategy<Value = Mutation> {
        prop_oneof![
            (-720.0f32..720.0).prop_map(Mutation::Rotate),
            (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Mutation::Translate(x, y)),
            (-720.0f32..720.0).prop_map(Mutation::SetRotation),
            (-500.0f32..500.0, -500.0f32..500.0)
                .prop_map(|(x, y)| Mutation::SetTranslation(x, y)),
        ]
    }

    proptest! {
        #[test]
        fn prop_cache_never_stale(
            ops in proptest::collection::vec((mutation(), any::<bool>()), 1..20),
        ) {
            let mut poly = triangle();
            for (op, read) in ops {
                match op {
                    Mutation::Rotate(d) => poly.rotate(d),
                    Mutation::Translate(x, y) => poly.translate(Vec2::new(x, y)),
                    Mutation::SetRotation(d) => poly.set_rotation(d),
                    Mutation::SetTranslation(x, y) => poly.set_translation(Vec2::new(x, y)),
                }
                if read {
                    let _ = poly.aabb();
                }
                prop_assert!(poly.rotation() >= 0.0 && poly.rotation() < 360.0);
            }

            let fresh: Vec<Vec2> = poly
                .vertices()
                .iter()
                .map(|&v| poly.transform_point(v))
                .collect();
            for (cached, expected) in poly.transformed_vertices().iter().zip(&fresh) {
                prop_assert!(cached.abs_diff_eq(*expected, 1e-3));
            }
        }

        #[test]
        fn prop_aabb_contains_and_is_tight(
            rot in 0.0f32..360.0,
            tx in -300.0f32..300.0,
            ty in -300.0f32..300.0,
        ) {
            let mut poly = triangle();
            poly.rotate(rot);
            poly.translate(Vec2::new(tx, ty));
            let aabb = poly.aabb();
            let verts = poly.transformed_vertices();
            for &v in verts {
                prop_assert!(aabb.contains(v));
            }
            prop_assert!(verts.iter().any(|v| v.x == aabb.min.x));
            prop_assert!(verts.iter().any(|v| v.x == aabb.max.x));
            prop_assert!(verts.iter().any(|v| v.y == aabb.min.y));
            prop_assert!(verts.iter().any(|v| v.y == aabb.max.y));
        }
    }
}
