//! Math types shared by the planner crates
//!
//! Re-exports glam and provides the bounding volume / ray primitives used
//! for placement and picking.

pub use glam::{Mat4, Quat, Vec3, Vec4};

/// Ray for raycasting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at distance `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Bring the ray into the local space described by `inverse`.
    /// The direction is not renormalized so that distances stay comparable
    /// with the world-space ray.
    pub fn transformed(&self, inverse: &Mat4) -> Ray {
        Ray {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }

    /// Check intersection with AABB using slab method
    /// Returns the distance to intersection point if hit, None otherwise
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let inv = |d: f32| if d.abs() > f32::EPSILON { 1.0 / d } else { f32::MAX };
        let inv_dir = Vec3::new(inv(self.direction.x), inv(self.direction.y), inv(self.direction.z));

        let t1 = (aabb.min - self.origin) * inv_dir;
        let t2 = (aabb.max - self.origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }

    /// Intersection with an infinite plane, only in front of the origin
    pub fn intersect_plane(&self, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
        let denom = self.direction.dot(plane_normal);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = (plane_point - self.origin).dot(plane_normal) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Möller–Trumbore ray/triangle test, both faces
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < 1e-8 {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Empty box (min > max); the identity element of `union`
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Create a unit cube centered at position with given scale
    pub fn unit_cube(center: Vec3, scale: Vec3) -> Self {
        let half = scale * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Tightest box around a set of points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Check if a point is inside the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Largest extent along any axis
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The 8 corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned bounds of this box after applying `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb::from_points(self.corners().into_iter().map(|c| matrix.transform_point3(c)))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);

        let t = ray.intersect_aabb(&aabb).unwrap();
        assert!((t - 4.5).abs() < 0.001);
    }

    #[test]
    fn test_ray_aabb_miss() {
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);
        assert!(ray.intersect_aabb(&aabb).is_none());
    }

    #[test]
    fn test_ray_plane() {
        let ray = Ray::new(Vec3::new(1.0, 10.0, 2.0), Vec3::NEG_Y);
        let t = ray.intersect_plane(Vec3::ZERO, Vec3::Y).unwrap();
        assert!((t - 10.0).abs() < 1e-5);
        assert_eq!(ray.point_at(t), Vec3::new(1.0, 0.0, 2.0));

        // plane behind the origin
        let up = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(up.intersect_plane(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_triangle() {
        let ray = Ray::new(Vec3::new(0.25, 5.0, 0.25), Vec3::NEG_Y);
        let hit = ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Z);
        assert!((hit.unwrap() - 5.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(2.0, 5.0, 2.0), Vec3::NEG_Y);
        assert!(miss.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Z).is_none());
    }

    #[test]
    fn test_from_points_and_size() {
        let aabb = Aabb::from_points([
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(0.0, 4.0, 1.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(aabb.size(), Vec3::new(4.0, 6.0, 2.0));
        assert_eq!(aabb.max_dimension(), 6.0);
    }

    #[test]
    fn test_empty() {
        let aabb = Aabb::from_points(std::iter::empty());
        assert!(aabb.is_empty());
        assert_eq!(aabb.size(), Vec3::ZERO);
        assert_eq!(aabb.max_dimension(), 0.0);
    }

    #[test]
    fn test_transformed_rotation() {
        // 2x1x1 box rotated 90° about Y becomes 1x1x2
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let m = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let size = aabb.transformed(&m).size();
        assert!((size - Vec3::new(1.0, 1.0, 2.0)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_contains() {
        let aabb = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains(Vec3::ZERO));
        assert!(aabb.contains(Vec3::new(0.4, 0.4, 0.4)));
        assert!(!aabb.contains(Vec3::new(1.0, 0.0, 0.0)));
    }
}
