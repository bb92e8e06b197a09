//! Placement math
//!
//! Scale normalization and ground snapping for containers. A container's
//! world bounds are its local mesh bounds pushed through its transform.

use glam::{Quat, Vec3};

use crate::components::Transform;
use crate::math::Aabb;

/// Dimensions at or below this are treated as degenerate
const MIN_DIMENSION: f32 = 1e-6;

/// Hierarchy bounds of a container in world space
pub fn world_bounds(transform: &Transform, local: &Aabb) -> Aabb {
    local.transformed(&transform.to_matrix())
}

/// Uniform scale that makes the largest world dimension equal `target_size`.
/// Measured at unit scale with `rotation` applied; degenerate models keep 1.0.
pub fn normalized_scale(local: &Aabb, rotation: Quat, target_size: f32) -> f32 {
    let unit = Transform::new(Vec3::ZERO, rotation, Vec3::ONE);
    let max_dimension = world_bounds(&unit, local).max_dimension();

    if !max_dimension.is_finite() || max_dimension <= MIN_DIMENSION {
        log::warn!("model bounds are degenerate ({max_dimension}), keeping unit scale");
        return 1.0;
    }
    target_size / max_dimension
}

/// Shift the container vertically so its lowest point rests on y = 0
pub fn snap_to_ground(transform: &mut Transform, local: &Aabb) {
    if local.is_empty() {
        return;
    }
    let min_y = world_bounds(transform, local).min.y;
    transform.position.y -= min_y;
}

/// Drop sequence: move to the drop point, normalize scale, rest on the ground
pub fn place(transform: &mut Transform, local: &Aabb, drop_point: Vec3, target_size: f32) {
    transform.position = drop_point;
    let factor = normalized_scale(local, transform.rotation, target_size);
    transform.set_uniform_scale(factor);
    snap_to_ground(transform, local);
}

/// One drag step: follow the ground point keeping the grab offset
pub fn drag_to(transform: &mut Transform, local: &Aabb, ground_point: Vec3, offset: Vec3) {
    let mut position = ground_point + offset;
    position.y = 0.0;
    transform.position = position;
    snap_to_ground(transform, local);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    /// 2 wide, 4 tall, 1 deep model whose origin sits at its center
    fn tall_model() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -2.0, -0.5), Vec3::new(1.0, 2.0, 0.5))
    }

    #[test]
    fn test_normalized_scale() {
        let s = normalized_scale(&tall_model(), Quat::IDENTITY, 3.0);
        assert!((s - 0.75).abs() < EPS);
    }

    #[test]
    fn test_normalized_scale_degenerate() {
        let flat_point = Aabb::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(normalized_scale(&flat_point, Quat::IDENTITY, 2.0), 1.0);
        assert_eq!(normalized_scale(&Aabb::empty(), Quat::IDENTITY, 2.0), 1.0);
    }

    #[test]
    fn test_place_normalizes_and_grounds() {
        let local = tall_model();
        let mut t = Transform::identity();
        place(&mut t, &local, Vec3::new(3.0, 0.7, -2.0), 2.0);

        let bounds = world_bounds(&t, &local);
        assert!((bounds.max_dimension() - 2.0).abs() < EPS);
        assert!(bounds.min.y.abs() < EPS);
        assert!((t.position.x - 3.0).abs() < EPS);
        assert!((t.position.z + 2.0).abs() < EPS);
    }

    #[test]
    fn test_place_respects_rotation() {
        // lying down, the 4-unit height becomes depth
        let local = tall_model();
        let mut t = Transform::identity();
        t.rotation = Quat::from_rotation_x(FRAC_PI_2);
        place(&mut t, &local, Vec3::ZERO, 2.0);

        let bounds = world_bounds(&t, &local);
        assert!((bounds.size().z - 2.0).abs() < EPS);
        assert!((bounds.size().y - 0.5).abs() < EPS);
        assert!(bounds.min.y.abs() < EPS);
    }

    #[test]
    fn test_model_with_offset_origin() {
        // origin at the top of the model
        let local = Aabb::new(Vec3::new(-0.5, -1.0, -0.5), Vec3::new(0.5, 0.0, 0.5));
        let mut t = Transform::identity();
        place(&mut t, &local, Vec3::ZERO, 1.0);
        assert!((t.position.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_drag_keeps_offset_and_ground_contact() {
        let local = tall_model();
        let mut t = Transform::identity();
        place(&mut t, &local, Vec3::ZERO, 2.0);
        let resting_y = t.position.y;

        drag_to(&mut t, &local, Vec3::new(5.0, 0.3, 1.0), Vec3::new(-0.5, 2.0, 0.25));
        assert!((t.position.x - 4.5).abs() < EPS);
        assert!((t.position.z - 1.25).abs() < EPS);
        assert!((t.position.y - resting_y).abs() < EPS);
        assert!(world_bounds(&t, &local).min.y.abs() < EPS);
    }
}
