use crate::ecs::Component;
use crate::math::{Mat4, Quat, Vec3};
use glam::EulerRot;

/// 3D Transform component
/// Position, rotation and scale of a container or the ground in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// No translation, rotation, or scale
    pub fn identity() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Rotation from Euler angles in radians, yaw (Y) applied last, roll (Z) first
    pub fn euler_rotation(euler: Vec3) -> Quat {
        Quat::from_euler(EulerRot::YXZ, euler.y, euler.x, euler.z)
    }

    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.scale = Vec3::splat(factor);
    }

    /// Convert to a 4x4 transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Component for Transform {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_to_matrix_translation_and_scale() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.set_uniform_scale(2.0);
        let p = t.to_matrix().transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_euler_pitch_lays_model_down() {
        // +Y up axis rotated a quarter turn about X points to +Z
        let q = Transform::euler_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0));
        let up = q * Vec3::Y;
        assert!((up - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_euler_yaw_applied_after_pitch() {
        let combined = Transform::euler_rotation(Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0));
        let expected = Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(FRAC_PI_2);
        assert!(combined.abs_diff_eq(expected, 1e-5));
    }
}
