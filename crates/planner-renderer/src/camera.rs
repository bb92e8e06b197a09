use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use planner_core::Ray;

/// GPU用カメラUniform
/// View-Projection行列とカメラ位置（ライティング用）
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 4],
        }
    }
}

/// ドラッグ1pxあたりの回転量（ラジアン）
const ORBIT_SPEED: f32 = 0.005;
/// betaの上下限（真上・真下で視線が特異にならないよう）
const BETA_MIN: f32 = 0.01;
const BETA_MAX: f32 = PI - 0.01;
const RADIUS_MIN: f32 = 1.0;
const RADIUS_MAX: f32 = 100.0;

/// 注視点周りを回るカメラ
/// alpha: Y軸周りの回転、beta: Y軸からの傾き、radius: 注視点からの距離
#[derive(Debug, Clone)]
pub struct Camera {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// 俯瞰寄りの既定カメラ（alpha=0, beta=1.3, radius=15）
    pub fn new(aspect: f32) -> Self {
        Self {
            alpha: 0.0,
            beta: 1.3,
            radius: 15.0,
            target: Vec3::ZERO,
            fov: 0.8,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn with_orbit(mut self, alpha: f32, beta: f32, radius: f32) -> Self {
        self.alpha = alpha;
        self.beta = beta.clamp(BETA_MIN, BETA_MAX);
        self.radius = radius.clamp(RADIUS_MIN, RADIUS_MAX);
        self
    }

    /// 球面座標からカメラ位置を計算
    pub fn position(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b) * self.radius
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// ドラッグ量（px）で注視点周りを回転
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.alpha -= delta_x * ORBIT_SPEED;
        self.beta = (self.beta - delta_y * ORBIT_SPEED).clamp(BETA_MIN, BETA_MAX);
    }

    /// ドラッグ量（px）で注視点を画面平面内に平行移動
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let scale = self.radius * 0.002;
        self.target += (-right * delta_x + up * delta_y) * scale;
    }

    /// ホイール量でズーム（正で遠ざかる）
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius * (1.0 + delta * 0.001)).clamp(RADIUS_MIN, RADIUS_MAX);
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        proj * view
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
            eye: self.position().extend(1.0).to_array(),
        }
    }

    /// スクリーン座標（px, 左上原点）からワールド空間のレイを生成
    pub fn screen_to_ray(&self, screen: Vec2, viewport: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * screen.x / viewport.x - 1.0,
            1.0 - 2.0 * screen.y / viewport.y,
        );
        let inv = self.build_view_projection_matrix().inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_orbit() {
        let camera = Camera::new(16.0 / 9.0);
        let p = camera.position();
        assert!((p.length() - 15.0).abs() < 1e-4);
        // alpha=0なので+X側、beta=1.3なのでやや上から
        assert!(p.x > 0.0 && p.y > 0.0);
        assert!(p.z.abs() < 1e-4);
        assert!((p.y - 15.0 * 1.3f32.cos()).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_size() {
        // 4x4 + 4 floats
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_orbit_clamps_beta() {
        let mut camera = Camera::new(1.0);
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.beta, BETA_MIN);
        camera.orbit(0.0, -10_000.0);
        assert_eq!(camera.beta, BETA_MAX);
    }

    #[test]
    fn test_zoom_clamps_radius() {
        let mut camera = Camera::new(1.0);
        camera.zoom(100.0);
        assert!(camera.radius > 15.0);
        camera.zoom(-1_000_000.0);
        assert_eq!(camera.radius, RADIUS_MIN);
    }

    #[test]
    fn test_pan_moves_target_sideways() {
        let mut camera = Camera::new(1.0);
        camera.pan(100.0, 0.0);
        assert!(camera.target.y.abs() < 1e-5);
        assert!(camera.target.z.abs() > 0.0);
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = Camera::new(1.5);
        let viewport = Vec2::new(300.0, 200.0);
        let ray = camera.screen_to_ray(viewport * 0.5, viewport);

        let expected = (camera.target - camera.position()).normalize();
        assert!((ray.direction - expected).length() < 1e-3);

        let t = ray.intersect_plane(Vec3::ZERO, Vec3::Y).unwrap();
        assert!(ray.point_at(t).length() < 1e-2);
    }

    #[test]
    fn test_lower_screen_ray_lands_closer() {
        let camera = Camera::new(1.0);
        let viewport = Vec2::new(200.0, 200.0);
        let ray = camera.screen_to_ray(Vec2::new(100.0, 190.0), viewport);
        let t = ray.intersect_plane(Vec3::ZERO, Vec3::Y).unwrap();
        // カメラは+X側にいるので、画面下側は原点より手前(+X)
        assert!(ray.point_at(t).x > 0.0);
    }
}
