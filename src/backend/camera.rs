//! 透视相机

use crate::scene::description::CameraConfig;
use glam::{Mat4, Vec3};

/// 透视相机
///
/// 宽高比只由视口同步器推送，修改后必须重算投影矩阵。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    aspect: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y_degrees,
            near,
            far,
            position: Vec3::ZERO,
            aspect,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(config.fov_y_degrees, aspect, config.near, config.far);
        camera.position = config.position;
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// 相机默认朝 -Z 看
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(self.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_follows_aspect() {
        let mut camera = PerspectiveCamera::new(55.0, 1.0, 0.1, 100.0);
        let focal = 1.0 / (55.0f32.to_radians() * 0.5).tan();
        assert!((camera.projection().x_axis.x - focal).abs() < 1e-5);

        camera.set_aspect(2.0);
        assert_eq!(camera.aspect(), 2.0);
        assert!((camera.projection().x_axis.x - focal / 2.0).abs() < 1e-5);
        assert!((camera.projection().y_axis.y - focal).abs() < 1e-5);
    }

    #[test]
    fn test_view_moves_world_opposite_to_camera() {
        let camera = PerspectiveCamera::default();
        let p = camera.view().transform_point3(Vec3::new(0.0, 5.0, 25.0));
        assert!(p.length() < 1e-5);
    }
}
