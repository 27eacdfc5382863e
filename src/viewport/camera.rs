use super::raycast::Ray;
use glam::{Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn screen_to_ray(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inv_view_proj = self.view_projection().inverse();

        let near_point = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far_point = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_point.truncate() / near_point.w;
        let far = far_point.truncate() / far_point.w;

        Ray::new(near, far - near)
    }

    /// World-space ray through a device pixel of a `viewport`-sized surface.
    pub fn pixel_to_ray(&self, x: f32, y: f32, viewport: Vec2) -> Ray {
        let (ndc_x, ndc_y) = pixel_to_ndc(x, y, viewport);
        self.screen_to_ray(ndc_x, ndc_y)
    }

    /// Device pixel a world point projects to, or `None` behind the camera.
    pub fn world_to_pixel(&self, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}

pub fn pixel_to_ndc(x: f32, y: f32, viewport: Vec2) -> (f32, f32) {
    let w = viewport.x.max(1.0);
    let h = viewport.y.max(1.0);
    let ndc_x = (2.0 * x / w) - 1.0;
    let ndc_y = 1.0 - (2.0 * y / h);
    (ndc_x, ndc_y)
}
