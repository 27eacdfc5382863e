use crate::viewport::{Plane, Ray};
use glam::Vec3;

/// An in-progress drag of one part.
///
/// The drag plane is fixed when the drag starts: it passes through the hit
/// point and faces the camera. Each pointer move yields the offset between
/// successive plane intersections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub(crate) part: usize,
    plane: Plane,
    last_point: Vec3,
}

impl DragSession {
    pub(crate) fn new(part: usize, hit_point: Vec3, view_direction: Vec3) -> Self {
        Self {
            part,
            plane: Plane::new(hit_point, view_direction),
            last_point: hit_point,
        }
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn last_point(&self) -> Vec3 {
        self.last_point
    }

    /// World-space offset since the previous call, or `None` when the ray
    /// misses the drag plane.
    pub fn advance(&mut self, ray: &Ray) -> Option<Vec3> {
        let point = self.plane.intersect(ray)?;
        let offset = point - self.last_point;
        self.last_point = point;
        Some(offset)
    }
}
