use super::raycast::Ray;
use super::scene::{Highlight, MeshId, RaycastHit, SceneBackend};
use crate::math::Transform;
use crate::model::MeshData;
use glam::Vec3;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct SceneMesh {
    pub data: MeshData,
    pub color: Option<[f32; 3]>,
    pub transform: Transform,
    pub highlight: Highlight,
    pub visible: bool,
}

/// In-memory scene that raycasts against transformed triangles on the CPU.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    meshes: BTreeMap<MeshId, SceneMesh>,
    next_id: u64,
    highlight_writes: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(&id)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Number of highlight updates received, for checking redundant writes.
    pub fn highlight_writes(&self) -> usize {
        self.highlight_writes
    }

    /// World-space centre of a mesh's bounds, handy for aiming pointer rays.
    pub fn mesh_center(&self, id: MeshId) -> Option<Vec3> {
        let entry = self.meshes.get(&id)?;
        let (min, max) = entry.data.bounds()?;
        Some(entry.transform.to_matrix().transform_point3((min + max) * 0.5))
    }
}

impl SceneBackend for HeadlessScene {
    fn add_mesh(&mut self, mesh: &MeshData, color: Option<[f32; 3]>) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        self.meshes.insert(
            id,
            SceneMesh {
                data: mesh.clone(),
                color,
                transform: Transform::IDENTITY,
                highlight: Highlight::None,
                visible: true,
            },
        );
        id
    }

    fn remove_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(&mesh);
    }

    fn set_transform(&mut self, mesh: MeshId, transform: &Transform) {
        if let Some(entry) = self.meshes.get_mut(&mesh) {
            entry.transform = *transform;
        }
    }

    fn set_highlight(&mut self, mesh: MeshId, highlight: Highlight) {
        if let Some(entry) = self.meshes.get_mut(&mesh) {
            entry.highlight = highlight;
            self.highlight_writes += 1;
        }
    }

    fn set_visible(&mut self, mesh: MeshId, visible: bool) {
        if let Some(entry) = self.meshes.get_mut(&mesh) {
            entry.visible = visible;
        }
    }

    fn raycast(&self, ray: &Ray) -> Vec<RaycastHit> {
        if !ray.is_valid() {
            return Vec::new();
        }

        let mut hits: Vec<RaycastHit> = self
            .meshes
            .iter()
            .filter(|(_, entry)| entry.visible)
            .filter_map(|(&id, entry)| {
                let matrix = entry.transform.to_matrix();
                entry
                    .data
                    .triangles()
                    .filter_map(|[a, b, c]| {
                        ray.intersect_triangle(
                            matrix.transform_point3(a),
                            matrix.transform_point3(b),
                            matrix.transform_point3(c),
                        )
                    })
                    .min_by(|a, b| a.total_cmp(b))
                    .map(|t| RaycastHit {
                        mesh: id,
                        world_point: ray.at(t),
                        distance: t,
                    })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shape::cuboid_mesh;

    #[test]
    fn test_raycast_orders_hits_by_distance() {
        let mut scene = HeadlessScene::new();
        let far = scene.add_mesh(&cuboid_mesh(Vec3::ONE), None);
        let near = scene.add_mesh(&cuboid_mesh(Vec3::ONE), None);
        scene.set_transform(far, &Transform::from_position(Vec3::new(0.0, 0.0, -5.0)));
        scene.set_transform(near, &Transform::from_position(Vec3::new(0.0, 0.0, 0.0)));

        let hits = scene.raycast(&Ray::new(Vec3::new(0.1, 0.2, 10.0), Vec3::NEG_Z));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].mesh, near);
        assert!((hits[0].distance - 9.5).abs() < 1e-4);
        assert!(hits[0].world_point.abs_diff_eq(Vec3::new(0.1, 0.2, 0.5), 1e-4));
        assert_eq!(hits[1].mesh, far);
    }

    #[test]
    fn test_hidden_meshes_are_not_hit() {
        let mut scene = HeadlessScene::new();
        let id = scene.add_mesh(&cuboid_mesh(Vec3::ONE), None);
        scene.set_visible(id, false);
        assert!(scene
            .raycast(&Ray::new(Vec3::new(0.1, 0.2, 10.0), Vec3::NEG_Z))
            .is_empty());
    }

    #[test]
    fn test_mesh_center_follows_transform() {
        let mut scene = HeadlessScene::new();
        let id = scene.add_mesh(&cuboid_mesh(Vec3::ONE), None);
        scene.set_transform(id, &Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        assert!(scene
            .mesh_center(id)
            .unwrap()
            .abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
    }
}
