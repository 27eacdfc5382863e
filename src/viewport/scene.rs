//! Renderer capability required by the interaction manager.

use super::raycast::Ray;
use crate::math::{Transform, Vec3};
use crate::model::MeshData;

/// Opaque handle to a mesh owned by a [`SceneBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

/// Emissive highlight state of a mesh. Selection wins over hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Hovered,
    Selected,
}

impl Highlight {
    pub fn resolve(selected: bool, hovered: bool) -> Self {
        if selected {
            Highlight::Selected
        } else if hovered {
            Highlight::Hovered
        } else {
            Highlight::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub mesh: MeshId,
    pub world_point: Vec3,
    pub distance: f32,
}

/// Anything that can display part meshes and answer ray queries.
pub trait SceneBackend {
    fn add_mesh(&mut self, mesh: &MeshData, color: Option<[f32; 3]>) -> MeshId;

    fn remove_mesh(&mut self, mesh: MeshId);

    fn set_transform(&mut self, mesh: MeshId, transform: &Transform);

    fn set_highlight(&mut self, mesh: MeshId, highlight: Highlight);

    fn set_visible(&mut self, mesh: MeshId, visible: bool);

    /// Hits ordered nearest first.
    fn raycast(&self, ray: &Ray) -> Vec<RaycastHit>;
}
