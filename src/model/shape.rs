use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;

/// Static triangle mesh produced by the geometry pipeline.
///
/// `vertices` and `normals` are flat `[x, y, z, ...]` buffers of equal length;
/// `indices` holds three entries per triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub normals: Vec<f32>,
}

impl MeshData {
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>, normals: Vec<f32>) -> Self {
        Self {
            vertices,
            indices,
            normals,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        let whole = self.vertices.len() - self.vertices.len() % 3;
        bytemuck::cast_slice(&self.vertices[..whole])
    }

    /// Iterates triangles as corner positions; triangles with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let positions = self.positions();
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let a = positions.get(tri[0] as usize)?;
            let b = positions.get(tri[1] as usize)?;
            let c = positions.get(tri[2] as usize)?;
            Some([Vec3::from(*a), Vec3::from(*b), Vec3::from(*c)])
        })
    }

    /// Axis-aligned bounds of the vertex buffer, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions().iter().map(|p| Vec3::from(*p));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Shared, immutable mesh handle attached to a part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    mesh: Arc<MeshData>,
}

impl Shape {
    pub fn new(mesh: MeshData) -> Self {
        Self {
            mesh: Arc::new(mesh),
        }
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }
}

impl From<MeshData> for Shape {
    fn from(mesh: MeshData) -> Self {
        Self::new(mesh)
    }
}

/// Source of geometry for preset models.
pub trait ShapeFactory {
    fn cuboid(&self, size: Vec3) -> Shape;

    fn cylinder(&self, radius: f32, height: f32) -> Shape {
        self.cuboid(Vec3::new(radius * 2.0, height, radius * 2.0))
    }
}

/// CPU-generated primitive meshes, centred on the origin.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveShapes {
    pub segments: u32,
}

impl Default for PrimitiveShapes {
    fn default() -> Self {
        Self { segments: 16 }
    }
}

impl ShapeFactory for PrimitiveShapes {
    fn cuboid(&self, size: Vec3) -> Shape {
        Shape::new(cuboid_mesh(size))
    }

    fn cylinder(&self, radius: f32, height: f32) -> Shape {
        Shape::new(cylinder_mesh(radius, height, self.segments.max(3)))
    }
}

struct MeshBuilder {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(&position.to_array());
        self.normals.extend_from_slice(&normal.to_array());
        index
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    fn build(self) -> MeshData {
        MeshData::new(self.vertices, self.indices, self.normals)
    }
}

pub fn cuboid_mesh(size: Vec3) -> MeshData {
    let half = size * 0.5;
    let mut builder = MeshBuilder::new();

    for normal in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
        let u = normal.any_orthonormal_vector();
        let v = normal.cross(u);
        let center = normal * half;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].map(|(a, b)| {
            builder.push(center + (u * a + v * b) * half, normal)
        });
        builder.triangle(corners[0], corners[1], corners[2]);
        builder.triangle(corners[0], corners[2], corners[3]);
    }

    builder.build()
}

pub fn cylinder_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let half_height = height / 2.0;
    let mut builder = MeshBuilder::new();

    for i in 0..=segments {
        let theta = 2.0 * PI * i as f32 / segments as f32;
        let x = theta.cos();
        let z = theta.sin();
        let normal = Vec3::new(x, 0.0, z);
        builder.push(Vec3::new(x * radius, -half_height, z * radius), normal);
        builder.push(Vec3::new(x * radius, half_height, z * radius), normal);
    }

    for i in 0..segments {
        let base = i * 2;
        builder.triangle(base, base + 1, base + 3);
        builder.triangle(base, base + 3, base + 2);
    }

    for (y, normal) in [(-half_height, Vec3::NEG_Y), (half_height, Vec3::Y)] {
        let center = builder.push(Vec3::new(0.0, y, 0.0), normal);
        let rim_start = center + 1;
        for i in 0..=segments {
            let theta = 2.0 * PI * i as f32 / segments as f32;
            builder.push(
                Vec3::new(theta.cos() * radius, y, theta.sin() * radius),
                normal,
            );
        }
        for i in 0..segments {
            builder.triangle(center, rim_start + i, rim_start + i + 1);
        }
    }

    builder.build()
}
