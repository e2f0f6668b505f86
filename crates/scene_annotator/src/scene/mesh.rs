//! Evaluated mesh geometry
//!
//! Model-space polygon meshes as handed over by the scene host. Faces may be
//! arbitrary convex polygons; triangulation happens on demand.

use std::collections::HashMap;

use crate::foundation::math::{Point3, Transform, Vec3};
use crate::geometry::Triangle;
use super::SceneError;

/// Polygon mesh in model space
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<u32>>,
}

impl MeshData {
    /// Create a mesh, checking that every face has at least three valid indices
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Result<Self, SceneError> {
        for (face_index, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(SceneError::InvalidMesh(format!(
                    "face {face_index} has {} vertices, at least 3 are required",
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(SceneError::InvalidMesh(format!(
                    "face {face_index} references vertex {bad} but the mesh has {} vertices",
                    vertices.len()
                )));
            }
        }

        Ok(Self { vertices, faces })
    }

    /// Axis-aligned box centered on the origin, faces wound outward
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        let vertices = vec![
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        let faces = vec![
            vec![0, 3, 2, 1], // -Z
            vec![4, 5, 6, 7], // +Z
            vec![0, 1, 5, 4], // -Y
            vec![3, 7, 6, 2], // +Y
            vec![0, 4, 7, 3], // -X
            vec![1, 2, 6, 5], // +X
        ];

        Self { vertices, faces }
    }

    /// Model-space vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Polygon faces as vertex index lists
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// True when the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Fan-triangulate every face, preserving its winding
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        self.faces
            .iter()
            .flat_map(|face| {
                (1..face.len() - 1).map(move |i| [face[0], face[i], face[i + 1]])
            })
            .collect()
    }

    /// Vertex positions after applying an object transform
    pub fn world_vertices(&self, transform: &Transform) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|v| transform.transform_point(&Point3::from(*v)).coords)
            .collect()
    }

    /// Triangulated faces after applying an object transform
    pub fn world_triangles(&self, transform: &Transform) -> Vec<Triangle> {
        let world = self.world_vertices(transform);
        self.triangulate()
            .into_iter()
            .map(|[a, b, c]| Triangle::new(world[a as usize], world[b as usize], world[c as usize]))
            .collect()
    }

    /// Whether the surface is closed and consistently wound
    ///
    /// Every directed edge must appear exactly once and its reverse must
    /// appear exactly once, i.e. each edge joins two faces of opposite
    /// orientation.
    pub fn is_closed_manifold(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }

        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &self.faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                *directed.entry((a, b)).or_default() += 1;
            }
        }

        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_index() {
        let result = MeshData::new(
            vec![Vec3::zeros(), Vec3::x(), Vec3::y()],
            vec![vec![0, 1, 3]],
        );
        assert!(matches!(result, Err(SceneError::InvalidMesh(_))));
    }

    #[test]
    fn test_rejects_degenerate_face() {
        let result = MeshData::new(vec![Vec3::zeros(), Vec3::x()], vec![vec![0, 1]]);
        assert!(matches!(result, Err(SceneError::InvalidMesh(_))));
    }

    #[test]
    fn test_cuboid_triangulates_to_twelve_triangles() {
        let cube = MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(cube.triangulate().len(), 12);
    }

    #[test]
    fn test_cuboid_is_closed_manifold() {
        assert!(MeshData::cuboid(Vec3::new(1.0, 2.0, 3.0)).is_closed_manifold());
    }

    #[test]
    fn test_open_box_is_not_manifold() {
        let cube = MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let open = MeshData::new(cube.vertices().to_vec(), cube.faces()[1..].to_vec()).unwrap();
        assert!(!open.is_closed_manifold());
    }

    #[test]
    fn test_inconsistent_winding_is_not_manifold() {
        let cube = MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let mut faces = cube.faces().to_vec();
        faces[0].reverse();
        let flipped = MeshData::new(cube.vertices().to_vec(), faces).unwrap();
        assert!(!flipped.is_closed_manifold());
    }
}
