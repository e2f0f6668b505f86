//! Mesh volume
//!
//! Sum of the signed volumes of the tetrahedra spanned by the world origin
//! and each triangle of the fan-triangulated surface. Exact for closed,
//! consistently wound meshes; open meshes still produce a number, but it
//! depends on where the origin is.

use crate::foundation::math::Transform;
use crate::scene::{MeshData, SceneObject};

/// Signed volume of a mesh after applying a transform
///
/// Positive for outward-wound surfaces.
pub fn signed_volume(mesh: &MeshData, transform: &Transform) -> f64 {
    mesh.world_triangles(transform)
        .iter()
        .map(|triangle| triangle.signed_volume_from_origin())
        .sum()
}

/// World-space volume of an object's mesh, always non-negative
pub fn object_volume(object: &SceneObject) -> f64 {
    if !object.mesh.is_closed_manifold() {
        log::warn!(
            "Mesh of object '{}' is not closed, its volume is not well defined",
            object.name
        );
    }
    signed_volume(&object.mesh, &object.transform).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_unit_cube_volume() {
        let mesh = MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5));
        assert_relative_eq!(signed_volume(&mesh, &Transform::identity()), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_volume_is_translation_invariant() {
        let mesh = MeshData::cuboid(Vec3::new(1.0, 2.0, 0.5));
        let moved = Transform::from_position_rotation(
            Vec3::new(12.0, -7.0, 3.0),
            Quat::from_euler_angles(0.3, 1.1, -0.4),
        );
        assert_relative_eq!(signed_volume(&mesh, &moved), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_scale_multiplies_volume() {
        let object = SceneObject::new("block", Arc::new(MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5))))
            .with_transform(Transform::identity().with_scale(Vec3::new(2.0, 3.0, 4.0)));
        assert_relative_eq!(object_volume(&object), 24.0, epsilon = 1e-6);
    }

    #[test]
    fn test_inverted_winding_reports_positive_volume() {
        let cube = MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let flipped_faces = cube
            .faces()
            .iter()
            .map(|face| face.iter().rev().copied().collect())
            .collect();
        let flipped = MeshData::new(cube.vertices().to_vec(), flipped_faces).unwrap();

        assert_relative_eq!(signed_volume(&flipped, &Transform::identity()), -1.0, epsilon = 1e-9);
        let object = SceneObject::new("inside_out", Arc::new(flipped));
        assert_relative_eq!(object_volume(&object), 1.0, epsilon = 1e-9);
    }
}
