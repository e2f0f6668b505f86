//! In-memory scene snapshot
//!
//! A self-contained [`SceneProvider`] for hosts that hand over plain data:
//! objects live in a slot map, animation is keyframed, and ray queries run
//! against world-space triangles rebuilt whenever the frame changes.

use slotmap::SlotMap;

use crate::foundation::math::Vec3;
use crate::geometry::{Ray, WorldSpaceMesh};
use super::animation::TransformTrack;
use super::camera::CameraView;
use super::object::{ObjectId, SceneObject};
use super::provider::{RayCaster, RenderSettings, SceneProvider};
use super::SceneError;

#[derive(Debug, Clone)]
struct SceneEntry {
    object: SceneObject,
    track: Option<TransformTrack>,
}

/// Scene state evaluated at a single frame
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    objects: SlotMap<ObjectId, SceneEntry>,
    camera: CameraView,
    camera_track: Option<TransformTrack>,
    settings: RenderSettings,
    frame: i32,
    world_meshes: Vec<(ObjectId, WorldSpaceMesh)>,
}

impl SceneSnapshot {
    /// Create an empty scene positioned at the first frame of `settings`
    pub fn new(camera: CameraView, settings: RenderSettings) -> Self {
        Self {
            objects: SlotMap::with_key(),
            camera,
            camera_track: None,
            frame: settings.frame_start,
            settings,
            world_meshes: Vec::new(),
        }
    }

    /// Add an object and return its handle
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = self.objects.insert(SceneEntry { object, track: None });
        self.rebuild_world_meshes();
        id
    }

    /// Remove an object, returning it if it existed
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.objects.remove(id).map(|entry| entry.object);
        self.rebuild_world_meshes();
        removed
    }

    /// Attach a transform track to an object and re-evaluate the current frame
    pub fn animate_object(&mut self, id: ObjectId, track: TransformTrack) -> Result<(), SceneError> {
        let entry = self
            .objects
            .get_mut(id)
            .ok_or_else(|| SceneError::UnknownObject(format!("{id:?}")))?;
        entry.track = Some(track);
        self.evaluate();
        Ok(())
    }

    /// Attach a pose track to the camera and re-evaluate the current frame
    pub fn animate_camera(&mut self, track: TransformTrack) {
        self.camera_track = Some(track);
        self.evaluate();
    }

    /// Mutable access to the render settings
    pub fn render_settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Number of objects in the scene
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn evaluate(&mut self) {
        let frame = self.frame;
        for entry in self.objects.values_mut() {
            if let Some(transform) = entry.track.as_ref().and_then(|track| track.sample(frame)) {
                entry.object.transform = transform;
            }
        }
        if let Some(pose) = self.camera_track.as_ref().and_then(|track| track.sample(frame)) {
            self.camera.set_pose(&pose);
        }
        self.rebuild_world_meshes();
    }

    fn rebuild_world_meshes(&mut self) {
        self.world_meshes = self
            .objects
            .iter()
            .map(|(id, entry)| {
                let triangles = entry.object.mesh.world_triangles(&entry.object.transform);
                (id, WorldSpaceMesh::from_triangles(triangles))
            })
            .collect();
    }
}

impl RayCaster for SceneSnapshot {
    fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Option<ObjectId> {
        let ray = Ray::new(origin, direction);

        let mut closest: Option<(ObjectId, f32)> = None;
        for (id, mesh) in &self.world_meshes {
            if let Some(t) = mesh.intersect_ray(&ray) {
                if closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((*id, t));
                }
            }
        }

        closest.map(|(id, _)| id)
    }
}

impl SceneProvider for SceneSnapshot {
    fn current_frame(&self) -> i32 {
        self.frame
    }

    fn set_frame(&mut self, frame: i32) {
        if frame == self.frame {
            return;
        }
        log::trace!("Scene frame {} -> {}", self.frame, frame);
        self.frame = frame;
        self.evaluate();
    }

    fn camera(&self) -> &CameraView {
        &self.camera
    }

    fn render_settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id).map(|entry| &entry.object)
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use crate::scene::MeshData;
    use std::sync::Arc;

    fn camera() -> CameraView {
        CameraView::perspective(Vec3::new(0.0, 0.0, 10.0), Quat::identity(), 60.0, 640.0, 480.0)
    }

    fn cube(name: &str, position: Vec3) -> SceneObject {
        SceneObject::new(name, Arc::new(MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5))))
            .with_transform(Transform::from_position(position))
    }

    #[test]
    fn test_cast_ray_returns_nearest_object() {
        let mut scene = SceneSnapshot::new(camera(), RenderSettings::default());
        let far = scene.add_object(cube("far", Vec3::new(0.0, 0.0, -5.0)));
        let near = scene.add_object(cube("near", Vec3::new(0.0, 0.0, 0.0)));

        let hit = scene.cast_ray(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(hit, Some(near));

        scene.remove_object(near);
        let hit = scene.cast_ray(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(hit, Some(far));
    }

    #[test]
    fn test_set_frame_moves_animated_object() {
        let mut scene = SceneSnapshot::new(camera(), RenderSettings::default());
        let id = scene.add_object(cube("mover", Vec3::zeros()));
        let track = TransformTrack::new()
            .with_key(0, Transform::from_position(Vec3::zeros()))
            .with_key(10, Transform::from_position(Vec3::new(20.0, 0.0, 0.0)));
        scene.animate_object(id, track).unwrap();

        let origin = Vec3::new(0.0, 0.0, 10.0);
        let forward = Vec3::new(0.0, 0.0, -1.0);
        assert_eq!(scene.cast_ray(origin, forward), Some(id));

        scene.set_frame(10);
        assert_eq!(scene.current_frame(), 10);
        assert_eq!(scene.cast_ray(origin, forward), None);
        assert_eq!(scene.object(id).unwrap().transform.position.x, 20.0);
    }

    #[test]
    fn test_find_object_by_name() {
        let mut scene = SceneSnapshot::new(camera(), RenderSettings::default());
        let id = scene.add_object(cube("target", Vec3::zeros()));
        assert_eq!(scene.find_object("target"), Some(id));
        assert_eq!(scene.find_object("missing"), None);
    }

    #[test]
    fn test_animate_unknown_object_fails() {
        let mut scene = SceneSnapshot::new(camera(), RenderSettings::default());
        let id = scene.add_object(cube("gone", Vec3::zeros()));
        scene.remove_object(id);
        assert!(matches!(
            scene.animate_object(id, TransformTrack::new()),
            Err(SceneError::UnknownObject(_))
        ));
    }
}
