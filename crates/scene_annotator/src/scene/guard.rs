//! Scoped frame changes
//!
//! Writers move scene time while they work. [`FrameGuard`] records the frame
//! on entry and puts it back when dropped, so the scene is left as it was
//! found on every exit path, including early returns with an error.

use std::ops::{Deref, DerefMut};

use super::provider::SceneProvider;

/// Restores the scene frame on drop
pub struct FrameGuard<'a, S: SceneProvider + ?Sized> {
    scene: &'a mut S,
    restore_frame: i32,
}

impl<'a, S: SceneProvider + ?Sized> FrameGuard<'a, S> {
    /// Take the scene, remembering its current frame
    pub fn new(scene: &'a mut S) -> Self {
        let restore_frame = scene.current_frame();
        Self { scene, restore_frame }
    }

    /// Frame that will be restored on drop
    pub const fn restore_frame(&self) -> i32 {
        self.restore_frame
    }
}

impl<S: SceneProvider + ?Sized> Deref for FrameGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: SceneProvider + ?Sized> DerefMut for FrameGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

impl<S: SceneProvider + ?Sized> Drop for FrameGuard<'_, S> {
    fn drop(&mut self) {
        if self.scene.current_frame() != self.restore_frame {
            log::debug!("Restoring scene frame {}", self.restore_frame);
            self.scene.set_frame(self.restore_frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use crate::scene::{CameraView, RenderSettings, SceneSnapshot};

    fn scene() -> SceneSnapshot {
        let camera = CameraView::perspective(Vec3::zeros(), Quat::identity(), 50.0, 640.0, 480.0);
        SceneSnapshot::new(camera, RenderSettings::default())
    }

    fn advance_then_fail(scene: &mut SceneSnapshot) -> Result<(), String> {
        let mut guard = FrameGuard::new(scene);
        guard.set_frame(42);
        Err("writer failed".to_string())
    }

    #[test]
    fn test_restores_frame_on_scope_exit() {
        let mut scene = scene();
        scene.set_frame(3);
        {
            let mut guard = FrameGuard::new(&mut scene);
            assert_eq!(guard.restore_frame(), 3);
            guard.set_frame(7);
            assert_eq!(guard.current_frame(), 7);
        }
        assert_eq!(scene.current_frame(), 3);
    }

    #[test]
    fn test_restores_frame_on_error_path() {
        let mut scene = scene();
        assert!(advance_then_fail(&mut scene).is_err());
        assert_eq!(scene.current_frame(), 0);
    }
}
