use crate::model::camera::MAX_PITCH;
use crate::model::Camera;

/// Turns raw mouse deltas into camera motion.
pub struct CameraController {
    pub orbit_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub fov_min: f32,
    pub fov_max: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.0015,
            zoom_sensitivity: 1.0,
            fov_min: 1.0,
            fov_max: 45.0,
        }
    }

    /// Orbit around the target.
    pub fn move_camera(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        camera.yaw += dx * self.orbit_sensitivity;
        camera.pitch = (camera.pitch + dy * self.orbit_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Slide the target in the camera's screen plane.
    pub fn pan_camera(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        let right = camera.right();
        let up = right.cross(camera.forward()).normalize();
        let scale = self.pan_sensitivity * camera.distance;
        camera.target -= (right * dx + up * dy) * scale;
    }

    /// Zoom by narrowing or widening the field of view.
    pub fn scroll_input(&self, camera: &mut Camera, dy: f32) {
        if !dy.is_finite() {
            return;
        }
        camera.fov = (camera.fov - dy * self.zoom_sensitivity).clamp(self.fov_min, self.fov_max);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_scroll_keeps_fov_in_range() {
        let ctl = CameraController::new();
        let mut cam = Camera::new(800, 800);

        for _ in 0..1000 {
            ctl.scroll_input(&mut cam, 7.5);
            assert!(cam.fov >= ctl.fov_min && cam.fov <= ctl.fov_max);
        }
        assert_eq!(cam.fov, ctl.fov_min);

        ctl.scroll_input(&mut cam, -1e9);
        assert_eq!(cam.fov, ctl.fov_max);

        ctl.scroll_input(&mut cam, f32::NAN);
        assert_eq!(cam.fov, ctl.fov_max, "NaN scroll must be ignored");
    }

    #[test]
    fn test_scroll_is_monotonic() {
        let ctl = CameraController::new();
        let mut cam = Camera::new(800, 800);

        let mut last = cam.fov;
        for _ in 0..100 {
            ctl.scroll_input(&mut cam, 0.5);
            assert!(cam.fov <= last, "scrolling up widened the view");
            last = cam.fov;
        }
        for _ in 0..100 {
            ctl.scroll_input(&mut cam, -0.5);
            assert!(cam.fov >= last, "scrolling down narrowed the view");
            last = cam.fov;
        }
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let ctl = CameraController::new();
        let mut cam = Camera::new(800, 800);

        ctl.move_camera(&mut cam, 0.0, 1e6);
        assert_eq!(cam.pitch, MAX_PITCH);
        ctl.move_camera(&mut cam, 0.0, -1e6);
        assert_eq!(cam.pitch, -MAX_PITCH);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn test_orbit_keeps_distance_to_target() {
        let ctl = CameraController::new();
        let mut cam = Camera::new(800, 800);

        ctl.move_camera(&mut cam, 120.0, -45.0);
        assert!(((cam.eye() - cam.target).length() - cam.distance).abs() < 1e-4);
        assert_eq!(cam.target, Vec3::ZERO, "orbiting must not move the target");
    }

    #[test]
    fn test_pan_moves_target_sideways() {
        let ctl = CameraController::new();
        let mut cam = Camera::new(800, 800);
        let forward = cam.forward();

        ctl.pan_camera(&mut cam, 100.0, 0.0);
        assert!(cam.target.length() > 0.0);
        assert!(cam.target.dot(forward).abs() < 1e-5, "pan moved along the view axis");
        assert_eq!(cam.forward(), forward, "pan must not rotate the camera");
    }
}
