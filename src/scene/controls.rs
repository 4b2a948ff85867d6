use crate::scene::camera::Camera;
use log::debug;
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

/// Orbit-style interactive camera controls.
///
/// Keeps a spherical offset (yaw/pitch/radius) around a target point. The
/// camera pose is authoritative; after any external mutation of the camera
/// or target the internal state must be re-synced with [`OrbitControls::refresh`],
/// otherwise subsequent drags compute deltas from a stale reference frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// Revolutions per minute-ish factor, matching the usual orbit-controls
    /// convention (speed 2.0 = one orbit in 30 seconds at 60 fps).
    pub auto_rotate_speed: f32,

    // Spherical state, derived from the camera.
    yaw: f32,
    pitch: f32,
    radius: f32,

    // Pending input, consumed by update() (smoothed when damping is on).
    yaw_delta: f32,
    pitch_delta: f32,
    zoom_delta: f32,
}

impl OrbitControls {
    pub fn new(camera: &Camera) -> Self {
        let mut controls = Self {
            target: camera.target,
            min_distance: 3.0,
            max_distance: 30.0,
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: 2.5,
            yaw: 0.0,
            pitch: 0.0,
            radius: 1.0,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            zoom_delta: 0.0,
        };
        controls.sync_spherical(camera);
        controls
    }

    /// Current distance between camera and target.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    fn sync_spherical(&mut self, camera: &Camera) {
        let offset = camera.position - self.target;
        self.radius = offset.norm().max(1e-6);
        self.pitch = (offset.y / self.radius).clamp(-1.0, 1.0).asin();
        self.yaw = offset.z.atan2(offset.x);
    }

    fn apply_spherical(&self, camera: &mut Camera) {
        let offset = Vector3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        ) * self.radius;
        camera.position = self.target + offset;
        camera.target = self.target;
        camera.update_matrices();
    }

    /// Re-syncs the internal spherical state from the camera and target.
    ///
    /// Must be called after any direct camera or target mutation (framing a
    /// new model, config reload) so drags and zooms stay consistent.
    pub fn refresh(&mut self, camera: &mut Camera) {
        self.sync_spherical(camera);
        camera.target = self.target;
        camera.update_matrices();
    }

    /// Queues an orbit rotation (radians).
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw_delta += d_yaw;
        self.pitch_delta += d_pitch;
    }

    /// Queues a dolly in (positive) or out (negative), in world units.
    pub fn zoom(&mut self, delta: f32) {
        self.zoom_delta += delta;
    }

    /// Applies pending input and auto-rotation to the camera.
    ///
    /// With damping enabled only a `damping_factor` share of the pending
    /// input is consumed per call, giving the usual eased motion.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) {
        if self.auto_rotate {
            // One full orbit in 60/speed seconds.
            self.yaw_delta += self.auto_rotate_speed * TAU * dt / 60.0;
        }

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        self.yaw += self.yaw_delta * share;
        self.pitch += self.pitch_delta * share;
        self.radius = (self.radius - self.zoom_delta * share)
            .clamp(self.min_distance, self.max_distance);

        // Clamp pitch to avoid gimbal lock at the poles.
        self.pitch = self.pitch.clamp(-PI / 2.0 + 0.01, PI / 2.0 - 0.01);

        self.yaw_delta *= 1.0 - share;
        self.pitch_delta *= 1.0 - share;
        self.zoom_delta *= 1.0 - share;

        self.apply_spherical(camera);
    }
}

/// Reframes the camera on a newly placed model.
///
/// Moves the camera backward along its *current* viewing direction so the
/// orbit angle is preserved and only the distance changes, retargets the
/// controls at `bounding_center`, and refreshes their internal state.
/// Callers must reject non-positive distances before calling.
///
/// Returns the new camera position.
pub fn frame(
    camera: &mut Camera,
    controls: &mut OrbitControls,
    bounding_center: Point3<f32>,
    desired_distance: f32,
) -> Point3<f32> {
    let direction = if camera.distance_to_target() > 1e-6 {
        camera.view_direction()
    } else {
        // Camera collapsed onto its target; fall back to the default view axis.
        Vector3::new(0.0, 0.0, -1.0)
    };

    controls.target = bounding_center;
    camera.position = bounding_center - direction * desired_distance;
    camera.target = bounding_center;
    controls.refresh(camera);

    debug!(
        "framed camera at {:?} (distance {:.2})",
        camera.position, desired_distance
    );
    camera.position
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    const TOL: f32 = 1e-5;

    fn camera_at(position: Point3<f32>, target: Point3<f32>) -> Camera {
        Camera::new_perspective(
            position,
            target,
            Vector3::y(),
            40.0_f32.to_radians(),
            16.0 / 9.0,
            0.1,
            1000.0,
        )
    }

    #[test]
    fn reframe_preserves_view_direction() {
        // Camera at (0,0,10) looking at the origin, reframed to (1,1,1) at
        // distance 5, must land at (1,1,6).
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0), Point3::origin());
        let mut controls = OrbitControls::new(&camera);

        let position = frame(&mut camera, &mut controls, Point3::new(1.0, 1.0, 1.0), 5.0);

        assert!((position - Point3::new(1.0, 1.0, 6.0)).norm() < TOL);
        assert_eq!(controls.target, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn reframe_distance_is_exact() {
        let mut camera = camera_at(Point3::new(4.0, 3.0, 7.0), Point3::new(1.0, 0.0, -2.0));
        let mut controls = OrbitControls::new(&camera);
        let direction = camera.view_direction();

        let center = Point3::new(-2.0, 1.5, 0.5);
        let position = frame(&mut camera, &mut controls, center, 8.0);

        // |position - target| == distance
        assert!(((position - center).norm() - 8.0).abs() < TOL);
        // position lies on the ray target - direction * t, t >= 0
        let t = (center - position).dot(&direction);
        assert!(t > 0.0);
        assert!(((center - direction * t) - position).norm() < TOL);
    }

    #[test]
    fn refresh_syncs_spherical_state() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0), Point3::origin());
        let mut controls = OrbitControls::new(&camera);

        // Mutate the camera behind the controls' back.
        camera.position = Point3::new(5.0, 5.0, 0.0);
        controls.target = Point3::new(5.0, 0.0, 0.0);
        controls.refresh(&mut camera);

        assert!((controls.radius() - 5.0).abs() < TOL);
        assert!((controls.pitch() - PI / 2.0).abs() < 0.05);
    }

    #[test]
    fn update_applies_zoom_within_limits() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0), Point3::origin());
        let mut controls = OrbitControls::new(&camera);
        controls.enable_damping = false;

        controls.zoom(100.0); // way past the minimum distance
        controls.update(&mut camera, 1.0 / 60.0);

        assert!((controls.radius() - controls.min_distance).abs() < TOL);
        assert!((camera.distance_to_target() - controls.min_distance).abs() < TOL);
    }

    #[test]
    fn auto_rotate_advances_yaw() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0), Point3::origin());
        let mut controls = OrbitControls::new(&camera);
        controls.enable_damping = false;
        controls.auto_rotate = true;

        let yaw_before = controls.yaw();
        controls.update(&mut camera, 0.5);
        assert!(controls.yaw() > yaw_before);
        // Radius untouched by rotation.
        assert!((controls.radius() - 10.0).abs() < TOL);
    }
}
