use crate::error::ViewerError;
use crate::io::config::ViewerConfig;
use crate::io::gltf_loader;
use crate::pipeline::normalize::normalize;
use crate::pipeline::palette::{Palette, suggest_palette};
use crate::pipeline::postprocess::EffectChain;
use crate::scene::backend::RenderBackend;
use crate::scene::camera::Camera;
use crate::scene::controls::{OrbitControls, frame};
use crate::scene::environment::{Environment, EquirectTexture};
use crate::scene::light::{Light, ShadowSettings, build_lights_from_config};
use crate::scene::node::Node;
use log::{error, info, warn};
use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Identifies one decode request. Tickets are handed out by
/// [`ViewerSession::begin_load`] and invalidated when a newer request
/// supersedes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Notification payload produced after a model is installed, consumed by
/// presentation code (info text, suggested color pickers).
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub bounding_center: Point3<f32>,
    pub scale_factor: f32,
    pub scaled_size: Vector3<f32>,
    /// Absent when no material exposed a base color; presentation must
    /// handle this without failing the load.
    pub palette: Option<Palette>,
}

#[derive(Debug)]
struct PendingLoad {
    ticket: LoadTicket,
    name: String,
}

/// The process-wide viewer state: one current model, one camera pose, one
/// set of lighting/post-processing parameters.
///
/// Everything runs on a single thread. Asset decoding is the only logically
/// asynchronous step; its completion is delivered through
/// [`ViewerSession::complete_load`] with the ticket issued at request time.
/// Only the newest ticket is honored, so a late-arriving decode can never
/// overwrite a newer model.
pub struct ViewerSession<B: RenderBackend> {
    pub camera: Camera,
    pub controls: OrbitControls,
    pub lights: Vec<Light>,
    pub shadow: ShadowSettings,
    pub effects: EffectChain,
    environment: Environment,
    backend: B,

    current_model: Option<Node>,
    model_info: Option<ModelInfo>,

    ground_height: f32,
    target_size: f32,
    camera_distance: f32,

    auto_rotate_model: bool,
    /// Model spin in radians per second.
    pub model_spin_speed: f32,

    pending: Option<PendingLoad>,
    next_ticket: u64,
}

impl<B: RenderBackend> ViewerSession<B> {
    pub fn new(config: &ViewerConfig, mut backend: B) -> Self {
        let camera = Camera::new_perspective(
            Point3::from(config.camera.position),
            Point3::origin(),
            Vector3::y(),
            config.camera.fov.to_radians(),
            16.0 / 9.0,
            config.camera.near,
            config.camera.far,
        );

        let mut controls = OrbitControls::new(&camera);
        controls.min_distance = config.camera.min_distance;
        controls.max_distance = config.camera.max_distance;
        controls.damping_factor = config.camera.damping_factor;
        controls.auto_rotate_speed = config.camera.auto_rotate_speed;

        let mut environment = Environment::studio();
        environment.texture_mut().upload(&mut backend);

        let shadow = ShadowSettings {
            map_size: config.shadow.map_size,
            bias: config.shadow.bias,
            radius: config.shadow.radius,
            ..ShadowSettings::default()
        };

        info!("viewer session initialized");
        Self {
            camera,
            controls,
            lights: build_lights_from_config(&config.lights),
            shadow,
            effects: EffectChain::from_config(&config.post),
            environment,
            backend,
            current_model: None,
            model_info: None,
            ground_height: config.normalize.ground_height,
            target_size: config.normalize.target_size,
            camera_distance: config.camera.distance,
            auto_rotate_model: false,
            model_spin_speed: 0.3,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current_model(&self) -> Option<&Node> {
        self.current_model.as_ref()
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model_info.as_ref()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending.is_some()
    }

    /// Registers a decode request. A still-pending older request is
    /// superseded: its eventual completion will be discarded.
    pub fn begin_load(&mut self, name: &str) -> LoadTicket {
        if let Some(pending) = &self.pending {
            warn!(
                "superseding pending load of '{}' with '{name}'",
                pending.name
            );
        }
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.pending = Some(PendingLoad {
            ticket,
            name: name.to_string(),
        });
        ticket
    }

    /// Delivers a decode result.
    ///
    /// Returns `Ok(None)` when the ticket is stale (a newer request
    /// superseded it) and the result was discarded. A decode failure clears
    /// the slot and propagates; the previously displayed model stays
    /// untouched and the session remains interactive.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Node, ViewerError>,
    ) -> Result<Option<ModelInfo>, ViewerError> {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {}
            _ => {
                warn!("discarding stale decode result (ticket {ticket:?})");
                return Ok(None);
            }
        }
        let pending = self.pending.take().map(|p| p.name).unwrap_or_default();

        match result {
            Ok(node) => Ok(Some(self.install_model(node, &pending))),
            Err(e) => {
                error!("failed to load '{pending}': {e}");
                Err(e)
            }
        }
    }

    /// Synchronous convenience path: decode the uploaded bytes and install
    /// the model in one call.
    pub fn load_model(&mut self, name: &str, bytes: &[u8]) -> Result<ModelInfo, ViewerError> {
        let ticket = self.begin_load(name);
        let result = gltf_loader::decode_asset(name, bytes);
        Ok(self
            .complete_load(ticket, result)?
            .expect("freshly issued ticket cannot be stale"))
    }

    /// The post-load pipeline: release the old model, normalize, suggest a
    /// palette, frame the camera, then publish the notification payload.
    ///
    /// Normalization must complete before framing (the framer consumes the
    /// final bounding center). Color averaging is transform-independent and
    /// runs after normalization for pipeline convenience only.
    fn install_model(&mut self, mut node: Node, name: &str) -> ModelInfo {
        if let Some(mut old) = self.current_model.take() {
            old.release_resources(&mut self.backend);
        }

        let placement = normalize(&mut node, self.ground_height, self.target_size);
        let palette = suggest_palette(&node);
        if palette.is_none() {
            warn!("no materials found to calculate an average color");
        }

        let distance = self.clamped_distance(self.camera_distance);
        frame(
            &mut self.camera,
            &mut self.controls,
            placement.bounding_center,
            distance,
        );

        node.upload_resources(&mut self.backend);
        self.current_model = Some(node);

        let info = ModelInfo {
            name: name.to_string(),
            bounding_center: placement.bounding_center,
            scale_factor: placement.scale_factor,
            scaled_size: placement.scaled_size,
            palette,
        };
        info!(
            "loaded model '{}': scaled size {:.2} x {:.2} x {:.2} units, scale {:.4}",
            info.name,
            info.scaled_size.x,
            info.scaled_size.y,
            info.scaled_size.z,
            info.scale_factor
        );
        self.model_info = Some(info.clone());
        info
    }

    fn clamped_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.controls.min_distance, self.controls.max_distance)
    }

    /// Moves the camera to a new viewing distance along its current
    /// direction. Non-positive distances are rejected here, before the
    /// framer runs.
    pub fn set_camera_distance(&mut self, distance: f32) {
        if distance <= 0.0 {
            warn!("ignoring non-positive camera distance {distance}");
            return;
        }
        self.camera_distance = self.clamped_distance(distance);
        let target = self
            .model_info
            .as_ref()
            .map(|info| info.bounding_center)
            .unwrap_or(self.controls.target);
        frame(
            &mut self.camera,
            &mut self.controls,
            target,
            self.camera_distance,
        );
    }

    pub fn camera_distance(&self) -> f32 {
        self.camera_distance
    }

    /// Replaces the environment with an uploaded HDRI panorama; the
    /// previous custom environment's GPU copy is released first.
    pub fn set_environment(&mut self, name: &str, mut texture: EquirectTexture) {
        self.environment.texture_mut().release(&mut self.backend);
        texture.upload(&mut self.backend);
        self.environment = Environment::Hdri {
            name: name.to_string(),
            texture,
        };
        info!("environment switched to '{name}'");
    }

    /// Drops any custom HDRI, restores the generated studio environment and
    /// resets the post-processing chain to its defaults.
    pub fn clear_environment(&mut self) {
        self.environment.texture_mut().release(&mut self.backend);
        let mut environment = Environment::studio();
        environment.texture_mut().upload(&mut self.backend);
        self.environment = environment;
        self.effects.reset_to_defaults();
        info!("environment reset to default studio");
    }

    pub fn toggle_model_auto_rotation(&mut self) -> bool {
        self.auto_rotate_model = !self.auto_rotate_model;
        self.auto_rotate_model
    }

    /// Per-frame update: eases orbit input and spins the model when
    /// auto-rotation is on. The render loop only reads the resulting pose.
    pub fn tick(&mut self, dt: f32) {
        self.controls.update(&mut self.camera, dt);
        if self.auto_rotate_model
            && let Some(model) = &mut self.current_model
        {
            model.transform.rotation = UnitQuaternion::from_axis_angle(
                &Vector3::y_axis(),
                self.model_spin_speed * dt,
            ) * model.transform.rotation;
        }
    }

    /// Explicit teardown: releases every GPU resource the session holds.
    pub fn dispose(&mut self) {
        if let Some(mut model) = self.current_model.take() {
            model.release_resources(&mut self.backend);
        }
        self.environment.texture_mut().release(&mut self.backend);
        self.model_info = None;
        info!("viewer session disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::gltf_loader::tests::triangle_glb;
    use crate::scene::backend::HeadlessBackend;

    const TOL: f32 = 1e-5;

    fn session() -> ViewerSession<HeadlessBackend> {
        ViewerSession::new(&ViewerConfig::default(), HeadlessBackend::new())
    }

    #[test]
    fn load_installs_and_frames_the_model() {
        let mut session = session();
        let info = session.load_model("triangle.glb", &triangle_glb()).unwrap();

        assert_eq!(info.name, "triangle.glb");
        assert!((info.scale_factor - 5.0).abs() < TOL); // unit triangle -> size 5
        assert!(info.palette.is_some());

        // Camera orbits the bounding center at the configured distance.
        assert_eq!(session.controls.target, info.bounding_center);
        assert!((session.camera.distance_to_target() - 11.0).abs() < TOL);
        assert!(!session.has_pending_load());
    }

    #[test]
    fn decode_failure_preserves_the_current_model() {
        let mut session = session();
        session.load_model("triangle.glb", &triangle_glb()).unwrap();
        let center_before = session.model_info().unwrap().bounding_center;

        let err = session.load_model("junk.glb", &[0u8; 12]).unwrap_err();
        assert!(matches!(err, ViewerError::Decode { .. }));
        assert!(session.current_model().is_some());
        assert_eq!(session.model_info().unwrap().bounding_center, center_before);
        assert!(!session.has_pending_load());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut session = session();
        let old_ticket = session.begin_load("first.glb");
        let _new_ticket = session.begin_load("second.glb");

        let node = gltf_loader::decode_asset("first.glb", &triangle_glb()).unwrap();
        let outcome = session.complete_load(old_ticket, Ok(node)).unwrap();
        assert!(outcome.is_none());
        assert!(session.current_model().is_none());
        // The newer request is still pending.
        assert!(session.has_pending_load());
    }

    #[test]
    fn replacing_a_model_releases_its_resources() {
        let mut session = session();
        session.load_model("first.glb", &triangle_glb()).unwrap();
        assert_eq!(session.backend().disposed_geometry, 0);

        session.load_model("second.glb", &triangle_glb()).unwrap();
        assert_eq!(session.backend().disposed_geometry, 1);

        // Environment texture + current model geometry remain live.
        assert_eq!(session.backend().live_count(), 2);
    }

    #[test]
    fn non_positive_camera_distance_is_rejected() {
        let mut session = session();
        session.load_model("triangle.glb", &triangle_glb()).unwrap();
        let position_before = session.camera.position;

        session.set_camera_distance(0.0);
        session.set_camera_distance(-3.0);
        assert_eq!(session.camera.position, position_before);

        session.set_camera_distance(8.0);
        assert!((session.camera.distance_to_target() - 8.0).abs() < TOL);
    }

    #[test]
    fn camera_distance_is_clamped_to_orbit_limits() {
        let mut session = session();
        session.load_model("triangle.glb", &triangle_glb()).unwrap();

        session.set_camera_distance(500.0);
        assert!((session.camera.distance_to_target() - 30.0).abs() < TOL);
    }

    #[test]
    fn clearing_the_environment_resets_effects() {
        let mut session = session();
        session.effects.bloom.enabled = true;
        session.set_environment(
            "studio_small.hdr",
            EquirectTexture::new(2, 1, vec![[1.0, 1.0, 1.0]; 2]),
        );
        assert_eq!(session.environment().display_name(), "studio_small.hdr");

        session.clear_environment();
        assert_eq!(session.environment().display_name(), "Default studio");
        assert!(!session.effects.bloom.enabled);
        // Old studio map, the HDRI and nothing else were released.
        assert_eq!(session.backend().disposed_textures, 2);
    }

    #[test]
    fn auto_rotation_spins_the_model() {
        let mut session = session();
        session.load_model("triangle.glb", &triangle_glb()).unwrap();

        assert!(session.toggle_model_auto_rotation());
        let rotation_before = session.current_model().unwrap().transform.rotation;
        session.tick(0.1);
        let rotation_after = session.current_model().unwrap().transform.rotation;
        assert!(rotation_before.angle_to(&rotation_after) > 1e-4);

        assert!(!session.toggle_model_auto_rotation());
    }

    #[test]
    fn dispose_releases_everything() {
        let mut session = session();
        session.load_model("triangle.glb", &triangle_glb()).unwrap();
        session.dispose();
        assert_eq!(session.backend().live_count(), 0);
        assert!(session.model_info().is_none());
    }
}
