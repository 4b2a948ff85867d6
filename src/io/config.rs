use crate::error::ViewerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct ViewerConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub shadow: ShadowConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub post: PostConfig,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Viewing distance applied when a new model is framed.
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_damping")]
    pub damping_factor: f32,
    #[serde(default = "default_auto_rotate_speed")]
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            distance: default_distance(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            damping_factor: default_damping(),
            auto_rotate_speed: default_auto_rotate_speed(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [6.0, 2.5, 9.0]
}
fn default_fov() -> f32 {
    40.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    1000.0
}
fn default_distance() -> f32 {
    11.0
}
fn default_min_distance() -> f32 {
    3.0
}
fn default_max_distance() -> f32 {
    30.0
}
fn default_damping() -> f32 {
    0.05
}
fn default_auto_rotate_speed() -> f32 {
    2.5
}

#[derive(Debug, Deserialize)]
pub struct NormalizeConfig {
    /// Y coordinate of the ground plane models are seated on.
    #[serde(default)]
    pub ground_height: f32,
    /// Size the largest model dimension is scaled to.
    #[serde(default = "default_target_size")]
    pub target_size: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            target_size: default_target_size(),
        }
    }
}

fn default_target_size() -> f32 {
    5.0
}

#[derive(Debug, Deserialize)]
pub struct ShadowConfig {
    #[serde(default = "default_shadow_map_size")]
    pub map_size: u32,
    #[serde(default = "default_shadow_bias")]
    pub bias: f32,
    #[serde(default = "default_shadow_radius")]
    pub radius: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: default_shadow_map_size(),
            bias: default_shadow_bias(),
            radius: default_shadow_radius(),
        }
    }
}

fn default_shadow_map_size() -> u32 {
    4096
}
fn default_shadow_bias() -> f32 {
    -0.001
}
fn default_shadow_radius() -> f32 {
    1.0
}

#[derive(Debug, Deserialize, Default)]
pub struct EnvironmentConfig {
    /// Optional panoramic .hdr file loaded at startup instead of the
    /// generated studio map.
    pub hdr_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostConfig {
    #[serde(default)]
    pub bloom_enabled: bool,
    #[serde(default = "default_bloom_threshold")]
    pub bloom_threshold: f32,
    #[serde(default = "default_bloom_strength")]
    pub bloom_strength: f32,
    #[serde(default = "default_bloom_radius")]
    pub bloom_radius: f32,

    #[serde(default)]
    pub ssao_enabled: bool,
    #[serde(default = "default_ssao_kernel_radius")]
    pub ssao_kernel_radius: f32,
    #[serde(default = "default_ssao_min_distance")]
    pub ssao_min_distance: f32,
    #[serde(default = "default_ssao_max_distance")]
    pub ssao_max_distance: f32,

    #[serde(default = "default_true")]
    pub smaa_enabled: bool,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            bloom_enabled: false,
            bloom_threshold: default_bloom_threshold(),
            bloom_strength: default_bloom_strength(),
            bloom_radius: default_bloom_radius(),
            ssao_enabled: false,
            ssao_kernel_radius: default_ssao_kernel_radius(),
            ssao_min_distance: default_ssao_min_distance(),
            ssao_max_distance: default_ssao_max_distance(),
            smaa_enabled: default_true(),
        }
    }
}

fn default_bloom_threshold() -> f32 {
    0.85
}
fn default_bloom_strength() -> f32 {
    0.4
}
fn default_bloom_radius() -> f32 {
    0.2
}
fn default_ssao_kernel_radius() -> f32 {
    0.5
}
fn default_ssao_min_distance() -> f32 {
    0.001
}
fn default_ssao_max_distance() -> f32 {
    0.1
}
fn default_true() -> bool {
    true
}

/// One light in the `[[lights]]` array. When the array is empty the default
/// studio rig is used instead.
#[derive(Debug, Deserialize)]
pub struct LightConfig {
    pub r#type: String,
    pub position: Option<[f32; 3]>,
    pub direction: Option<[f32; 3]>,
    pub target: Option<[f32; 3]>,
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    pub sky_color: Option<[f32; 3]>,
    pub ground_color: Option<[f32; 3]>,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub cast_shadow: bool,
}

fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_intensity() -> f32 {
    1.0
}

impl ViewerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ViewerError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
