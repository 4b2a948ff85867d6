use crate::io::config::LightConfig;
use log::warn;
use nalgebra::{Point3, Vector3};

/// Shadow-map parameters shared by every shadow-casting light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub bias: f32,
    /// Softness radius for PCF filtering.
    pub radius: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 4096,
            bias: -0.001,
            radius: 1.0,
            near: 5.0,
            far: 60.0,
        }
    }
}

/// Represents a light source in the scene.
///
/// The viewer only configures lights; shading itself is the rendering
/// engine's job.
#[derive(Debug, Clone)]
pub enum Light {
    /// Uniform light with no direction, lifting the whole scene.
    Ambient { color: Vector3<f32>, intensity: f32 },
    /// Sky/ground gradient light.
    Hemisphere {
        sky_color: Vector3<f32>,
        ground_color: Vector3<f32>,
        intensity: f32,
    },
    /// A light source that is infinitely far away (e.g. Sun). Rays are parallel.
    Directional {
        direction: Vector3<f32>,
        color: Vector3<f32>,
        intensity: f32,
        cast_shadow: bool,
    },
    /// A light source at a specific position that radiates in all directions.
    Point {
        position: Point3<f32>,
        color: Vector3<f32>,
        intensity: f32,
        /// Cutoff distance (0.0 = unlimited).
        range: f32,
        decay: f32,
    },
    /// Cone light aimed at a target point.
    Spot {
        position: Point3<f32>,
        target: Point3<f32>,
        color: Vector3<f32>,
        intensity: f32,
        /// Cone half-angle in radians.
        angle: f32,
        /// Soft edge fraction, 0.0 (hard) to 1.0.
        penumbra: f32,
        cast_shadow: bool,
    },
}

impl Light {
    pub fn new_ambient(color: Vector3<f32>, intensity: f32) -> Self {
        Self::Ambient { color, intensity }
    }

    pub fn new_hemisphere(
        sky_color: Vector3<f32>,
        ground_color: Vector3<f32>,
        intensity: f32,
    ) -> Self {
        Self::Hemisphere {
            sky_color,
            ground_color,
            intensity,
        }
    }

    pub fn new_directional(direction: Vector3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        Self::Directional {
            direction: direction.normalize(),
            color,
            intensity,
            cast_shadow: false,
        }
    }

    pub fn new_point(position: Point3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        Self::Point {
            position,
            color,
            intensity,
            range: 0.0,
            decay: 2.0,
        }
    }

    pub fn new_spot(
        position: Point3<f32>,
        target: Point3<f32>,
        color: Vector3<f32>,
        intensity: f32,
    ) -> Self {
        Self::Spot {
            position,
            target,
            color,
            intensity,
            angle: std::f32::consts::PI / 3.0,
            penumbra: 0.5,
            cast_shadow: false,
        }
    }

    pub fn casts_shadow(&self) -> bool {
        match self {
            Light::Directional { cast_shadow, .. } | Light::Spot { cast_shadow, .. } => {
                *cast_shadow
            }
            _ => false,
        }
    }
}

/// Builds the default studio light rig: ambient base, shadow-casting key
/// spot, hemisphere fill, secondary fill spot, rim light from the back and
/// warm/cool point accents.
pub fn default_light_rig() -> Vec<Light> {
    let mut key = Light::new_spot(
        Point3::new(15.0, 25.0, 20.0),
        Point3::new(0.0, 2.0, 0.0),
        Vector3::new(1.0, 0.96, 0.88),
        6.0,
    );
    if let Light::Spot {
        ref mut cast_shadow,
        ..
    } = key
    {
        *cast_shadow = true;
    }

    let mut rig = vec![
        Light::new_ambient(Vector3::new(1.0, 1.0, 0.94), 0.7),
        key,
        Light::new_hemisphere(
            Vector3::new(1.0, 0.98, 0.94),
            Vector3::new(0.69, 0.77, 0.87),
            0.9,
        ),
        Light::new_spot(
            Point3::new(-20.0, 15.0, 15.0),
            Point3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 0.97, 0.91),
            3.0,
        ),
        Light::new_directional(
            Point3::new(0.0, 1.0, 0.0) - Point3::new(0.0, 10.0, -25.0),
            Vector3::new(1.0, 0.94, 0.86),
            3.5,
        ),
    ];

    // Accent point lights around the pedestal.
    for (position, color) in [
        (Point3::new(5.0, 1.0, 8.0), Vector3::new(1.0, 0.87, 0.8)),
        (Point3::new(-5.0, 1.0, 8.0), Vector3::new(0.8, 0.87, 1.0)),
        (Point3::new(0.0, 3.0, -10.0), Vector3::new(1.0, 0.96, 0.88)),
    ] {
        let mut accent = Light::new_point(position, color, 2.0);
        if let Light::Point { ref mut range, .. } = accent {
            *range = 20.0;
        }
        rig.push(accent);
    }

    rig
}

/// Builds the light rig from config entries; an empty list falls back to
/// the default studio rig.
pub fn build_lights_from_config(configs: &[LightConfig]) -> Vec<Light> {
    if configs.is_empty() {
        return default_light_rig();
    }

    let mut lights = Vec::new();
    for config in configs {
        let color = Vector3::from(config.color);
        match config.r#type.as_str() {
            "ambient" => lights.push(Light::new_ambient(color, config.intensity)),
            "hemisphere" => lights.push(Light::new_hemisphere(
                config.sky_color.map(Vector3::from).unwrap_or(color),
                config
                    .ground_color
                    .map(Vector3::from)
                    .unwrap_or(Vector3::new(0.69, 0.77, 0.87)),
                config.intensity,
            )),
            "directional" => {
                if let Some(direction) = config.direction {
                    let mut light =
                        Light::new_directional(Vector3::from(direction), color, config.intensity);
                    if let Light::Directional {
                        ref mut cast_shadow,
                        ..
                    } = light
                    {
                        *cast_shadow = config.cast_shadow;
                    }
                    lights.push(light);
                } else {
                    warn!("directional light without a direction, skipping");
                }
            }
            "point" => {
                if let Some(position) = config.position {
                    lights.push(Light::new_point(
                        Point3::from(position),
                        color,
                        config.intensity,
                    ));
                } else {
                    warn!("point light without a position, skipping");
                }
            }
            "spot" => {
                if let Some(position) = config.position {
                    let target = config.target.map(Point3::from).unwrap_or(Point3::origin());
                    let mut light =
                        Light::new_spot(Point3::from(position), target, color, config.intensity);
                    if let Light::Spot {
                        ref mut cast_shadow,
                        ..
                    } = light
                    {
                        *cast_shadow = config.cast_shadow;
                    }
                    lights.push(light);
                } else {
                    warn!("spot light without a position, skipping");
                }
            }
            other => warn!("unknown light type '{other}', skipping"),
        }
    }
    lights
}
