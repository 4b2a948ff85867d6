use crate::scene::backend::{GpuHandle, RenderBackend};
use log::{debug, warn};
use std::f32::consts::TAU;

/// Equirectangular panoramic texture used for ambient lighting and as the
/// scene background. Pixels are linear RGB.
#[derive(Debug, Clone)]
pub struct EquirectTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 3]>,
    gpu: Option<GpuHandle>,
}

impl EquirectTexture {
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
            gpu: None,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn upload(&mut self, backend: &mut dyn RenderBackend) -> GpuHandle {
        *self
            .gpu
            .get_or_insert_with(|| backend.upload_texture(self.width, self.height))
    }

    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        match self.gpu.take() {
            Some(handle) => {
                if let Err(e) = backend.dispose_texture(handle) {
                    warn!("skipping environment texture release: {e}");
                }
            }
            None => debug!("environment texture has no GPU copy to release"),
        }
    }
}

/// The active environment map.
///
/// The generated studio map is the default and the fallback whenever a
/// custom HDRI is cleared.
#[derive(Debug, Clone)]
pub enum Environment {
    Studio(EquirectTexture),
    Hdri {
        name: String,
        texture: EquirectTexture,
    },
}

impl Environment {
    /// Generates the neutral studio panorama: a grey backdrop with bright
    /// area-light patches front-top, left and right, plus a soft floor
    /// bounce. Cheap stand-in for a real light stage.
    pub fn studio() -> Self {
        const WIDTH: u32 = 256;
        const HEIGHT: u32 = 128;
        const BACKDROP: [f32; 3] = [0.25, 0.25, 0.25];
        const FLOOR: [f32; 3] = [0.53, 0.53, 0.53];

        let mut pixels = Vec::with_capacity((WIDTH * HEIGHT) as usize);
        for y in 0..HEIGHT {
            // v runs 0.0 at the zenith to 1.0 at the nadir.
            let v = (y as f32 + 0.5) / HEIGHT as f32;
            for x in 0..WIDTH {
                let azimuth = (x as f32 + 0.5) / WIDTH as f32 * TAU;

                let color = if v > 0.85 {
                    FLOOR
                } else if v < 0.35 {
                    if angular_distance(azimuth, 0.0) < 0.5 {
                        [1.0, 1.0, 1.0] // key patch, front-top
                    } else if angular_distance(azimuth, TAU * 0.25) < 0.35 {
                        [1.0, 1.0, 0.93] // warm side patch
                    } else if angular_distance(azimuth, TAU * 0.75) < 0.35 {
                        [1.0, 0.93, 1.0] // cool side patch
                    } else {
                        BACKDROP
                    }
                } else {
                    BACKDROP
                };
                pixels.push(color);
            }
        }

        Self::Studio(EquirectTexture::new(WIDTH, HEIGHT, pixels))
    }

    pub fn texture(&self) -> &EquirectTexture {
        match self {
            Environment::Studio(texture) => texture,
            Environment::Hdri { texture, .. } => texture,
        }
    }

    pub fn texture_mut(&mut self) -> &mut EquirectTexture {
        match self {
            Environment::Studio(texture) => texture,
            Environment::Hdri { texture, .. } => texture,
        }
    }

    /// Display name shown in the environment picker.
    pub fn display_name(&self) -> &str {
        match self {
            Environment::Studio(_) => "Default studio",
            Environment::Hdri { name, .. } => name,
        }
    }
}

fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}
