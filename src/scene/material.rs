use crate::scene::texture::Texture;
use nalgebra::Vector3;

/// Surface appearance parameters (metallic-roughness workflow).
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    /// Base color in linear RGB. `None` for materials that expose no color
    /// at all (e.g. depth-only or fully texture-driven materials); such
    /// materials contribute nothing to the average-color pass.
    pub base_color: Option<Vector3<f32>>,
    /// Metallic (0.0 = dielectric, 1.0 = metal).
    pub metallic: f32,
    /// Roughness (0.0 = smooth, 1.0 = rough).
    pub roughness: f32,
    /// Emissive color (light emitted by the surface).
    pub emissive: Vector3<f32>,

    // Textures (Optional)
    pub base_color_texture: Option<Texture>,
    pub metallic_roughness_texture: Option<Texture>,
    pub normal_texture: Option<Texture>,
    pub occlusion_texture: Option<Texture>,
    pub emissive_texture: Option<Texture>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color: Some(Vector3::new(1.0, 1.0, 1.0)),
            metallic: 0.0,
            roughness: 0.5,
            emissive: Vector3::zeros(),
            base_color_texture: None,
            metallic_roughness_texture: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
        }
    }
}

impl Material {
    /// The "has a base color" capability: materials answer through this
    /// accessor instead of being probed for dynamic properties.
    pub fn base_color(&self) -> Option<Vector3<f32>> {
        self.base_color
    }

    /// All texture slots that currently hold a texture.
    ///
    /// Release and upload walk this iterator instead of enumerating slot
    /// names, so a new slot added here is automatically covered.
    pub fn textures_mut(&mut self) -> impl Iterator<Item = &mut Texture> {
        [
            &mut self.base_color_texture,
            &mut self.metallic_roughness_texture,
            &mut self.normal_texture,
            &mut self.occlusion_texture,
            &mut self.emissive_texture,
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textures_mut_skips_empty_slots() {
        let mut material = Material::default();
        assert_eq!(material.textures_mut().count(), 0);

        material.normal_texture = Some(Texture::from_pixels("n", 1, 1, vec![0; 4]));
        material.emissive_texture = Some(Texture::from_pixels("e", 1, 1, vec![0; 4]));
        assert_eq!(material.textures_mut().count(), 2);
    }

    #[test]
    fn base_color_capability() {
        let mut material = Material::default();
        assert!(material.base_color().is_some());
        material.base_color = None;
        assert!(material.base_color().is_none());
    }
}
